//! This module provides a set of shared, low-level helpers used throughout the
//! bridge.
//!
//! Its primary responsibilities include:
//! 1.  Parsing engine version strings into comparable component lists.
//! 2.  The cross-object checks every multi-input operation runs before touching
//!     native data (same engine, same laziness, same length).
//! 3.  Small dtype queries that need more than the universal `DType` alone.

use crate::error::{BridgeError, Result};
use crate::frame::{ArrowSeries, FrameHandle, NativeHandle};
use crate::types::DType;

//==================================================================================
// 1. Versions
//==================================================================================

/// Parses a dotted version string into its numeric components.
///
/// Non-digit characters are stripped from each component, so `"1.0.0rc1"` parses
/// as `[1, 0, 1]` and `"v1.0"` as `[1, 0]`. A component with no digits at all is
/// rejected.
pub fn parse_version(version: &str) -> Result<Vec<u64>> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(BridgeError::InvalidVersion(version.to_string()));
    }
    trimmed
        .split('.')
        .map(|component| {
            let digits: String = component.chars().filter(char::is_ascii_digit).collect();
            digits
                .parse::<u64>()
                .map_err(|_| BridgeError::InvalidVersion(version.to_string()))
        })
        .collect()
}

//==================================================================================
// 2. Cross-Object Validation
//==================================================================================

/// Fails if the handles do not all come from the same engine.
pub fn validate_same_library<'a, I, H>(items: I) -> Result<()>
where
    I: IntoIterator<Item = &'a H>,
    H: NativeHandle + ?Sized + 'a,
{
    let mut items = items.into_iter();
    let Some(first) = items.next() else {
        return Ok(());
    };
    let expected = first.implementation();
    if items.any(|item| item.implementation() != expected) {
        return Err(BridgeError::CrossLibrary);
    }
    Ok(())
}

/// Fails if eager and lazy frames are mixed.
pub fn validate_laziness<'a, I, H>(items: I) -> Result<()>
where
    I: IntoIterator<Item = &'a H>,
    H: FrameHandle + ?Sized + 'a,
{
    let mut items = items.into_iter();
    let Some(first) = items.next() else {
        return Ok(());
    };
    let lazy = first.is_lazy();
    if items.any(|item| item.is_lazy() != lazy) {
        return Err(BridgeError::MixedLaziness);
    }
    Ok(())
}

/// Aligns `rhs` to `lhs` and hands `lhs` back.
///
/// Arrow objects carry no index, so alignment reduces to checking that both
/// sides have the same number of rows.
pub fn maybe_align_index<L, R>(lhs: L, rhs: &R) -> Result<L>
where
    L: NativeHandle,
    R: NativeHandle + ?Sized,
{
    if lhs.implementation() != rhs.implementation() {
        return Err(BridgeError::CrossLibrary);
    }
    if lhs.len() != rhs.len() {
        return Err(BridgeError::LengthMismatch {
            lhs: lhs.len(),
            rhs: rhs.len(),
        });
    }
    Ok(lhs)
}

//==================================================================================
// 3. Dtype Queries
//==================================================================================

/// Whether the series holds categories with a meaningful order.
///
/// `Enum` is always ordered. A plain `Categorical` is ordered only when its
/// dictionary field says so.
pub fn is_ordered_categorical(series: &ArrowSeries) -> Result<bool> {
    let ordered = match series.dtype()? {
        DType::Enum => true,
        DType::Categorical => series.field().dict_is_ordered().unwrap_or(false),
        _ => false,
    };
    Ok(ordered)
}
