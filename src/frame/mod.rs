//! Thin wrappers that own one native Arrow object each.
//!
//! These carry just enough metadata (length, implementation tag, laziness) for
//! the comparand validator and the shared validation helpers to make their
//! decisions. The full frame method surface lives outside this crate.

pub mod dataframe;
pub mod series;

pub use self::dataframe::{ArrowDataFrame, ConcatMethod};
pub use self::series::{ArrowSeries, BinaryOp, ClosedInterval};

use crate::engine::Implementation;

/// **CONTRACT:** Anything wrapping a native object from some engine.
pub trait NativeHandle {
    fn implementation(&self) -> Implementation;

    /// Number of rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// **CONTRACT:** A wrapped frame, eager or lazy.
pub trait FrameHandle: NativeHandle {
    fn is_lazy(&self) -> bool;
}

impl<T: NativeHandle + ?Sized> NativeHandle for &T {
    fn implementation(&self) -> Implementation {
        (**self).implementation()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<T: FrameHandle + ?Sized> FrameHandle for &T {
    fn is_lazy(&self) -> bool {
        (**self).is_lazy()
    }
}
