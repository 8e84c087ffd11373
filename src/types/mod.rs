//! This module defines the core, strongly-typed data representations shared by
//! every engine bridge.
//!
//! It currently includes the universal `DType` enum and the `IntoDType` trait
//! that lets callers name a dtype either by value or by name.

pub mod dtype;

// Re-export the main type(s) for easier access.
pub use dtype::{DType, IntoDType};
