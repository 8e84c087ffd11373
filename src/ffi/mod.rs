//! The Python boundary. Compiled only with the `python` feature.

pub mod python;
