//! Tensor shape patterns with inferable dimensions.

mod common;

pub mod dim;
pub use dim::*;

pub mod shape;
pub use shape::*;
