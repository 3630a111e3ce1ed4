//! Bookshelf application library
//!
//! Hosts the project modules mounted by the binary and by tests.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
