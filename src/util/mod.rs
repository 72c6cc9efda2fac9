//! Shared utilities

pub mod depset;
pub mod diagnostic;

pub use depset::TransitiveSet;
pub use diagnostic::ConfigError;
