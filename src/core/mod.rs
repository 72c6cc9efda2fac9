//! Core data structures for Capstan.
//!
//! This module contains the foundational types used throughout the crate:
//! - Crate descriptors and the crate-type enum
//! - Dependency capabilities and aggregated graphs
//! - Toolchain descriptors and the native-toolchain seam

pub mod crate_info;
pub mod provider;
pub mod toolchain;

pub use crate_info::{CrateInfo, CrateType, LEGACY_EDITION};
pub use provider::{AliasedCrate, BuildInfo, Capability, CrateProvider, DepInfo, Dependency};
pub use toolchain::{
    CcToolchain, CompilationModeOptions, LinkerCommand, RustToolchain, SystemLinker,
};
