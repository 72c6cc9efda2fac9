//! Capstan - compile-action construction for Rust targets in a
//! multi-language build graph.
//!
//! This crate turns a crate descriptor, its declared dependencies, and a
//! toolchain description into exactly one fully-specified rustc invocation:
//! the argument sequence, environment, input set, and outputs of a compile
//! action. It performs no I/O and spawns no processes; the host build
//! system executes what this crate describes.

pub mod builder;
pub mod core;
pub mod util;

pub use builder::{
    build_crate, ActionLog, ActionRegistrar, BuildRequest, CompileAction, CrateBundle,
    LocationExpander, NativeInterop, NoExpansion,
};
pub use core::{
    BuildInfo, CcToolchain, CrateInfo, CrateType, DepInfo, Dependency, RustToolchain,
    SystemLinker,
};
pub use util::{ConfigError, TransitiveSet};
