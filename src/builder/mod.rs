//! The compile-action construction pipeline.

pub mod action;
pub mod args;
pub mod build_script;
pub mod deps;
pub mod interop;
pub mod link;

pub use action::{
    build_crate, ActionLog, ActionRegistrar, BuildRequest, CompileAction, CrateBundle,
};
pub use args::{build_invocation, Invocation, InvocationRequest, LocationExpander, NoExpansion};
pub use build_script::BuildScriptInputs;
pub use deps::collect_deps;
pub use interop::{establish_native_interop, NativeInterop, NativeLibrary, NativeLibraryKind};
