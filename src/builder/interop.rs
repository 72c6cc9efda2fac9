//! Native interop descriptors.
//!
//! Library crate types can be consumed by C/C++ targets in the host build.
//! This module decides whether a compiled crate is exportable to the native
//! side and, if so, describes it in the shape the native toolchain service
//! understands: a list of libraries plus the link flags needed to resolve
//! the Rust runtime's own symbols.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::crate_info::{CrateInfo, CrateType};
use crate::core::toolchain::RustToolchain;

/// How a native consumer links an exported library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeLibraryKind {
    /// Linked into the consumer as an archive
    Static,
    /// Loaded at runtime as a shared object
    Dynamic,
}

/// One library exported to native consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLibrary {
    /// Linkage form native consumers use
    pub kind: NativeLibraryKind,

    /// Path the native side links against
    pub artifact: PathBuf,

    /// When set, `artifact` is an alias that the host must materialize as a
    /// copy or link of this file. Rust library formats are archives under a
    /// different extension; the alias presents them under the native one.
    pub alias_of: Option<PathBuf>,
}

/// Everything native consumers need to link against a compiled crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeInterop {
    /// Exported libraries, this crate's own first, then dependencies'
    pub libraries: Vec<NativeLibrary>,

    /// Link flags resolving the Rust runtime's symbols
    pub link_flags: Vec<String>,
}

/// Describe a compiled crate to native consumers, if it is exportable.
///
/// Returns `None` for crate types native code cannot link against, for
/// test crates, for raw-binary outputs, and for targets without an external
/// native linker. Dependency descriptors are appended after the crate's own
/// entry so consumers see a complete closure.
pub fn establish_native_interop(
    crate_info: &CrateInfo,
    toolchain: &RustToolchain,
    dep_interops: &[NativeInterop],
) -> Option<NativeInterop> {
    if crate_info.is_test || crate_info.out_binary || !toolchain.has_native_linker() {
        return None;
    }

    let own = match crate_info.crate_type {
        CrateType::Bin | CrateType::ProcMacro => return None,
        CrateType::Staticlib => NativeLibrary {
            kind: NativeLibraryKind::Static,
            artifact: crate_info.output.clone(),
            alias_of: None,
        },
        // Rust library formats are archives; present them under the native
        // static-library extension via an alias.
        CrateType::Rlib | CrateType::Lib => {
            let ext = toolchain.staticlib_ext.trim_start_matches('.');
            NativeLibrary {
                kind: NativeLibraryKind::Static,
                artifact: crate_info.output.with_extension(ext),
                alias_of: Some(crate_info.output.clone()),
            }
        }
        CrateType::Dylib | CrateType::Cdylib => NativeLibrary {
            kind: NativeLibraryKind::Dynamic,
            artifact: crate_info.output.clone(),
            alias_of: None,
        },
    };

    let mut interop = NativeInterop {
        libraries: vec![own],
        link_flags: toolchain.stdlib_linkflags.clone(),
    };
    for dep in dep_interops {
        interop.libraries.extend(dep.libraries.iter().cloned());
        interop.link_flags.extend(dep.link_flags.iter().cloned());
    }

    Some(interop)
}
