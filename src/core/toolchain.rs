//! Toolchain descriptors.
//!
//! `RustToolchain` describes the rustc installation a target is built
//! with; it is declared externally (typically as TOML) and treated as a
//! read-only input. `CcToolchain` is the seam to the host's native C/C++
//! toolchain service, consumed when a final link is produced.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Optimization and debug-info settings for one compilation mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationModeOptions {
    /// Value for `-Copt-level=`
    pub opt_level: String,

    /// Value for `-Cdebuginfo=`
    pub debug_info: String,
}

/// Description of a rustc installation and its target platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RustToolchain {
    /// Target triple (e.g. "x86_64-unknown-linux-gnu")
    pub target_triple: String,

    /// Target architecture (e.g. "x86_64", "wasm32")
    pub target_arch: String,

    /// Target operating system (e.g. "linux", "macos")
    pub target_os: String,

    /// Path to the rustc executable
    pub rustc: PathBuf,

    /// Path to the invocation wrapper the action runs instead of bare rustc
    pub process_wrapper: PathBuf,

    /// Standard library files shipped with the toolchain
    #[serde(default)]
    pub rust_std: Vec<PathBuf>,

    /// Dynamic library filename extension, with leading dot (".so")
    pub dylib_ext: String,

    /// Static library filename extension, with leading dot (".a")
    pub staticlib_ext: String,

    /// Binary filename extension ("" on unix, ".exe" on windows)
    #[serde(default)]
    pub binary_ext: String,

    /// Compilation mode name -> optimization/debug-info settings
    pub compilation_modes: BTreeMap<String, CompilationModeOptions>,

    /// Link flags for the standard C/C++ runtime support libraries
    #[serde(default)]
    pub stdlib_linkflags: Vec<String>,
}

impl RustToolchain {
    /// Parse a toolchain descriptor from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse toolchain descriptor")
    }

    /// Load a toolchain descriptor from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Look up the option table entry for a compilation mode.
    pub fn mode_options(&self, mode: &str) -> Option<&CompilationModeOptions> {
        self.compilation_modes.get(mode)
    }

    /// The known compilation mode names, for error messages.
    pub fn known_modes(&self) -> String {
        self.compilation_modes
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Distinct directories holding standard library files, in first-seen
    /// order.
    pub fn std_library_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for file in &self.rust_std {
            if let Some(parent) = file.parent() {
                if !dirs.iter().any(|d| d == parent) {
                    dirs.push(parent.to_path_buf());
                }
            }
        }
        dirs
    }

    /// Whether the target OS supports runtime dynamic-library search-path
    /// relocation (rpaths).
    pub fn supports_rpaths(&self) -> bool {
        matches!(self.target_os.as_str(), "linux" | "macos")
    }

    /// Whether the target uses an external native linker. WebAssembly
    /// targets use rustc's built-in linker instead.
    pub fn has_native_linker(&self) -> bool {
        self.target_arch != "wasm32"
    }
}

/// A rendered linker command obtained from the native toolchain service.
#[derive(Debug, Clone, Default)]
pub struct LinkerCommand {
    /// Path to the linker driver
    pub tool: PathBuf,

    /// Rendered command-line flags
    pub args: Vec<String>,

    /// Environment the linker requires
    pub env: BTreeMap<String, String>,
}

/// The host's native C/C++ toolchain service.
///
/// Given a link-executable request this returns the tool, its rendered
/// flags, and its environment; it also exposes the runtime support
/// libraries in both linkage forms.
pub trait CcToolchain {
    /// Render the command for a "link executable" action, embedding the
    /// requested runtime library search directories.
    fn link_executable(&self, runtime_search_dirs: &[PathBuf]) -> LinkerCommand;

    /// Runtime support libraries for dynamic linkage.
    fn dynamic_runtime_libraries(&self) -> &[PathBuf];

    /// Runtime support libraries for static linkage.
    fn static_runtime_libraries(&self) -> &[PathBuf];
}

/// A plain system linker driver.
///
/// Renders rpath requests as `-Wl,-rpath,$ORIGIN/...` flags relative to the
/// output binary, followed by any user link flags.
#[derive(Debug, Clone, Default)]
pub struct SystemLinker {
    /// Path to the linker driver (e.g. cc)
    pub path: PathBuf,

    /// User link flags appended to every link
    pub link_flags: Vec<String>,

    /// Environment the driver needs
    pub env: BTreeMap<String, String>,

    /// Dynamic runtime support libraries
    pub dynamic_runtime_libs: Vec<PathBuf>,

    /// Static runtime support libraries
    pub static_runtime_libs: Vec<PathBuf>,
}

impl CcToolchain for SystemLinker {
    fn link_executable(&self, runtime_search_dirs: &[PathBuf]) -> LinkerCommand {
        let mut args = Vec::new();
        for dir in runtime_search_dirs {
            args.push(format!("-Wl,-rpath,$ORIGIN/{}", dir.display()));
        }
        args.extend(self.link_flags.iter().cloned());
        LinkerCommand {
            tool: self.path.clone(),
            args,
            env: self.env.clone(),
        }
    }

    fn dynamic_runtime_libraries(&self) -> &[PathBuf] {
        &self.dynamic_runtime_libs
    }

    fn static_runtime_libraries(&self) -> &[PathBuf] {
        &self.static_runtime_libs
    }
}
