//! Crate descriptors - what gets compiled.
//!
//! A `CrateInfo` describes one compilation unit handed to rustc: its type,
//! sources, output artifact, and declared dependencies. It is constructed
//! once per target by the host rule and treated as read-only afterwards.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::provider::Dependency;

/// The kind of crate being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrateType {
    /// Executable binary
    Bin,
    /// Default library form
    Lib,
    /// Relocatable Rust library
    Rlib,
    /// Rust dynamic library
    Dylib,
    /// C-ABI dynamic library
    Cdylib,
    /// Static archive
    Staticlib,
    /// Compiler plugin consumed at compile time, never linked
    ProcMacro,
}

impl CrateType {
    /// The `--crate-type` spelling rustc expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrateType::Bin => "bin",
            CrateType::Lib => "lib",
            CrateType::Rlib => "rlib",
            CrateType::Dylib => "dylib",
            CrateType::Cdylib => "cdylib",
            CrateType::Staticlib => "staticlib",
            CrateType::ProcMacro => "proc-macro",
        }
    }

    /// Whether this crate is a procedural macro.
    pub fn is_proc_macro(&self) -> bool {
        matches!(self, CrateType::ProcMacro)
    }

    /// Whether this crate type produces a shared object and therefore links
    /// the C/C++ runtime dynamically.
    pub fn links_runtime_dynamically(&self) -> bool {
        matches!(self, CrateType::Dylib | CrateType::Cdylib)
    }

    /// Whether this crate type defers final linking to a downstream target.
    ///
    /// Pure library forms get dependency search paths but no library-name
    /// flags; the consuming binary resolves the actual link.
    pub fn defers_linking(&self) -> bool {
        matches!(self, CrateType::Lib | CrateType::Rlib)
    }
}

impl std::fmt::Display for CrateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The language edition rustc defaults to when no `--edition` is passed.
pub const LEGACY_EDITION: &str = "2015";

/// A single crate's compilation descriptor.
///
/// Identity for deduplication purposes is the (name, output) pair: two
/// configurations of the same crate differ in their output artifact.
#[derive(Debug, Clone)]
pub struct CrateInfo {
    /// Crate name as declared (may contain characters rustc forbids)
    pub name: String,

    /// What kind of artifact rustc emits
    pub crate_type: CrateType,

    /// Language edition (e.g. "2015", "2018")
    pub edition: String,

    /// Crate root source file (lib.rs / main.rs)
    pub root: PathBuf,

    /// All source files belonging to the crate
    pub srcs: Vec<PathBuf>,

    /// The declared output artifact
    pub output: PathBuf,

    /// Whether this is a test crate
    pub is_test: bool,

    /// Declared plain dependencies, in declaration order
    pub deps: Vec<Dependency>,

    /// Declared proc-macro dependencies, in declaration order
    pub proc_macro_deps: Vec<Dependency>,

    /// Dependency label -> local crate name overrides
    pub aliases: BTreeMap<String, String>,

    /// Environment overrides for the rustc invocation
    pub rustc_env: BTreeMap<String, String>,

    /// Rule-level extra rustc flags
    pub rustc_flags: Vec<String>,

    /// Enabled crate features
    pub features: Vec<String>,

    /// Optional package version string
    pub version: Option<String>,

    /// Runtime data dependencies
    pub data: Vec<Dependency>,

    /// Files needed at compile time (e.g. for include_str!)
    pub compile_data: Vec<PathBuf>,

    /// Optional linker script
    pub linker_script: Option<PathBuf>,

    /// Explicit override: treat the output as a raw binary
    pub out_binary: bool,
}

impl CrateInfo {
    /// Create a new crate descriptor with empty optional fields.
    pub fn new(
        name: impl Into<String>,
        crate_type: CrateType,
        edition: impl Into<String>,
        root: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        let root = root.into();
        CrateInfo {
            name: name.into(),
            crate_type,
            edition: edition.into(),
            srcs: vec![root.clone()],
            root,
            output: output.into(),
            is_test: false,
            deps: Vec::new(),
            proc_macro_deps: Vec::new(),
            aliases: BTreeMap::new(),
            rustc_env: BTreeMap::new(),
            rustc_flags: Vec::new(),
            features: Vec::new(),
            version: None,
            data: Vec::new(),
            compile_data: Vec::new(),
            linker_script: None,
            out_binary: false,
        }
    }

    /// Set the source-file set.
    pub fn with_srcs(mut self, srcs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.srcs = srcs.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Set the plain dependency list.
    pub fn with_deps(mut self, deps: impl IntoIterator<Item = Dependency>) -> Self {
        self.deps = deps.into_iter().collect();
        self
    }

    /// Set the proc-macro dependency list.
    pub fn with_proc_macro_deps(mut self, deps: impl IntoIterator<Item = Dependency>) -> Self {
        self.proc_macro_deps = deps.into_iter().collect();
        self
    }

    /// Add a dependency alias.
    pub fn with_alias(mut self, label: impl Into<String>, name: impl Into<String>) -> Self {
        self.aliases.insert(label.into(), name.into());
        self
    }

    /// Set the package version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the enabled features.
    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.features = features.into_iter().map(|f| f.into()).collect();
        self
    }

    /// Add an environment override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.rustc_env.insert(key.into(), value.into());
        self
    }

    /// Mark as a test crate.
    pub fn test(mut self, is_test: bool) -> Self {
        self.is_test = is_test;
        self
    }

    /// The crate name with characters rustc forbids replaced.
    pub fn sanitized_name(&self) -> String {
        self.name.replace('-', "_")
    }

    /// Whether the edition requires an explicit `--edition` flag.
    pub fn needs_edition_flag(&self) -> bool {
        self.edition != LEGACY_EDITION
    }
}

impl PartialEq for CrateInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.output == other.output
    }
}

impl Eq for CrateInfo {}

impl Hash for CrateInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.output.hash(state);
    }
}
