//! Dependency capabilities and the values flowing between targets.
//!
//! A dependency edge in the build graph carries providers: the information
//! a target exposes to its dependents. Exactly three capabilities are
//! recognized here - a compiled crate, a set of native library files, or
//! the outputs of a build-script run. Classification is performed by a
//! single function so every consumer matches exhaustively instead of
//! probing provider membership.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::crate_info::CrateInfo;
use crate::util::TransitiveSet;

/// Output files of an external build-script run.
///
/// The four files are produced by a collaborator this core treats as
/// opaque paths. At most one `BuildInfo` may exist per target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildInfo {
    /// Marker for the directory the build script populated
    pub out_dir: PathBuf,

    /// File holding extra compiler flags, one per line
    pub rustc_flags: PathBuf,

    /// File holding extra link flags, one per line
    pub link_flags: PathBuf,

    /// File holding environment variables for the rustc invocation
    pub rustc_env: PathBuf,

    /// Optional file holding environment variables for dependent targets
    pub dep_env: Option<PathBuf>,
}

/// What a crate-providing dependency exposes: its own descriptor plus the
/// dependency graph computed when it was configured.
#[derive(Debug, Clone)]
pub struct CrateProvider {
    /// The dependency's crate descriptor
    pub crate_info: Arc<CrateInfo>,

    /// The dependency's own aggregated graph
    pub dep_info: Arc<DepInfo>,
}

/// A declared dependency of a target, tagged with the providers it carries.
#[derive(Debug, Clone)]
pub struct Dependency {
    label: String,
    crate_provider: Option<CrateProvider>,
    native_libraries: Option<Vec<PathBuf>>,
    build_info: Option<BuildInfo>,
}

impl Dependency {
    /// A dependency on another crate.
    pub fn rust_crate(
        label: impl Into<String>,
        crate_info: Arc<CrateInfo>,
        dep_info: Arc<DepInfo>,
    ) -> Self {
        Dependency {
            label: label.into(),
            crate_provider: Some(CrateProvider {
                crate_info,
                dep_info,
            }),
            native_libraries: None,
            build_info: None,
        }
    }

    /// A dependency on a native (C/C++) library target, identified by its
    /// output files.
    pub fn native_library(
        label: impl Into<String>,
        files: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        Dependency {
            label: label.into(),
            crate_provider: None,
            native_libraries: Some(files.into_iter().map(|f| f.into()).collect()),
            build_info: None,
        }
    }

    /// A dependency on a build-script target.
    pub fn build_script(label: impl Into<String>, build_info: BuildInfo) -> Self {
        Dependency {
            label: label.into(),
            crate_provider: None,
            native_libraries: None,
            build_info: Some(build_info),
        }
    }

    /// A dependency carrying no recognized providers, e.g. a plain files
    /// target. Classification of such a dependency fails.
    pub fn opaque(label: impl Into<String>) -> Self {
        Dependency {
            label: label.into(),
            crate_provider: None,
            native_libraries: None,
            build_info: None,
        }
    }

    /// The dependency's target label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Classify this dependency into exactly one capability.
    ///
    /// Precedence follows provider order: a crate provider wins over native
    /// libraries, which win over build-script outputs. `None` means the
    /// dependency exposes nothing this core recognizes, which callers must
    /// treat as a fatal configuration error.
    pub fn capability(&self) -> Option<Capability<'_>> {
        if let Some(ref provider) = self.crate_provider {
            Some(Capability::Crate(provider))
        } else if let Some(ref libs) = self.native_libraries {
            Some(Capability::NativeLibrary(libs))
        } else {
            self.build_info.as_ref().map(Capability::BuildScript)
        }
    }
}

/// The closed set of dependency capabilities.
#[derive(Debug)]
pub enum Capability<'a> {
    /// Provides a compiled crate
    Crate(&'a CrateProvider),
    /// Provides native library files to classify and link
    NativeLibrary(&'a [PathBuf]),
    /// Provides build-script output files
    BuildScript(&'a BuildInfo),
}

/// A direct dependency addressed under its local name.
///
/// The name differs from the crate's own when an alias was declared.
#[derive(Debug, Clone)]
pub struct AliasedCrate {
    /// Name the dependent crate uses to refer to this dependency
    pub name: String,

    /// The dependency's crate descriptor
    pub info: Arc<CrateInfo>,
}

/// Aggregated dependency graph for one target.
///
/// All sets are append-only unions built bottom-up from children and never
/// mutated after collection. The dynamic-library set preserves topological
/// order because link-time resolution is order-sensitive; the remaining
/// sets are order-insensitive deduplicated unions.
#[derive(Debug, Clone, Default)]
pub struct DepInfo {
    /// Direct dependencies, name-tagged, in declaration order
    pub direct_crates: Vec<AliasedCrate>,

    /// Every crate reachable from this target
    pub transitive_crates: TransitiveSet<Arc<CrateInfo>>,

    /// Native dynamic libraries, children's libraries first
    pub transitive_dylibs: TransitiveSet<PathBuf>,

    /// Native static libraries
    pub transitive_staticlibs: TransitiveSet<PathBuf>,

    /// Every output file reachable from this target
    pub transitive_files: TransitiveSet<PathBuf>,

    /// Build-script outputs reachable from this target
    pub transitive_build_infos: TransitiveSet<BuildInfo>,

    /// Environment file exposed by this target's build script to dependents
    pub dep_env: Option<PathBuf>,
}
