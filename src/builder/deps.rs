//! Dependency collection and validation.
//!
//! Walks a target's declared dependencies in declaration order, classifies
//! each by capability, and folds the per-dependency graphs into one
//! `DepInfo`. All violations of the dependency invariants are fatal and
//! raised here, before any action is registered.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::provider::{AliasedCrate, BuildInfo, Capability, DepInfo, Dependency};
use crate::core::toolchain::RustToolchain;
use crate::util::ConfigError;

/// Validate and aggregate a target's declared dependencies.
///
/// Plain and proc-macro dependency lists are walked in declaration order;
/// transitive sets are unioned bottom-up, with the dynamic-library set
/// keeping children's libraries ahead of later additions. Returns the
/// aggregated graph and the target's build-script outputs, if any.
pub fn collect_deps(
    label: &str,
    deps: &[Dependency],
    proc_macro_deps: &[Dependency],
    aliases: &BTreeMap<String, String>,
    toolchain: &RustToolchain,
) -> Result<(DepInfo, Option<BuildInfo>), ConfigError> {
    validate_placement(label, deps, proc_macro_deps)?;

    let mut dep_info = DepInfo::default();
    let mut build_info: Option<BuildInfo> = None;
    let mut build_info_label: Option<String> = None;

    for dep in deps.iter().chain(proc_macro_deps.iter()) {
        match dep.capability() {
            Some(Capability::Crate(provider)) => {
                let info = &provider.crate_info;
                let name = aliases
                    .get(dep.label())
                    .cloned()
                    .unwrap_or_else(|| info.name.clone());
                tracing::debug!("{label}: crate dependency `{}` as `{name}`", dep.label());

                dep_info.direct_crates.push(AliasedCrate {
                    name,
                    info: Arc::clone(info),
                });
                dep_info.transitive_crates.insert(Arc::clone(info));
                dep_info
                    .transitive_crates
                    .merge(&provider.dep_info.transitive_crates);
                dep_info
                    .transitive_dylibs
                    .merge_topological(&provider.dep_info.transitive_dylibs);
                dep_info
                    .transitive_staticlibs
                    .merge(&provider.dep_info.transitive_staticlibs);
                dep_info.transitive_files.insert(info.output.clone());
                dep_info
                    .transitive_files
                    .merge(&provider.dep_info.transitive_files);
                dep_info
                    .transitive_build_infos
                    .merge(&provider.dep_info.transitive_build_infos);
            }
            Some(Capability::NativeLibrary(files)) => {
                for file in files {
                    let Some(file_name) = file.file_name().map(|n| n.to_string_lossy().into_owned())
                    else {
                        continue;
                    };
                    if is_dynamic_library(&file_name, &toolchain.dylib_ext) {
                        dep_info.transitive_dylibs.insert(file.clone());
                        dep_info.transitive_files.insert(file.clone());
                    } else if file_name.ends_with(&toolchain.staticlib_ext) {
                        dep_info.transitive_staticlibs.insert(file.clone());
                        dep_info.transitive_files.insert(file.clone());
                    } else {
                        tracing::debug!(
                            "{label}: ignoring non-library file `{file_name}` from `{}`",
                            dep.label()
                        );
                    }
                }
            }
            Some(Capability::BuildScript(info)) => {
                if let Some(ref first) = build_info_label {
                    return Err(ConfigError::DuplicateBuildScript {
                        target: label.to_string(),
                        first: first.clone(),
                        second: dep.label().to_string(),
                    });
                }
                build_info = Some(info.clone());
                build_info_label = Some(dep.label().to_string());
                dep_info.transitive_build_infos.insert(info.clone());
                dep_info.dep_env = info.dep_env.clone();
            }
            None => {
                return Err(ConfigError::UnrecognizedDependency {
                    target: label.to_string(),
                    dep: dep.label().to_string(),
                });
            }
        }
    }

    Ok((dep_info, build_info))
}

/// Enforce proc-macro placement: proc-macro crates belong in the
/// proc-macro list and nothing else does.
fn validate_placement(
    label: &str,
    deps: &[Dependency],
    proc_macro_deps: &[Dependency],
) -> Result<(), ConfigError> {
    for dep in deps {
        if let Some(Capability::Crate(provider)) = dep.capability() {
            if provider.crate_info.crate_type.is_proc_macro() {
                return Err(ConfigError::MisplacedProcMacro {
                    target: label.to_string(),
                    dep: dep.label().to_string(),
                });
            }
        }
    }
    for dep in proc_macro_deps {
        let kind = match dep.capability() {
            Some(Capability::Crate(provider)) => {
                if provider.crate_info.crate_type.is_proc_macro() {
                    continue;
                }
                provider.crate_info.crate_type.to_string()
            }
            Some(Capability::NativeLibrary(_)) => "native library".to_string(),
            Some(Capability::BuildScript(_)) => "build script".to_string(),
            // No capability at all is reported by the classification loop.
            None => continue,
        };
        return Err(ConfigError::NotAProcMacro {
            target: label.to_string(),
            dep: dep.label().to_string(),
            kind,
        });
    }
    Ok(())
}

/// Whether a filename matches the toolchain's dynamic-library extension,
/// tolerating versioned suffixes like `libfoo.so.2`.
fn is_dynamic_library(file_name: &str, dylib_ext: &str) -> bool {
    let versioned = format!("{dylib_ext}.");
    file_name.ends_with(dylib_ext) || file_name.contains(&versioned)
}
