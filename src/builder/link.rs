//! Link flag assembly.
//!
//! Computes runtime search paths and the crate/native link flag sections
//! of a rustc invocation. Flag order within each section follows the
//! aggregate sets' insertion order, so identical inputs always render
//! identical flags.

use std::path::{Path, PathBuf};

use crate::core::crate_info::CrateType;
use crate::core::provider::DepInfo;
use crate::core::toolchain::{CcToolchain, RustToolchain};
use crate::util::{ConfigError, TransitiveSet};

/// Runtime library search paths for the output binary, one per distinct
/// directory holding a transitive dynamic library, relative to the output
/// directory.
///
/// Empty when there are no transitive dynamic libraries. Fatal when the
/// target OS cannot relocate runtime search paths.
pub fn rpaths(
    label: &str,
    toolchain: &RustToolchain,
    output_dir: &Path,
    dep_info: &DepInfo,
) -> Result<Vec<PathBuf>, ConfigError> {
    if dep_info.transitive_dylibs.is_empty() {
        return Ok(Vec::new());
    }
    if !toolchain.supports_rpaths() {
        let libs = dep_info
            .transitive_dylibs
            .iter()
            .map(|l| l.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ConfigError::RpathsUnsupported {
            target: label.to_string(),
            os: toolchain.target_os.clone(),
            libs,
        });
    }

    let mut dirs: TransitiveSet<PathBuf> = TransitiveSet::new();
    for lib in &dep_info.transitive_dylibs {
        if let Some(parent) = lib.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }

    Ok(dirs
        .iter()
        .map(|dir| pathdiff::diff_paths(dir, output_dir).unwrap_or_else(|| dir.clone()))
        .collect())
}

/// Extern and dependency-search-path flags for the crate graph.
///
/// Emitted unconditionally, even when not linking: downstream consumers
/// still need to locate dependency artifacts.
pub fn crate_link_flags(dep_info: &DepInfo) -> Vec<String> {
    let mut flags = Vec::new();

    for direct in &dep_info.direct_crates {
        flags.push("--extern".to_string());
        flags.push(format!(
            "{}={}",
            direct.name.replace('-', "_"),
            direct.info.output.display()
        ));
    }

    let mut dirs: TransitiveSet<PathBuf> = TransitiveSet::new();
    for krate in &dep_info.transitive_crates {
        if let Some(parent) = krate.output.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }
    for dir in &dirs {
        flags.push(format!("-Ldependency={}", dir.display()));
    }

    flags
}

/// Native library search-path and name flags.
///
/// Pure library crate types stop after search paths; everything else names
/// every transitive library and then links the C/C++ runtime support
/// libraries, dynamically for shared-library crate types and statically
/// otherwise.
pub fn native_link_flags(
    dep_info: &DepInfo,
    crate_type: CrateType,
    cc_toolchain: &dyn CcToolchain,
) -> Vec<String> {
    let mut flags = Vec::new();

    let mut dirs: TransitiveSet<PathBuf> = TransitiveSet::new();
    for lib in dep_info
        .transitive_dylibs
        .iter()
        .chain(dep_info.transitive_staticlibs.iter())
    {
        if let Some(parent) = lib.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }
    for dir in &dirs {
        flags.push(format!("-Lnative={}", dir.display()));
    }

    if crate_type.defers_linking() {
        return flags;
    }

    for lib in &dep_info.transitive_dylibs {
        flags.push(format!("-ldylib={}", lib_name(lib)));
    }
    for lib in &dep_info.transitive_staticlibs {
        flags.push(format!("-lstatic={}", lib_name(lib)));
    }

    let (runtime_libs, runtime_kind) = if crate_type.links_runtime_dynamically() {
        (cc_toolchain.dynamic_runtime_libraries(), "dylib")
    } else {
        (cc_toolchain.static_runtime_libraries(), "static")
    };

    let mut runtime_dirs: TransitiveSet<PathBuf> = TransitiveSet::new();
    for lib in runtime_libs {
        if let Some(parent) = lib.parent() {
            runtime_dirs.insert(parent.to_path_buf());
        }
    }
    for dir in &runtime_dirs {
        flags.push(format!("-Lnative={}", dir.display()));
    }
    for lib in runtime_libs {
        flags.push(format!("-l{}={}", runtime_kind, lib_name(lib)));
    }

    flags
}

/// Extract the linkable name from a library filename: the `lib` prefix and
/// everything from the first extension onward are stripped, so versioned
/// names like `libfoo.so.2` resolve to `foo`.
pub fn lib_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .split_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&file_name);
    stem.strip_prefix("lib").unwrap_or(stem).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::crate_info::CrateInfo;
    use crate::core::provider::AliasedCrate;
    use crate::core::toolchain::SystemLinker;

    fn toolchain(os: &str) -> RustToolchain {
        RustToolchain::from_toml_str(&format!(
            r#"
                target_triple = "x86_64-unknown-linux-gnu"
                target_arch = "x86_64"
                target_os = "{os}"
                rustc = "toolchain/bin/rustc"
                process_wrapper = "toolchain/bin/process_wrapper"
                dylib_ext = ".so"
                staticlib_ext = ".a"

                [compilation_modes.dbg]
                opt_level = "0"
                debug_info = "2"
            "#
        ))
        .unwrap()
    }

    fn dep_info_with_dylibs(libs: &[&str]) -> DepInfo {
        let mut dep_info = DepInfo::default();
        for lib in libs {
            dep_info.transitive_dylibs.insert(PathBuf::from(lib));
        }
        dep_info
    }

    #[test]
    fn test_lib_name_strips_prefix_and_versioned_extension() {
        assert_eq!(lib_name(Path::new("out/libfoo.so")), "foo");
        assert_eq!(lib_name(Path::new("out/libfoo.so.2")), "foo");
        assert_eq!(lib_name(Path::new("out/libfoo.a")), "foo");
        assert_eq!(lib_name(Path::new("out/foo.a")), "foo");
    }

    #[test]
    fn test_rpaths_empty_without_dylibs() {
        let paths = rpaths(
            "//app:main",
            &toolchain("windows"),
            Path::new("out"),
            &DepInfo::default(),
        )
        .unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_rpaths_fatal_on_unsupported_os() {
        let dep_info = dep_info_with_dylibs(&["out/deps/libfoo.so"]);
        let err = rpaths(
            "//app:main",
            &toolchain("windows"),
            Path::new("out"),
            &dep_info,
        )
        .unwrap_err();
        match err {
            ConfigError::RpathsUnsupported { ref os, ref libs, .. } => {
                assert_eq!(os, "windows");
                assert!(libs.contains("libfoo.so"));
            }
            other => panic!("expected RpathsUnsupported, got {other}"),
        }
    }

    #[test]
    fn test_rpaths_relative_and_deduplicated() {
        let dep_info = dep_info_with_dylibs(&[
            "out/deps/libfoo.so",
            "out/deps/libbar.so",
            "out/other/libbaz.so",
        ]);
        let paths = rpaths("//app:main", &toolchain("linux"), Path::new("out"), &dep_info)
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("deps"), PathBuf::from("other")]);
    }

    #[test]
    fn test_crate_link_flags_extern_and_search_paths() {
        let lib = Arc::new(CrateInfo::new(
            "my-lib",
            crate::core::crate_info::CrateType::Rlib,
            "2018",
            "lib/lib.rs",
            "out/lib/libmy_lib.rlib",
        ));
        let mut dep_info = DepInfo::default();
        dep_info.direct_crates.push(AliasedCrate {
            name: "my-lib".to_string(),
            info: Arc::clone(&lib),
        });
        dep_info.transitive_crates.insert(lib);

        let flags = crate_link_flags(&dep_info);
        assert_eq!(
            flags,
            vec![
                "--extern".to_string(),
                "my_lib=out/lib/libmy_lib.rlib".to_string(),
                "-Ldependency=out/lib".to_string(),
            ]
        );
    }

    #[test]
    fn test_native_link_flags_stop_for_pure_libraries() {
        let mut dep_info = dep_info_with_dylibs(&["out/deps/libfoo.so"]);
        dep_info
            .transitive_staticlibs
            .insert(PathBuf::from("out/deps/libbar.a"));

        let linker = SystemLinker::default();
        let flags = native_link_flags(&dep_info, CrateType::Rlib, &linker);
        assert_eq!(flags, vec!["-Lnative=out/deps".to_string()]);
    }

    #[test]
    fn test_native_link_flags_name_every_library() {
        let mut dep_info = dep_info_with_dylibs(&["out/deps/libfoo.so"]);
        dep_info
            .transitive_staticlibs
            .insert(PathBuf::from("out/deps/libbar.a"));

        let linker = SystemLinker {
            static_runtime_libs: vec![PathBuf::from("cc/libstdc++.a")],
            ..Default::default()
        };
        let flags = native_link_flags(&dep_info, CrateType::Bin, &linker);
        assert_eq!(
            flags,
            vec![
                "-Lnative=out/deps".to_string(),
                "-ldylib=foo".to_string(),
                "-lstatic=bar".to_string(),
                "-Lnative=cc".to_string(),
                "-lstatic=stdc++".to_string(),
            ]
        );
    }

    #[test]
    fn test_shared_crate_types_link_runtime_dynamically() {
        let dep_info = DepInfo::default();
        let linker = SystemLinker {
            dynamic_runtime_libs: vec![PathBuf::from("cc/libstdc++.so.6")],
            static_runtime_libs: vec![PathBuf::from("cc/libstdc++.a")],
            ..Default::default()
        };

        let cdylib = native_link_flags(&dep_info, CrateType::Cdylib, &linker);
        assert!(cdylib.contains(&"-ldylib=stdc++".to_string()));

        let bin = native_link_flags(&dep_info, CrateType::Bin, &linker);
        assert!(bin.contains(&"-lstatic=stdc++".to_string()));
    }

    #[test]
    fn test_duplicate_static_dynamic_paths_not_deconflicted() {
        // A library present in both forms keeps both name flags; no
        // precedence is inferred between them.
        let mut dep_info = dep_info_with_dylibs(&["out/deps/libz.so"]);
        dep_info
            .transitive_staticlibs
            .insert(PathBuf::from("out/deps/libz.a"));

        let linker = SystemLinker::default();
        let flags = native_link_flags(&dep_info, CrateType::Bin, &linker);
        assert_eq!(
            flags,
            vec![
                "-Lnative=out/deps".to_string(),
                "-ldylib=z".to_string(),
                "-lstatic=z".to_string(),
            ]
        );
    }
}
