//! Rustc argument and environment construction.
//!
//! Builds the full command line for exactly one compiler invocation, run
//! through the toolchain's process wrapper. Flag order is fixed and fully
//! specified: identical logical inputs must yield byte-identical argument
//! sequences and environment maps, or remote caching breaks.
//!
//! The wrapper prelude uses `--env-file`, `--arg-file`, `--subst`,
//! `--copy-output` and `--touch-file` directives, terminated by `--` and
//! the rustc path. The working directory is unknown at construction time
//! and referenced as `${pwd}`, substituted at execution time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::link;
use crate::core::crate_info::{CrateInfo, CrateType};
use crate::core::provider::{Capability, DepInfo};
use crate::core::toolchain::{CcToolchain, RustToolchain};
use crate::util::ConfigError;

/// Resolves user-authored location substitutions in environment values.
///
/// The host build system owns the substitution syntax; this core hands it
/// the raw value and the files of the target's data dependencies.
pub trait LocationExpander {
    /// Expand substitutions in `value` against the referenced data files.
    fn expand(&self, value: &str, data_files: &[PathBuf]) -> String;
}

/// Pass environment values through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExpansion;

impl LocationExpander for NoExpansion {
    fn expand(&self, value: &str, _data_files: &[PathBuf]) -> String {
        value.to_string()
    }
}

/// The default set of outputs rustc is asked to emit.
pub const DEFAULT_EMIT: &[&str] = &["dep-info", "link"];

/// Everything the argument builder needs for one invocation.
pub struct InvocationRequest<'a> {
    /// Label of the target being compiled, for error messages
    pub label: &'a str,

    /// Rust toolchain descriptor
    pub toolchain: &'a RustToolchain,

    /// Native toolchain service, consulted when a final link is produced
    pub cc_toolchain: &'a dyn CcToolchain,

    /// The crate being compiled
    pub crate_info: &'a CrateInfo,

    /// Aggregated dependency graph
    pub dep_info: &'a DepInfo,

    /// Crate type for this invocation (usually the crate's own)
    pub crate_type: CrateType,

    /// Active compilation mode, looked up in the toolchain's option table
    pub compilation_mode: &'a str,

    /// Pre-hashed disambiguation suffix for metadata and artifact names
    pub output_hash: Option<&'a str>,

    /// Diagnostic format override
    pub error_format: Option<&'a str>,

    /// Caller-supplied extra compiler flags
    pub extra_flags: &'a [String],

    /// Directory rustc writes artifacts into
    pub output_dir: &'a Path,

    /// Environment files applied by the wrapper, in order
    pub build_env_files: &'a [PathBuf],

    /// Flags files applied by the wrapper, in order
    pub build_flags_files: &'a [PathBuf],

    /// Output kinds for `--emit`
    pub emit: &'a [String],

    /// Build-script working directory, when one exists
    pub out_dir: Option<&'a str>,

    /// Marker file for linting callers; touched after a successful run
    pub touch_file: Option<&'a Path>,

    /// Environment substitution service
    pub expander: &'a dyn LocationExpander,
}

/// The constructed argument sequence and environment for one rustc run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Ordered process-wrapper and rustc arguments
    pub args: Vec<String>,

    /// Environment for the invocation
    pub env: BTreeMap<String, String>,
}

/// Build the ordered argument sequence and environment for one rustc
/// invocation.
pub fn build_invocation(req: &InvocationRequest<'_>) -> Result<Invocation, ConfigError> {
    let toolchain = req.toolchain;
    let crate_info = req.crate_info;

    let mode = toolchain.mode_options(req.compilation_mode).ok_or_else(|| {
        ConfigError::UnknownCompilationMode {
            target: req.label.to_string(),
            mode: req.compilation_mode.to_string(),
            known: toolchain.known_modes(),
        }
    })?;

    let mut args: Vec<String> = Vec::new();
    let mut env = base_env(req);

    // Wrapper prelude.
    for file in req.build_env_files {
        args.push("--env-file".to_string());
        args.push(file.display().to_string());
    }
    for file in req.build_flags_files {
        args.push("--arg-file".to_string());
        args.push(file.display().to_string());
    }
    args.push("--subst".to_string());
    args.push("pwd=${pwd}".to_string());

    // rustc derives the emitted filename from the sanitized crate name;
    // when the declared output differs, rename after compilation.
    let crate_name = crate_info.sanitized_name();
    let emitted = rustc_output_name(&crate_name, req.crate_type, toolchain, req.output_hash);
    let declared = crate_info
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if declared != emitted {
        args.push("--copy-output".to_string());
        args.push(req.output_dir.join(&emitted).display().to_string());
        args.push(crate_info.output.display().to_string());
    }

    if let Some(touch) = req.touch_file {
        args.push("--touch-file".to_string());
        args.push(touch.display().to_string());
    }

    args.push("--".to_string());
    args.push(toolchain.rustc.display().to_string());

    // Core compiler flags, fixed order.
    args.push(crate_info.root.display().to_string());
    args.push(format!("--crate-name={crate_name}"));
    args.push(format!("--crate-type={}", req.crate_type));
    if let Some(format) = req.error_format {
        args.push(format!("--error-format={format}"));
    }
    if let Some(hash) = req.output_hash {
        args.push(format!("-Cmetadata={hash}"));
    }
    args.push(format!("--out-dir={}", req.output_dir.display()));
    if let Some(hash) = req.output_hash {
        args.push(format!("-Cextra-filename=-{hash}"));
    }
    args.push(format!("-Copt-level={}", mode.opt_level));
    args.push(format!("-Cdebuginfo={}", mode.debug_info));
    args.push("--remap-path-prefix=${pwd}=.".to_string());
    args.push(format!("--emit={}", req.emit.join(",")));
    args.push("--color=always".to_string());
    args.push(format!("--target={}", toolchain.target_triple));
    for feature in &crate_info.features {
        args.push("--cfg".to_string());
        args.push(format!("feature=\"{feature}\""));
    }
    if let Some(ref script) = crate_info.linker_script {
        args.push(format!("-Clink-arg=-T{}", script.display()));
    }
    for dir in toolchain.std_library_dirs() {
        args.push(format!("-L{}", dir.display()));
    }
    args.extend(req.extra_flags.iter().cloned());
    args.extend(crate_info.rustc_flags.iter().cloned());
    if crate_info.needs_edition_flag() {
        args.push(format!("--edition={}", crate_info.edition));
    }

    // Final link section. WebAssembly targets use rustc's built-in linker
    // and skip the external toolchain entirely.
    let wants_link = req.emit.iter().any(|e| e == "link");
    if wants_link && toolchain.has_native_linker() {
        let rpaths = link::rpaths(req.label, toolchain, req.output_dir, req.dep_info)?;
        let linker = req.cc_toolchain.link_executable(&rpaths);
        env.extend(linker.env);
        args.push(format!("-Clinker={}", linker.tool.display()));
        if !linker.args.is_empty() {
            args.push(format!("-Clink-args={}", linker.args.join(" ")));
        }
        args.extend(link::native_link_flags(
            req.dep_info,
            req.crate_type,
            req.cc_toolchain,
        ));
    }

    // Dependency location flags, emitted even when not linking.
    args.extend(link::crate_link_flags(req.dep_info));

    if req.crate_type.is_proc_macro() && crate_info.needs_edition_flag() {
        args.push("--extern".to_string());
        args.push("proc_macro".to_string());
    }

    // Let test targets locate sibling binaries by name.
    for dep in &crate_info.data {
        if let Some(Capability::Crate(provider)) = dep.capability() {
            let info = &provider.crate_info;
            if info.crate_type == CrateType::Bin {
                env.insert(
                    format!("CARGO_BIN_EXE_{}", info.name),
                    info.output.display().to_string(),
                );
            }
        }
    }

    let files = data_files(crate_info);
    for (key, value) in &crate_info.rustc_env {
        env.insert(key.clone(), req.expander.expand(value, &files));
    }

    // Strict invocation linting requires the variable to exist.
    env.insert("SYSROOT".to_string(), String::new());

    Ok(Invocation { args, env })
}

/// The environment base every invocation starts from.
fn base_env(req: &InvocationRequest<'_>) -> BTreeMap<String, String> {
    let toolchain = req.toolchain;
    let crate_info = req.crate_info;
    let mut env = BTreeMap::new();

    env.insert(
        "CARGO_CFG_TARGET_ARCH".to_string(),
        toolchain.target_arch.clone(),
    );
    env.insert(
        "CARGO_CFG_TARGET_OS".to_string(),
        toolchain.target_os.clone(),
    );
    env.insert("CARGO_PKG_NAME".to_string(), crate_info.name.clone());

    let version = crate_info.version.as_deref().unwrap_or("0.0.0");
    let (major, minor, patch, pre) = version_parts(version);
    env.insert("CARGO_PKG_VERSION".to_string(), version.to_string());
    env.insert("CARGO_PKG_VERSION_MAJOR".to_string(), major);
    env.insert("CARGO_PKG_VERSION_MINOR".to_string(), minor);
    env.insert("CARGO_PKG_VERSION_PATCH".to_string(), patch);
    env.insert("CARGO_PKG_VERSION_PRE".to_string(), pre);

    if let Some(out_dir) = req.out_dir {
        env.insert("OUT_DIR".to_string(), format!("${{pwd}}/{out_dir}"));
    }

    env
}

/// Split a version string into (major, minor, patch, pre-release) by the
/// first two `.` separators, then a `-` within the patch segment. Applied
/// literally: non-semver strings pass through without validation.
fn version_parts(version: &str) -> (String, String, String, String) {
    let mut pieces = version.splitn(3, '.');
    let major = pieces.next().unwrap_or_default();
    let minor = pieces.next().unwrap_or_default();
    let rest = pieces.next().unwrap_or_default();
    let (patch, pre) = match rest.split_once('-') {
        Some((patch, pre)) => (patch, pre),
        None => (rest, ""),
    };
    (
        major.to_string(),
        minor.to_string(),
        patch.to_string(),
        pre.to_string(),
    )
}

/// The filename rustc emits for a crate, before any rename.
fn rustc_output_name(
    crate_name: &str,
    crate_type: CrateType,
    toolchain: &RustToolchain,
    output_hash: Option<&str>,
) -> String {
    let extra = output_hash.map(|h| format!("-{h}")).unwrap_or_default();
    match crate_type {
        CrateType::Bin => format!("{crate_name}{extra}{}", toolchain.binary_ext),
        CrateType::Lib | CrateType::Rlib => format!("lib{crate_name}{extra}.rlib"),
        CrateType::Dylib | CrateType::Cdylib | CrateType::ProcMacro => {
            format!("lib{crate_name}{extra}{}", toolchain.dylib_ext)
        }
        CrateType::Staticlib => format!("lib{crate_name}{extra}{}", toolchain.staticlib_ext),
    }
}

/// Files of the target's data and compile-data dependencies. Used to
/// resolve location substitutions and folded into the action's input set.
pub(crate) fn data_files(crate_info: &CrateInfo) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dep in &crate_info.data {
        match dep.capability() {
            Some(Capability::Crate(provider)) => {
                files.push(provider.crate_info.output.clone());
            }
            Some(Capability::NativeLibrary(libs)) => {
                files.extend(libs.iter().cloned());
            }
            _ => {}
        }
    }
    files.extend(crate_info.compile_data.iter().cloned());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::crate_info::CrateInfo;
    use crate::core::provider::Dependency;
    use crate::core::toolchain::SystemLinker;

    fn toolchain() -> RustToolchain {
        RustToolchain::from_toml_str(
            r#"
                target_triple = "x86_64-unknown-linux-gnu"
                target_arch = "x86_64"
                target_os = "linux"
                rustc = "toolchain/bin/rustc"
                process_wrapper = "toolchain/bin/process_wrapper"
                rust_std = ["toolchain/lib/rustlib/lib/libstd.rlib"]
                dylib_ext = ".so"
                staticlib_ext = ".a"

                [compilation_modes.dbg]
                opt_level = "0"
                debug_info = "2"

                [compilation_modes.opt]
                opt_level = "3"
                debug_info = "0"
            "#,
        )
        .unwrap()
    }

    fn emit_default() -> Vec<String> {
        DEFAULT_EMIT.iter().map(|e| e.to_string()).collect()
    }

    fn request<'a>(
        toolchain: &'a RustToolchain,
        cc: &'a SystemLinker,
        crate_info: &'a CrateInfo,
        dep_info: &'a DepInfo,
        emit: &'a [String],
    ) -> InvocationRequest<'a> {
        InvocationRequest {
            label: "//app:main",
            toolchain,
            cc_toolchain: cc,
            crate_info,
            dep_info,
            crate_type: crate_info.crate_type,
            compilation_mode: "dbg",
            output_hash: None,
            error_format: None,
            extra_flags: &[],
            output_dir: Path::new("out/app"),
            build_env_files: &[],
            build_flags_files: &[],
            emit,
            out_dir: None,
            touch_file: None,
            expander: &NoExpansion,
        }
    }

    #[test]
    fn test_version_parts() {
        assert_eq!(
            version_parts("1.2.3-beta"),
            (
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
                "beta".to_string()
            )
        );
        assert_eq!(
            version_parts("0.10.7"),
            (
                "0".to_string(),
                "10".to_string(),
                "7".to_string(),
                String::new()
            )
        );
        assert_eq!(
            version_parts("7"),
            (
                "7".to_string(),
                String::new(),
                String::new(),
                String::new()
            )
        );
    }

    #[test]
    fn test_invocation_is_deterministic() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app")
            .with_version("1.2.3-beta")
            .with_features(["serde"]);
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let req = request(&tc, &cc, &info, &dep_info, &emit);
        let first = build_invocation(&req).unwrap();
        let second = build_invocation(&req).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_mode_is_fatal() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app");
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.compilation_mode = "profile";
        let err = build_invocation(&req).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCompilationMode { .. }));
        assert!(err.to_string().contains("dbg, opt"));
    }

    #[test]
    fn test_core_flag_order() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new(
            "app",
            CrateType::Lib,
            "2018",
            "app/lib.rs",
            "out/app/libapp.rlib",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.output_hash = Some("abc123");
        let invocation = build_invocation(&req).unwrap();
        let args = &invocation.args;

        let rustc_at = args.iter().position(|a| a == "toolchain/bin/rustc").unwrap();
        assert_eq!(args[rustc_at - 1], "--");
        assert_eq!(args[rustc_at + 1], "app/lib.rs");
        assert_eq!(args[rustc_at + 2], "--crate-name=app");
        assert_eq!(args[rustc_at + 3], "--crate-type=lib");
        assert_eq!(args[rustc_at + 4], "-Cmetadata=abc123");
        assert_eq!(args[rustc_at + 5], "--out-dir=out/app");
        assert_eq!(args[rustc_at + 6], "-Cextra-filename=-abc123");
        assert_eq!(args[rustc_at + 7], "-Copt-level=0");
        assert_eq!(args[rustc_at + 8], "-Cdebuginfo=2");
        assert!(args.contains(&"--emit=dep-info,link".to_string()));
        assert!(args.contains(&"--edition=2018".to_string()));
    }

    #[test]
    fn test_legacy_edition_flag_omitted() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new(
            "app",
            CrateType::Lib,
            "2015",
            "app/lib.rs",
            "out/app/libapp.rlib",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        assert!(!invocation.args.iter().any(|a| a.starts_with("--edition")));
    }

    #[test]
    fn test_rename_directive_for_forbidden_characters() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        // rustc refuses dashes in emitted lib names; the declared output
        // keeps them, so a copy step is required.
        let info = CrateInfo::new(
            "my-app",
            CrateType::Lib,
            "2018",
            "app/lib.rs",
            "out/app/libmy-app.rlib",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        let at = invocation
            .args
            .iter()
            .position(|a| a == "--copy-output")
            .unwrap();
        assert_eq!(invocation.args[at + 1], "out/app/libmy_app.rlib");
        assert_eq!(invocation.args[at + 2], "out/app/libmy-app.rlib");
    }

    #[test]
    fn test_touch_file_and_error_format_placement() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new(
            "my-app",
            CrateType::Lib,
            "2018",
            "app/lib.rs",
            "out/app/libmy-app.rlib",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.touch_file = Some(Path::new("out/app/libmy-app.rlib.ok"));
        req.error_format = Some("json");
        let invocation = build_invocation(&req).unwrap();
        let args = &invocation.args;

        // The touch marker follows the rename directive and precedes the
        // separator.
        let copy_at = args.iter().position(|a| a == "--copy-output").unwrap();
        let touch_at = args.iter().position(|a| a == "--touch-file").unwrap();
        let sep_at = args.iter().position(|a| a == "--").unwrap();
        assert!(copy_at < touch_at);
        assert!(touch_at < sep_at);
        assert_eq!(args[touch_at + 1], "out/app/libmy-app.rlib.ok");

        let crate_type_at = args.iter().position(|a| a == "--crate-type=lib").unwrap();
        assert_eq!(args[crate_type_at + 1], "--error-format=json");
    }

    #[test]
    fn test_no_rename_when_names_agree() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new(
            "app",
            CrateType::Lib,
            "2018",
            "app/lib.rs",
            "out/app/libapp.rlib",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        assert!(!invocation.args.iter().any(|a| a == "--copy-output"));
    }

    #[test]
    fn test_wasm_skips_external_linker() {
        let mut tc = toolchain();
        tc.target_arch = "wasm32".to_string();
        let cc = SystemLinker {
            path: PathBuf::from("/usr/bin/cc"),
            ..Default::default()
        };
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app");
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        assert!(!invocation.args.iter().any(|a| a.starts_with("-Clinker=")));
    }

    #[test]
    fn test_base_env_and_sysroot_placeholder() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app")
            .with_version("1.2.3-beta");
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.out_dir = Some("out/app/build.d");
        let invocation = build_invocation(&req).unwrap();
        let env = &invocation.env;

        assert_eq!(env["CARGO_CFG_TARGET_ARCH"], "x86_64");
        assert_eq!(env["CARGO_CFG_TARGET_OS"], "linux");
        assert_eq!(env["CARGO_PKG_NAME"], "app");
        assert_eq!(env["CARGO_PKG_VERSION"], "1.2.3-beta");
        assert_eq!(env["CARGO_PKG_VERSION_MAJOR"], "1");
        assert_eq!(env["CARGO_PKG_VERSION_MINOR"], "2");
        assert_eq!(env["CARGO_PKG_VERSION_PATCH"], "3");
        assert_eq!(env["CARGO_PKG_VERSION_PRE"], "beta");
        assert_eq!(env["OUT_DIR"], "${pwd}/out/app/build.d");
        assert_eq!(env["SYSROOT"], "");
    }

    #[test]
    fn test_proc_macro_gets_explicit_extern() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new(
            "derive",
            CrateType::ProcMacro,
            "2018",
            "derive/lib.rs",
            "out/derive/libderive.so",
        );
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        let at = invocation
            .args
            .iter()
            .rposition(|a| a == "--extern")
            .unwrap();
        assert_eq!(invocation.args[at + 1], "proc_macro");

        // Legacy edition proc-macros get the library implicitly.
        let legacy = CrateInfo::new(
            "derive",
            CrateType::ProcMacro,
            "2015",
            "derive/lib.rs",
            "out/derive/libderive.so",
        );
        let invocation =
            build_invocation(&request(&tc, &cc, &legacy, &dep_info, &emit)).unwrap();
        assert!(!invocation.args.iter().any(|a| a == "proc_macro"));
    }

    #[test]
    fn test_binary_data_deps_exposed_by_env() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let helper = Arc::new(CrateInfo::new(
            "helper",
            CrateType::Bin,
            "2018",
            "helper/main.rs",
            "out/helper/helper",
        ));
        let mut info = CrateInfo::new(
            "app_test",
            CrateType::Bin,
            "2018",
            "app/test.rs",
            "out/app/app_test",
        )
        .test(true);
        info.data = vec![Dependency::rust_crate(
            "//helper:helper",
            helper,
            Arc::default(),
        )];
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let invocation =
            build_invocation(&request(&tc, &cc, &info, &dep_info, &emit)).unwrap();
        assert_eq!(invocation.env["CARGO_BIN_EXE_helper"], "out/helper/helper");
    }

    #[test]
    fn test_env_values_run_through_expander() {
        struct Upper;
        impl LocationExpander for Upper {
            fn expand(&self, value: &str, _files: &[PathBuf]) -> String {
                value.to_uppercase()
            }
        }

        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app")
            .with_env("DATA", "payload");
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.expander = &Upper;
        let invocation = build_invocation(&req).unwrap();
        assert_eq!(invocation.env["DATA"], "PAYLOAD");
    }

    #[test]
    fn test_wrapper_prelude_order() {
        let tc = toolchain();
        let cc = SystemLinker::default();
        let info = CrateInfo::new("app", CrateType::Bin, "2018", "app/main.rs", "out/app/app");
        let dep_info = DepInfo::default();
        let emit = emit_default();

        let env_files = vec![PathBuf::from("out/env")];
        let flags_files = vec![PathBuf::from("out/flags"), PathBuf::from("out/link_flags")];
        let mut req = request(&tc, &cc, &info, &dep_info, &emit);
        req.build_env_files = &env_files;
        req.build_flags_files = &flags_files;

        let invocation = build_invocation(&req).unwrap();
        assert_eq!(
            &invocation.args[..8],
            &[
                "--env-file",
                "out/env",
                "--arg-file",
                "out/flags",
                "--arg-file",
                "out/link_flags",
                "--subst",
                "pwd=${pwd}",
            ]
        );
    }
}
