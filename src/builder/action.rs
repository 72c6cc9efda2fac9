//! Compile-action orchestration.
//!
//! `build_crate` ties the pipeline together for one target: dependency
//! collection, build-script gathering, argument construction, and finally
//! registration of a single compile action with the host's executor. The
//! orchestrator never touches the filesystem; it only describes work.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::builder::args::{
    build_invocation, InvocationRequest, LocationExpander, DEFAULT_EMIT,
};
use crate::builder::build_script;
use crate::builder::deps::collect_deps;
use crate::builder::interop::{establish_native_interop, NativeInterop};
use crate::core::crate_info::{CrateInfo, CrateType};
use crate::core::provider::{Capability, DepInfo};
use crate::core::toolchain::{CcToolchain, RustToolchain};
use crate::util::{ConfigError, TransitiveSet};
use std::collections::BTreeMap;

/// One fully-described compiler invocation, ready for an executor.
#[derive(Debug, Clone, Serialize)]
pub struct CompileAction {
    /// The executable to run (the toolchain's process wrapper)
    pub executable: PathBuf,

    /// Ordered arguments, wrapper directives first
    pub args: Vec<String>,

    /// Environment for the invocation
    pub env: BTreeMap<String, String>,

    /// Every file the action reads
    pub inputs: Vec<PathBuf>,

    /// Every file the action produces
    pub outputs: Vec<PathBuf>,

    /// Human-readable progress line
    pub progress_message: String,
}

/// Where constructed actions go.
///
/// The host build system implements this; the orchestrator only calls
/// `register` once per target.
pub trait ActionRegistrar {
    /// Accept a fully-constructed compile action.
    fn register(&mut self, action: CompileAction);
}

/// A registrar that records actions, for inspection and export.
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: Vec<CompileAction>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded actions, in registration order.
    pub fn actions(&self) -> &[CompileAction] {
        &self.actions
    }

    /// Serialize the recorded actions as pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.actions)?)
    }
}

impl ActionRegistrar for ActionLog {
    fn register(&mut self, action: CompileAction) {
        self.actions.push(action);
    }
}

/// Everything needed to construct one target's compile action.
pub struct BuildRequest<'a> {
    /// Label of the target being built
    pub label: &'a str,

    /// The crate to compile
    pub crate_info: Arc<CrateInfo>,

    /// Rust toolchain descriptor
    pub toolchain: &'a RustToolchain,

    /// Native toolchain service
    pub cc_toolchain: &'a dyn CcToolchain,

    /// Active compilation mode
    pub compilation_mode: &'a str,

    /// Directory rustc writes artifacts into
    pub output_dir: PathBuf,

    /// Pre-hashed disambiguation suffix, when the host assigns one
    pub output_hash: Option<&'a str>,

    /// Diagnostic format override
    pub error_format: Option<&'a str>,

    /// Caller-supplied extra compiler flags
    pub extra_flags: &'a [String],

    /// Environment substitution service
    pub expander: &'a dyn LocationExpander,

    /// Native interop descriptors of this target's dependencies, for
    /// export to native consumers
    pub dep_interops: &'a [NativeInterop],
}

/// What a built target exposes to its dependents and to the host.
#[derive(Debug)]
pub struct CrateBundle {
    /// The compiled crate's descriptor
    pub crate_info: Arc<CrateInfo>,

    /// The aggregated dependency graph, including this crate's children
    pub dep_info: Arc<DepInfo>,

    /// Native interop descriptor, when the crate is exportable
    pub interop: Option<NativeInterop>,

    /// Files dependents need at runtime
    pub runfiles: Vec<PathBuf>,

    /// The output, when it is directly executable
    pub executable: Option<PathBuf>,
}

/// Construct and register the compile action for one target.
///
/// Exactly one action is registered per call. Configuration errors are
/// raised before registration, so a failed target registers nothing.
pub fn build_crate(
    registrar: &mut dyn ActionRegistrar,
    req: &BuildRequest<'_>,
) -> Result<CrateBundle, ConfigError> {
    let crate_info = &req.crate_info;

    let (dep_info, build_info) = collect_deps(
        req.label,
        &crate_info.deps,
        &crate_info.proc_macro_deps,
        &crate_info.aliases,
        req.toolchain,
    )?;

    let script = build_script::gather(build_info.as_ref());

    let mut inputs: TransitiveSet<PathBuf> = TransitiveSet::new();
    for src in &crate_info.srcs {
        inputs.insert(src.clone());
    }
    // Data and compile-data files: env expansions resolve against them, so
    // the sandbox must contain them.
    for file in crate::builder::args::data_files(crate_info) {
        inputs.insert(file);
    }
    inputs.merge(&dep_info.transitive_files);
    inputs.insert(req.toolchain.rustc.clone());
    for file in &req.toolchain.rust_std {
        inputs.insert(file.clone());
    }
    for file in &script.compile_inputs {
        inputs.insert(file.clone());
    }
    if let Some(ref file) = script.build_env_file {
        inputs.insert(file.clone());
    }
    for file in &script.build_flags_files {
        inputs.insert(file.clone());
    }
    if let Some(ref script_file) = crate_info.linker_script {
        inputs.insert(script_file.clone());
    }

    let emit: Vec<String> = DEFAULT_EMIT.iter().map(|e| e.to_string()).collect();
    let invocation = build_invocation(&InvocationRequest {
        label: req.label,
        toolchain: req.toolchain,
        cc_toolchain: req.cc_toolchain,
        crate_info,
        dep_info: &dep_info,
        crate_type: crate_info.crate_type,
        compilation_mode: req.compilation_mode,
        output_hash: req.output_hash,
        error_format: req.error_format,
        extra_flags: req.extra_flags,
        output_dir: &req.output_dir,
        build_env_files: script.build_env_file.as_slice(),
        build_flags_files: &script.build_flags_files,
        emit: &emit,
        out_dir: script.out_dir.as_deref(),
        touch_file: None,
        expander: req.expander,
    })?;

    let progress_message = format!(
        "Compiling Rust {} {} v{} ({} files)",
        crate_info.crate_type,
        crate_info.name,
        crate_info.version.as_deref().unwrap_or("0.0.0"),
        crate_info.srcs.len(),
    );
    tracing::info!("{}: registering compile action for `{}`", req.label, crate_info.name);

    registrar.register(CompileAction {
        executable: req.toolchain.process_wrapper.clone(),
        args: invocation.args,
        env: invocation.env,
        inputs: inputs.into_iter().collect(),
        outputs: vec![crate_info.output.clone()],
        progress_message,
    });

    let mut runfiles: Vec<PathBuf> =
        dep_info.transitive_dylibs.iter().cloned().collect();
    for dep in &crate_info.data {
        match dep.capability() {
            Some(Capability::Crate(provider)) => {
                runfiles.push(provider.crate_info.output.clone());
            }
            Some(Capability::NativeLibrary(libs)) => {
                runfiles.extend(libs.iter().cloned());
            }
            _ => {}
        }
    }

    let executable = (crate_info.crate_type == CrateType::Bin
        || crate_info.is_test
        || crate_info.out_binary)
        .then(|| crate_info.output.clone());

    let interop = establish_native_interop(crate_info, req.toolchain, req.dep_interops);

    Ok(CrateBundle {
        crate_info: Arc::clone(crate_info),
        dep_info: Arc::new(dep_info),
        interop,
        runfiles,
        executable,
    })
}
