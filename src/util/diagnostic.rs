//! Fatal configuration errors.
//!
//! Every error here is raised synchronously, before any action is
//! registered: there are no retries and no partial output. Messages always
//! name the offending target label (and dependency, where one exists) so
//! the caller can fix the declaration.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error that aborts target configuration entirely.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A proc-macro crate was declared in the plain dependency list.
    #[error("`{dep}` is a proc-macro crate and must appear in proc_macro_deps of `{target}`, not deps")]
    #[diagnostic(
        code(capstan::deps::misplaced_proc_macro),
        help("move `{dep}` from deps to proc_macro_deps")
    )]
    MisplacedProcMacro { target: String, dep: String },

    /// A non-proc-macro crate was declared in the proc-macro list.
    #[error("`{dep}` in proc_macro_deps of `{target}` is a {kind} crate, not a proc-macro")]
    #[diagnostic(
        code(capstan::deps::not_a_proc_macro),
        help("move `{dep}` from proc_macro_deps to deps")
    )]
    NotAProcMacro {
        target: String,
        dep: String,
        kind: String,
    },

    /// A dependency exposing none of the recognized capabilities.
    #[error(
        "dependency `{dep}` of `{target}` provides neither a crate, native libraries, nor build script outputs"
    )]
    #[diagnostic(code(capstan::deps::unrecognized_dependency))]
    UnrecognizedDependency { target: String, dep: String },

    /// More than one build-script dependency in the target's dependency set.
    #[error("target `{target}` has multiple build script dependencies: `{first}` and `{second}`")]
    #[diagnostic(
        code(capstan::deps::duplicate_build_script),
        help("a target may consume at most one build script")
    )]
    DuplicateBuildScript {
        target: String,
        first: String,
        second: String,
    },

    /// The active compilation mode is absent from the toolchain's table.
    #[error("unknown compilation mode `{mode}` for `{target}` (toolchain defines: {known})")]
    #[diagnostic(code(capstan::args::unknown_compilation_mode))]
    UnknownCompilationMode {
        target: String,
        mode: String,
        known: String,
    },

    /// Runtime library search paths requested on an OS without support.
    #[error(
        "runtime library search paths are not supported on `{os}`, required by `{target}` for dynamic libraries: {libs}"
    )]
    #[diagnostic(
        code(capstan::link::rpaths_unsupported),
        help("link the libraries statically or target an OS with rpath support")
    )]
    RpathsUnsupported {
        target: String,
        os: String,
        libs: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_name_target_and_dependency() {
        let err = ConfigError::MisplacedProcMacro {
            target: "//app:main".to_string(),
            dep: "//macros:derive".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("//app:main"));
        assert!(msg.contains("//macros:derive"));
        assert!(msg.contains("proc_macro_deps"));
    }

    #[test]
    fn test_duplicate_build_script_names_both() {
        let err = ConfigError::DuplicateBuildScript {
            target: "//app:main".to_string(),
            first: "//app:build".to_string(),
            second: "//app:build2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("//app:build"));
        assert!(msg.contains("//app:build2"));
    }

    #[test]
    fn test_unknown_mode_lists_known_modes() {
        let err = ConfigError::UnknownCompilationMode {
            target: "//app:main".to_string(),
            mode: "profile".to_string(),
            known: "dbg, opt".to_string(),
        };
        assert!(err.to_string().contains("dbg, opt"));
    }
}
