//! Build-script output gathering.
//!
//! A build script runs as a separate action; this core only consumes the
//! files it produced. `gather` folds those files into the shape the
//! argument builder and the action's input set expect.

use std::path::PathBuf;

use crate::core::provider::BuildInfo;

/// Build-script contributions to a compile action.
#[derive(Debug, Clone, Default)]
pub struct BuildScriptInputs {
    /// Extra files the action must depend on
    pub compile_inputs: Vec<PathBuf>,

    /// The build script's working-directory path, if one exists
    pub out_dir: Option<String>,

    /// Environment file to apply to the rustc invocation
    pub build_env_file: Option<PathBuf>,

    /// Extra compiler-flags files, in application order
    pub build_flags_files: Vec<PathBuf>,
}

/// Fold a target's build-script outputs into action inputs.
///
/// The compiler-flags file is applied before the link-flags file; both go
/// through the wrapper's flags-file mechanism. With no build script every
/// field is empty.
pub fn gather(build_info: Option<&BuildInfo>) -> BuildScriptInputs {
    let Some(info) = build_info else {
        return BuildScriptInputs::default();
    };

    BuildScriptInputs {
        compile_inputs: vec![info.out_dir.clone(), info.link_flags.clone()],
        out_dir: Some(info.out_dir.display().to_string()),
        build_env_file: Some(info.rustc_env.clone()),
        build_flags_files: vec![info.rustc_flags.clone(), info.link_flags.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_build_script_yields_empty_inputs() {
        let inputs = gather(None);
        assert!(inputs.compile_inputs.is_empty());
        assert!(inputs.out_dir.is_none());
        assert!(inputs.build_env_file.is_none());
        assert!(inputs.build_flags_files.is_empty());
    }

    #[test]
    fn test_build_script_files_and_order() {
        let info = BuildInfo {
            out_dir: PathBuf::from("out/build.d"),
            rustc_flags: PathBuf::from("out/flags"),
            link_flags: PathBuf::from("out/link_flags"),
            rustc_env: PathBuf::from("out/env"),
            dep_env: None,
        };
        let inputs = gather(Some(&info));

        assert_eq!(
            inputs.compile_inputs,
            vec![PathBuf::from("out/build.d"), PathBuf::from("out/link_flags")]
        );
        assert_eq!(inputs.out_dir.as_deref(), Some("out/build.d"));
        assert_eq!(inputs.build_env_file, Some(PathBuf::from("out/env")));
        // Compiler flags apply before link flags.
        assert_eq!(
            inputs.build_flags_files,
            vec![PathBuf::from("out/flags"), PathBuf::from("out/link_flags")]
        );
    }
}
