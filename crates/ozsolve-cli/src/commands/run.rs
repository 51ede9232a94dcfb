use crate::cli::RunArgs;
use crate::error::Result;
use ozsolve::core::params::RunParams;
use tracing::info;

pub fn run(args: RunArgs, show_progress: bool) -> Result<i32> {
    info!(path = %args.config.display(), "Loading run file.");
    let params = RunParams::load(&args.config)?;
    super::execute(&params, show_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn runs_a_toml_description() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            r#"
            closure = "hnc"
            [grid]
            ng = 2048
            deltar = 0.01
            [iteration]
            alpha = 0.25
            [model]
            type = "urpm"
            lb = 1.0
            sigma = 1.0
            sigmap = 1.0
            use-short = true
            [species]
            rho = [0.05, 0.05]
            "#,
        )
        .unwrap();
        assert_eq!(run(RunArgs { config: path }, false).unwrap(), 0);
    }

    #[test]
    fn missing_run_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = run(
            RunArgs {
                config: dir.path().join("nope.toml"),
            },
            false,
        );
        assert!(matches!(result, Err(CliError::RunFile(_))));
    }

    #[test]
    fn invalid_model_is_an_engine_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            r#"
            closure = "msa"
            [grid]
            ng = 256
            deltar = 0.01
            [model]
            type = "urpm"
            lb = 1.0
            sigma = 1.0
            sigmap = 1.5
            [species]
            rho = [0.1]
            "#,
        )
        .unwrap();
        assert!(matches!(
            run(RunArgs { config: path }, false),
            Err(CliError::Engine(_))
        ));
    }
}
