use crate::utils::parser::parse_ng;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The ozsolve developers",
    version,
    about = "oz - solve the Ornstein-Zernike equation for hard-sphere fluids and primitive-model electrolytes.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hard-sphere fluid with one or more identical species (HNC or MSA).
    Hs(HsArgs),
    /// Two-species primitive-model electrolyte with unequal like/unlike cores.
    Urpm(UrpmArgs),
    /// Run any model and closure described by a TOML run file.
    Run(RunArgs),
}

/// Grid and iteration controls shared by the model subcommands.
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Picard mixing fraction
    #[arg(long, default_value_t = 0.2, value_name = "FLOAT")]
    pub alpha: f64,

    /// Number of Picard steps before history-weighted mixing starts
    #[arg(long, default_value_t = 6, value_name = "INT")]
    pub npic: usize,

    /// Length of the iterate history
    #[arg(long, default_value_t = 6, value_name = "INT")]
    pub nps: usize,

    /// Maximum number of iterations
    #[arg(long, default_value_t = 100, value_name = "INT")]
    pub maxsteps: usize,

    /// Convergence tolerance on the iteration error
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,
}

/// Arguments for the `hs` subcommand.
#[derive(Args, Debug)]
pub struct HsArgs {
    /// Number of components (species)
    #[arg(long, default_value_t = 1, value_name = "INT")]
    pub ncomp: usize,

    /// Number of grid points; powers may be written as 2^16
    #[arg(long, default_value = "65536", value_parser = parse_ng, value_name = "INT")]
    pub ng: usize,

    /// Grid spacing
    #[arg(long, default_value_t = 1e-3, value_name = "FLOAT")]
    pub deltar: f64,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Hard core diameter
    #[arg(long, default_value_t = 1.0, value_name = "FLOAT")]
    pub sigma: f64,

    /// Packing fraction
    #[arg(long, default_value_t = 0.3, value_name = "FLOAT")]
    pub eta: f64,

    /// Use MSA (default HNC)
    #[arg(long)]
    pub msa: bool,
}

/// Arguments for the `urpm` subcommand.
#[derive(Args, Debug)]
pub struct UrpmArgs {
    /// Number of grid points; powers may be written as 2^12
    #[arg(long, default_value = "4096", value_parser = parse_ng, value_name = "INT")]
    pub ng: usize,

    /// Grid spacing
    #[arg(long, default_value_t = 0.01, value_name = "FLOAT")]
    pub deltar: f64,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Bjerrum length
    #[arg(long, default_value_t = 1.0, value_name = "FLOAT")]
    pub lb: f64,

    /// Like charge size
    #[arg(long, default_value_t = 1.0, value_name = "FLOAT")]
    pub sigma: f64,

    /// Unlike charge size
    #[arg(long, default_value_t = 1.5, value_name = "FLOAT")]
    pub sigmap: f64,

    /// Total charge density
    #[arg(long, default_value_t = 0.1, value_name = "FLOAT")]
    pub rhoz: f64,

    /// Use RPA (default HNC)
    #[arg(long)]
    pub rpa: bool,

    /// Use EXP refinement on top of an RPA solution
    #[arg(long)]
    pub exp: bool,

    /// Use U_short rather than the full potential in the closure
    #[arg(long)]
    pub ushort: bool,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the run file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hs_defaults_follow_classic_driver() {
        let cli = Cli::parse_from(["oz", "hs"]);
        let Commands::Hs(args) = cli.command else {
            panic!("expected hs subcommand");
        };
        assert_eq!(args.ncomp, 1);
        assert_eq!(args.ng, 65536);
        assert_eq!(args.deltar, 1e-3);
        assert_eq!(args.eta, 0.3);
        assert_eq!(args.solver.alpha, 0.2);
        assert_eq!(args.solver.maxsteps, 100);
        assert!(!args.msa);
    }

    #[test]
    fn ng_accepts_power_notation() {
        let cli = Cli::parse_from(["oz", "-vv", "urpm", "--ng", "2^10", "--exp", "--ushort"]);
        assert_eq!(cli.verbose, 2);
        let Commands::Urpm(args) = cli.command else {
            panic!("expected urpm subcommand");
        };
        assert_eq!(args.ng, 1024);
        assert!(args.exp);
        assert!(args.ushort);
        assert_eq!(args.sigmap, 1.5);
        assert_eq!(args.rhoz, 0.1);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["oz", "-q", "-v", "hs"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_requires_config_path() {
        assert!(Cli::try_parse_from(["oz", "run"]).is_err());
        let cli = Cli::parse_from(["oz", "run", "--config", "urpm.toml"]);
        assert!(matches!(cli.command, Commands::Run(RunArgs { .. })));
    }
}
