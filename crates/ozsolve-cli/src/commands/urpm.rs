use crate::cli::UrpmArgs;
use crate::error::Result;
use ozsolve::core::closure::Closure;
use ozsolve::core::params::{GridParams, RunParams, SpeciesParams};
use ozsolve::core::potentials::PotentialModel;
use tracing::info;

/// Run description for the two-species electrolyte; `--exp` implies an RPA
/// primary solve.
pub fn params(args: &UrpmArgs) -> RunParams {
    let closure = if args.rpa || args.exp {
        Closure::Rpa
    } else {
        Closure::Hnc
    };
    RunParams {
        closure,
        exp_refine: args.exp,
        grid: GridParams {
            ng: args.ng,
            deltar: args.deltar,
        },
        iteration: (&args.solver).into(),
        model: PotentialModel::Urpm {
            lb: args.lb,
            sigma: args.sigma,
            sigmap: args.sigmap,
            use_short: args.ushort,
        },
        species: SpeciesParams {
            rho: vec![0.5 * args.rhoz, 0.5 * args.rhoz],
        },
    }
}

pub fn run(args: UrpmArgs, show_progress: bool) -> Result<i32> {
    info!(lb = args.lb, rhoz = args.rhoz, "URPM run.");
    super::execute(&params(&args), show_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(argv: &[&str]) -> UrpmArgs {
        match Cli::parse_from(argv).command {
            Commands::Urpm(args) => args,
            _ => panic!("expected urpm subcommand"),
        }
    }

    #[test]
    fn exp_implies_rpa_primary_solve() {
        let params = params(&parse(&["oz", "urpm", "--exp"]));
        assert_eq!(params.closure, Closure::Rpa);
        assert!(params.exp_refine);
    }

    #[test]
    fn defaults_give_hnc_with_equal_densities() {
        let params = params(&parse(&["oz", "urpm"]));
        assert_eq!(params.closure, Closure::Hnc);
        assert!(!params.exp_refine);
        assert_eq!(params.species.rho, vec![0.05, 0.05]);
        assert_eq!(params.grid.ng, 4096);
        assert!(matches!(
            params.model,
            PotentialModel::Urpm {
                use_short: false,
                ..
            }
        ));
    }

    #[test]
    fn default_hnc_run_converges() {
        let args = parse(&["oz", "urpm"]);
        assert_eq!(run(args, false).unwrap(), 0);
    }

    #[test]
    fn rpa_exp_run_succeeds() {
        let args = parse(&["oz", "urpm", "--ng", "2^11", "--exp", "--ushort"]);
        assert_eq!(run(args, false).unwrap(), 0);
    }

    #[test]
    fn over_relaxed_run_returns_divergence_code() {
        let args = parse(&["oz", "urpm", "--ng", "2^10", "--rpa", "--alpha", "1.5"]);
        assert_eq!(run(args, false).unwrap(), 2);
    }
}
