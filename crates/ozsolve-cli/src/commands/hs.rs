use crate::cli::HsArgs;
use crate::error::Result;
use ozsolve::core::closure::Closure;
use ozsolve::core::params::{GridParams, RunParams, SpeciesParams};
use ozsolve::core::potentials::PotentialModel;
use std::f64::consts::PI;
use tracing::info;

/// Run description for a hard-sphere fluid at packing fraction `eta`, with the
/// total density shared equally between `ncomp` identical species.
pub fn params(args: &HsArgs) -> RunParams {
    let rho = 6.0 * args.eta / (PI * args.sigma.powi(3));
    let ncomp = args.ncomp.max(1);
    RunParams {
        closure: if args.msa { Closure::Msa } else { Closure::Hnc },
        exp_refine: false,
        grid: GridParams {
            ng: args.ng,
            deltar: args.deltar,
        },
        iteration: (&args.solver).into(),
        model: PotentialModel::HardSphere { sigma: args.sigma },
        species: SpeciesParams {
            rho: vec![rho / ncomp as f64; args.ncomp],
        },
    }
}

pub fn run(args: HsArgs, show_progress: bool) -> Result<i32> {
    info!(eta = args.eta, ncomp = args.ncomp, "Hard-sphere run.");
    super::execute(&params(&args), show_progress)
}
