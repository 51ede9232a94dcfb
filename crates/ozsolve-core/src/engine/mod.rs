//! # Engine Module
//!
//! The iterative solver for the Ornstein-Zernike equation and everything it
//! needs at run time: configuration, per-wavevector linear algebra, the
//! Picard/Anderson accelerator, and the EXP post-processing step.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - grid size, densities and iteration controls, with a builder
//! - **OZ relation** ([`oz`]) - `H = (I - C rho)^-1 C` and its inverse, solved per k-point
//! - **Mixing** ([`mixing`]) - Picard warm-up followed by Anderson extrapolation over a bounded history
//! - **Solver** ([`solver`]) - the fixed-point loop with convergence and divergence detection
//! - **Refinement** ([`refine`]) - EXP resummation of a converged solution
//! - **Results** ([`state`]) - the solution record and its termination status
//! - **Progress Monitoring** ([`progress`]) - per-step callbacks for front ends
//! - **Error Handling** ([`error`]) - engine error types

pub mod config;
pub mod error;
pub(crate) mod mixing;
pub(crate) mod oz;
pub mod progress;
pub mod refine;
pub mod solver;
pub mod state;
