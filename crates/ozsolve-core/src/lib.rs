//! # ozsolve
//!
//! An Ornstein-Zernike integral equation solver for multicomponent fluids.
//! Given a pair potential and a closure (HNC, MSA or RPA, optionally followed
//! by EXP refinement) it computes the direct and total correlation functions,
//! the partial structure factors and the resulting thermodynamics.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless building blocks: the paired r/k
//!   grids and the radial Fourier transform, pairwise function storage,
//!   species, the potential models and the closure relations.
//!
//! - **[`engine`]: The Logic Core.** The fixed-point solver: per-wavevector
//!   OZ linear algebra, Picard/Anderson mixing, convergence and divergence
//!   detection, and EXP refinement.
//!
//! - **[`analysis`]: Derived Quantities.** Composite structure factors,
//!   thermodynamics and text reports built from a converged solution.
//!
//! - **[`workflows`]: The Public API.** A [`Session`](workflows::session::Session)
//!   replacing the classic stateful solver module, and an end-to-end
//!   [`run`](workflows::run::run) driven by TOML run files.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod workflows;
