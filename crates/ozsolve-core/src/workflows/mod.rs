//! # Workflows Module
//!
//! Top-level entry points tying the `core`, `engine` and `analysis` layers
//! together.
//!
//! ## Architecture
//!
//! - **Session** ([`session`]) - an explicit, owned solver session exposing
//!   `initialise`, the potential setups, the closure solves, `exp_refine` and
//!   the text reports
//! - **Run** ([`run`]) - one complete run from a [`RunParams`](crate::core::params::RunParams)
//!   description or TOML file, including optional EXP refinement and thermodynamics

pub mod run;
pub mod session;
