//! # Core Module
//!
//! Stateless building blocks of the Ornstein-Zernike solver: the discretised
//! radial coordinate and its Fourier conjugate, pairwise function storage, the
//! species set, the interaction models and the closure relations.
//!
//! ## Architecture
//!
//! - **Grids and transforms** ([`grid`], [`transform`]) - paired r/k axes and the
//!   3-D radial Fourier transform, computed as a type-I sine transform
//! - **Pairwise data** ([`pair`]) - values per grid point and ordered species pair,
//!   symmetric in the species indices
//! - **Species** ([`species`]) - densities, valences and the density matrix
//! - **Interaction models** ([`potentials`]) - hard spheres and the charged URPM
//!   model, whose Coulomb tail is always carried in k-space
//! - **Closures** ([`closure`]) - HNC, MSA and RPA, plus the EXP resummation
//! - **Run files** ([`params`]) - TOML descriptions of a complete solver run
//! - **Validation** ([`validation`]) - the configuration error type shared by all
//!   setup paths

pub mod closure;
pub mod grid;
pub mod pair;
pub mod params;
pub mod potentials;
pub mod species;
pub mod transform;
pub mod validation;
