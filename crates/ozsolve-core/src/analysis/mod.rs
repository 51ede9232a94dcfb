//! # Analysis Module
//!
//! Quantities derived from a converged solve and the text reports that carry
//! them to the user.
//!
//! - **Structure factors** ([`structure`]) - `S_NN(k)`, `S_ZZ(k)` and log-tail diagnostics
//! - **Thermodynamics** ([`thermodynamics`]) - energy, virial pressure, compressibility, contact values
//! - **Reports** ([`report`]) - `write_params` and `write_thermodynamics`

pub mod report;
pub mod structure;
pub mod thermodynamics;
