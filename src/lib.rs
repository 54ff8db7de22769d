#![warn(missing_docs)]

//! Neutron beta decay rate
//!
//! This crate estimates the rate `Γ = ∫ dΓ/dE dE` of neutron beta decay, and the lifetime
//! `τ = 1/Γ`, with mean-value and rejection Monte Carlo integration, whole-interval and
//! stratified over equal sub-intervals, and compares them against the closed-form result.

mod decay;
mod integrand;
mod monte_carlo;
pub mod report;
mod sweep;

pub use decay::{
    DEFAULT_UPPER_BOUND, DecayError, DensityCurve, MAX_CURVE_POINTS, NeutronBetaDecay,
    PhysicalConstants,
};
pub use integrand::Integrand;
pub use monte_carlo::{Estimate, IntegrationError, Method, MonteCarloIntegrator};
pub use sweep::{
    BOUND_CHECK_RESOLUTION, DEFAULT_LOWER, DEFAULT_PARTITIONS, DEFAULT_SAMPLE_COUNTS,
    DEFAULT_UPPER, Sweep, SweepConfig, SweepError, SweepRecord, lifetime, run_sweep,
};
