//! Statistics for encoded-circuit experiments.
//!
//! Converts sampled register counts into dense distributions and compares
//! them against reference distributions with the usual distances (total
//! variation, Kullback-Leibler, Kolmogorov-Smirnov), plus small estimators
//! for signal-to-noise ratio and relaxation time.

pub mod distribution;
pub mod extract;

pub use distribution::{
    confidence_epsilon, estimate_snr, estimate_t1, gray_codes, kl_divergence, ks_statistic,
    possible_states, reference_distribution, total_variation_distance, Distribution,
};
pub use extract::{extract, Normalization};

use thiserror::Error;

/// Failures of the comparison and extraction routines.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StatError {
    /// KL divergence is infinite: the expectation carries mass on a state
    /// that was never observed.
    #[error("expected state `{state}` has zero observed probability")]
    ZeroSupport { state: String },
    /// A reference distribution needs a signal-to-noise ratio above one.
    #[error("signal-to-noise ratio must exceed 1, got {snr}")]
    InvalidSnr { snr: f64 },
    /// An SNR estimate needs both valid and invalid outcomes present.
    #[error("SNR estimate needs both valid and invalid outcomes in the sample")]
    SnrNotEstimable,
    /// A sampled register carried no shots at all.
    #[error("register `{register}` holds no samples")]
    EmptyRegister { register: String },
}
