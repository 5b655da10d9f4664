//! Comparison of measured bitstring distributions against expected ones.
//!
//! A [`Distribution`] maps bitstring keys to probability mass (or raw
//! counts, depending on how it was produced). The comparison functions
//! treat missing keys as zero mass.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::StatError;

/// Probability mass per bitstring outcome.
pub type Distribution = BTreeMap<String, f64>;

fn bit_value(state: &str) -> u64 {
    u64::from_str_radix(state, 2)
        .unwrap_or_else(|_| panic!("state `{state}` is not a bitstring"))
}

fn observed_scale(percentage: bool) -> f64 {
    if percentage { 0.01 } else { 1.0 }
}

/// Total variation distance, `½ Σ |p(s) − q(s)|` over the union of keys.
///
/// With `percentage` the observed values are read in percent and
/// rescaled to probabilities first, matching what percentage-normalized
/// extraction emits; the expectation is always in probabilities.
/// Symmetric when both sides share a scale, zero iff the distributions
/// agree, and at most one for normalized inputs.
#[must_use]
pub fn total_variation_distance(
    observed: &Distribution,
    expected: &Distribution,
    percentage: bool,
) -> f64 {
    let scale = observed_scale(percentage);
    observed
        .keys()
        .merge(expected.keys())
        .dedup()
        .map(|key| {
            let a = observed.get(key).copied().unwrap_or(0.0) * scale;
            let b = expected.get(key).copied().unwrap_or(0.0);
            (a - b).abs()
        })
        .sum::<f64>()
        / 2.0
}

/// Kullback-Leibler divergence `Σ expected(s) · ln(expected(s) / observed(s))`.
///
/// The sum runs over the states where `expected` carries mass. Any such
/// state with zero observed mass makes the divergence infinite, which is
/// reported as [`StatError::ZeroSupport`] instead of `f64::INFINITY`.
/// With `percentage` the observed values are rescaled from percent
/// before the ratio is taken.
pub fn kl_divergence(
    observed: &Distribution,
    expected: &Distribution,
    percentage: bool,
) -> Result<f64, StatError> {
    let scale = observed_scale(percentage);
    let mut divergence = 0.0;
    for (state, &mass) in expected {
        if mass == 0.0 {
            continue;
        }
        let seen = observed.get(state).copied().unwrap_or(0.0) * scale;
        if seen == 0.0 {
            return Err(StatError::ZeroSupport { state: state.clone() });
        }
        divergence += mass * (mass / seen).ln();
    }
    Ok(divergence)
}

/// Kolmogorov-Smirnov statistic between two distributions.
///
/// Bitstrings are ordered by their integer value and the statistic is the
/// largest gap between the two cumulative distribution functions. The
/// supremum scans the union of the two key sets; for dense zero-filled
/// extractions that coincides with scanning the observed outcomes, since
/// expectation-only keys carry an explicit zero there. With `percentage`
/// the observed values are rescaled from percent first.
#[must_use]
pub fn ks_statistic(observed: &Distribution, expected: &Distribution, percentage: bool) -> f64 {
    let scale = observed_scale(percentage);
    let cdf = |dist: &Distribution, x: u64| {
        dist.iter()
            .filter(|(state, _)| bit_value(state) <= x)
            .map(|(_, &mass)| mass)
            .sum::<f64>()
    };
    observed
        .keys()
        .merge(expected.keys())
        .dedup()
        .map(|state| {
            let x = bit_value(state);
            (cdf(observed, x) * scale - cdf(expected, x)).abs()
        })
        .fold(0.0, f64::max)
}

/// Sampling tolerance for comparing an empirical distribution over
/// `n_bits` bits against its expectation after `shots` samples.
///
/// Takes the larger of the L1 concentration bound `√(2ⁿ / shots)` and the
/// Dvoretzky-Kiefer-Wolfowitz bound `√(2 ln(2/δ) / shots)` at confidence
/// level `1 − delta`.
#[must_use]
pub fn confidence_epsilon(n_bits: usize, shots: u64, delta: f64) -> f64 {
    assert!(shots > 0, "confidence bound needs at least one shot");
    assert!(delta > 0.0 && delta < 1.0, "delta must lie in (0, 1)");
    let shots = shots as f64;
    let l1 = ((1u64 << n_bits) as f64 / shots).sqrt();
    let dkw = (2.0 * (2.0 / delta).ln() / shots).sqrt();
    l1.max(dkw)
}

/// Expected outcome distribution over `n_bits` bits when only
/// `valid_states` should appear.
///
/// Without an SNR the valid states split the mass uniformly and every
/// other state gets zero. With a signal-to-noise ratio `snr > 1` every
/// state keeps a noise floor `p₀ = 1 / (|valid| · (snr − 1) + 2ⁿ)` and the
/// valid states are boosted to `snr · p₀`, so the result still sums to one.
pub fn reference_distribution(
    n_bits: usize,
    valid_states: &[&str],
    snr: Option<f64>,
) -> Result<Distribution, StatError> {
    let valid: BTreeSet<&str> = valid_states.iter().copied().collect();
    let mut distribution = Distribution::new();
    match snr {
        None => {
            let mass = 1.0 / valid.len() as f64;
            for state in possible_states(n_bits) {
                let p = if valid.contains(state.as_str()) { mass } else { 0.0 };
                distribution.insert(state, p);
            }
        }
        Some(snr) => {
            if snr <= 1.0 {
                return Err(StatError::InvalidSnr { snr });
            }
            let total = (1u64 << n_bits) as f64;
            let floor = 1.0 / (valid.len() as f64 * (snr - 1.0) + total);
            for state in possible_states(n_bits) {
                let p = if valid.contains(state.as_str()) { snr * floor } else { floor };
                distribution.insert(state, p);
            }
        }
    }
    Ok(distribution)
}

/// All `2ⁿ` bitstrings of `n_bits` bits in ascending order, zero-padded.
#[must_use]
pub fn possible_states(n_bits: usize) -> Vec<String> {
    (0..1u64 << n_bits).map(|value| format!("{value:0n_bits$b}")).collect()
}

/// Reflected Gray code sequence over `n_bits` bits.
///
/// Consecutive entries differ in exactly one bit, and the sequence wraps:
/// the last entry is one flip away from the first.
#[must_use]
pub fn gray_codes(n_bits: usize) -> Vec<String> {
    if n_bits == 0 {
        return vec!["0".to_owned()];
    }
    let mut codes = vec!["0".to_owned(), "1".to_owned()];
    for _ in 1..n_bits {
        let mut next = Vec::with_capacity(codes.len() * 2);
        next.extend(codes.iter().map(|code| format!("0{code}")));
        next.extend(codes.iter().rev().map(|code| format!("1{code}")));
        codes = next;
    }
    codes
}

/// Empirical signal-to-noise ratio of a measured distribution: the mean
/// mass of the valid states over the mean mass of everything else.
///
/// A sample without both kinds of outcome has no defined ratio and is
/// [`StatError::SnrNotEstimable`]; a clean run over a sparse key set can
/// legitimately hit this.
pub fn estimate_snr(measured: &Distribution, valid_states: &[&str]) -> Result<f64, StatError> {
    let valid: BTreeSet<&str> = valid_states.iter().copied().collect();
    let (mut signal, mut signal_n, mut noise, mut noise_n) = (0.0, 0u64, 0.0, 0u64);
    for (state, &mass) in measured {
        if valid.contains(state.as_str()) {
            signal += mass;
            signal_n += 1;
        } else {
            noise += mass;
            noise_n += 1;
        }
    }
    if signal_n == 0 || noise_n == 0 {
        return Err(StatError::SnrNotEstimable);
    }
    Ok((signal / signal_n as f64) / (noise / noise_n as f64))
}

/// Least-squares `T1` fit of a relaxation experiment.
///
/// `durations[i]` is the delay before measurement and `log_survival[i]`
/// the natural log of the observed survival probability. Fits
/// `y = −t / T1` through the origin and returns `(T1, σ)`, where `σ` is
/// the root-mean-square residual of the implied survival curve.
#[must_use]
pub fn estimate_t1(durations: &[f64], log_survival: &[f64]) -> (f64, f64) {
    assert_eq!(durations.len(), log_survival.len(), "duration and survival series differ in length");
    assert!(!durations.is_empty(), "T1 fit needs at least one point");
    let xx: f64 = durations.iter().map(|x| x * x).sum();
    let xy: f64 = durations.iter().zip(log_survival).map(|(x, y)| x * y).sum();
    let t1 = -xx / xy;
    let residual: f64 = durations
        .iter()
        .zip(log_survival)
        .map(|(x, y)| {
            let fitted = (-x / t1).exp() / 2.0;
            (fitted - y) * (fitted - y)
        })
        .sum();
    let sigma = (residual / durations.len() as f64).sqrt();
    (t1, sigma)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(entries: &[(&str, f64)]) -> Distribution {
        entries.iter().map(|&(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn tvd_of_disjoint_distributions_is_one() {
        let p = dist(&[("00", 1.0)]);
        let q = dist(&[("11", 1.0)]);
        assert_eq!(total_variation_distance(&p, &q, false), 1.0);
    }

    #[test]
    fn tvd_ignores_keys_with_matching_mass() {
        let p = dist(&[("00", 0.5), ("01", 0.5)]);
        let q = dist(&[("00", 0.5), ("11", 0.5)]);
        assert!((total_variation_distance(&p, &q, false) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn percentage_observations_rescale_before_comparing() {
        let observed = dist(&[("0", 50.0), ("1", 50.0)]);
        let expected = dist(&[("0", 0.5), ("1", 0.5)]);
        assert_eq!(total_variation_distance(&observed, &expected, true), 0.0);
        assert_eq!(kl_divergence(&observed, &expected, true).unwrap(), 0.0);
        assert_eq!(ks_statistic(&observed, &expected, true), 0.0);
    }

    #[test]
    fn kl_divergence_is_zero_for_identical_distributions() {
        let p = dist(&[("0", 0.25), ("1", 0.75)]);
        assert_eq!(kl_divergence(&p, &p, false).unwrap(), 0.0);
    }

    #[test]
    fn kl_divergence_rejects_missing_observed_support() {
        let expected = dist(&[("0", 0.5), ("1", 0.5)]);
        let observed = dist(&[("1", 1.0)]);
        assert_eq!(
            kl_divergence(&observed, &expected, false),
            Err(StatError::ZeroSupport { state: "0".to_owned() })
        );
    }

    #[test]
    fn kl_divergence_skips_states_the_expectation_rules_out() {
        let expected = dist(&[("0", 1.0), ("1", 0.0)]);
        let observed = dist(&[("0", 0.9), ("1", 0.1)]);
        let divergence = kl_divergence(&observed, &expected, false).unwrap();
        assert!((divergence - (1.0f64 / 0.9).ln()).abs() < 1e-12);
    }

    #[test]
    fn ks_statistic_sees_a_shifted_point_mass() {
        let p = dist(&[("00", 1.0)]);
        let q = dist(&[("10", 1.0)]);
        assert_eq!(ks_statistic(&p, &q, false), 1.0);
    }

    #[test]
    fn ks_supremum_accounts_for_expectation_only_outcomes() {
        // sparse observation omits "01"; the expectation carries it
        let observed = dist(&[("00", 1.0)]);
        let expected = dist(&[("00", 0.5), ("01", 0.5)]);
        assert_eq!(ks_statistic(&observed, &expected, false), 0.5);
    }

    #[test]
    fn reference_distribution_without_snr_is_uniform_over_valid_states() {
        let reference = reference_distribution(2, &["00", "11"], None).unwrap();
        assert_eq!(reference["00"], 0.5);
        assert_eq!(reference["11"], 0.5);
        assert_eq!(reference["01"], 0.0);
        assert_eq!(reference["10"], 0.0);
    }

    #[test]
    fn reference_distribution_with_snr_keeps_a_noise_floor() {
        let reference = reference_distribution(2, &["00"], Some(3.0)).unwrap();
        // p0 = 1 / (1·2 + 4) = 1/6, valid state gets 3·p0.
        assert!((reference["00"] - 0.5).abs() < 1e-12);
        assert!((reference["01"] - 1.0 / 6.0).abs() < 1e-12);
        let total: f64 = reference.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reference_distribution_rejects_snr_at_or_below_one() {
        assert_eq!(
            reference_distribution(2, &["00"], Some(1.0)),
            Err(StatError::InvalidSnr { snr: 1.0 })
        );
    }

    #[test]
    fn possible_states_enumerates_padded_bitstrings() {
        assert_eq!(possible_states(2), ["00", "01", "10", "11"]);
    }

    #[test]
    fn gray_codes_flip_one_bit_per_step() {
        let codes = gray_codes(3);
        assert_eq!(codes.len(), 8);
        for pair in codes.windows(2) {
            let flips = pair[0]
                .chars()
                .zip(pair[1].chars())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(flips, 1, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn snr_estimate_matches_a_constructed_distribution() {
        let measured = dist(&[("00", 0.6), ("11", 0.3), ("01", 0.05), ("10", 0.05)]);
        let snr = estimate_snr(&measured, &["00", "11"]).unwrap();
        assert!((snr - 9.0).abs() < 1e-12);
    }

    #[test]
    fn snr_estimate_needs_noise_outcomes() {
        // a clean run over a sparse key set has no noise to divide by
        let measured = dist(&[("00", 1.0)]);
        assert_eq!(estimate_snr(&measured, &["00"]), Err(StatError::SnrNotEstimable));
    }

    #[test]
    fn t1_fit_recovers_an_exact_exponential() {
        let t1_true = 50.0;
        let durations = [10.0, 20.0, 40.0, 80.0];
        let log_survival: Vec<f64> = durations.iter().map(|t| -t / t1_true).collect();
        let (t1, _) = estimate_t1(&durations, &log_survival);
        assert!((t1 - t1_true).abs() < 1e-9);
    }

    #[test]
    fn confidence_epsilon_shrinks_with_more_shots() {
        let few = confidence_epsilon(3, 100, 0.05);
        let many = confidence_epsilon(3, 10_000, 0.05);
        assert!(many < few);
        assert!((many - few / 10.0).abs() < 1e-12);
    }
}
