//! Turns sampled register counts into dense per-register distributions.

use std::collections::BTreeMap;

use derive_more::{Display, FromStr};
use qcir::RawResult;

use crate::distribution::{possible_states, Distribution};
use crate::StatError;

/// How raw counts are scaled in an extracted distribution.
#[derive(Clone, Copy, Debug, Default, Display, Eq, FromStr, PartialEq)]
pub enum Normalization {
    /// Raw shot counts, unscaled.
    Counts,
    /// Counts divided by the register's shot total.
    #[default]
    Probability,
    /// Probability scaled to percent.
    Percentage,
}

/// Expands every register of a sampled result into a dense distribution.
///
/// Each output distribution carries all `2^width` bitstrings of its
/// register, zero-filled where an outcome never occurred, so downstream
/// comparisons never need to reason about missing keys. With
/// `bit_order_reversed` the value for key `s` is read from the sampled
/// count of the reversed bitstring, for callers that index classical bits
/// from the opposite end.
pub fn extract(
    raw: &RawResult,
    normalization: Normalization,
    bit_order_reversed: bool,
) -> Result<BTreeMap<String, Distribution>, StatError> {
    let mut extracted = BTreeMap::new();
    for (name, register) in raw.registers() {
        let shots = register.shots();
        if shots == 0 {
            return Err(StatError::EmptyRegister { register: name.to_owned() });
        }
        let scale = match normalization {
            Normalization::Counts => 1.0,
            Normalization::Probability => 1.0 / shots as f64,
            Normalization::Percentage => 100.0 / shots as f64,
        };
        let mut distribution = Distribution::new();
        for state in possible_states(register.width) {
            let key = if bit_order_reversed {
                state.chars().rev().collect::<String>()
            } else {
                state.clone()
            };
            let count = register.counts.get(&key).copied().unwrap_or(0);
            distribution.insert(state, count as f64 * scale);
        }
        extracted.insert(name.to_owned(), distribution);
    }
    Ok(extracted)
}
