use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::circuit::{Circuit, Instruction, QubitId};
use crate::statevector::{matrices, StateVector};

/// Measurement counts of a single classical register.
///
/// Keys are bitstrings where character `i` is classical bit `i` of the
/// register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterCounts {
    pub width: usize,
    pub counts: BTreeMap<String, u64>,
}

impl RegisterCounts {
    #[must_use]
    pub fn shots(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Per-register counts of a sampled circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResult {
    registers: BTreeMap<String, RegisterCounts>,
}

impl RawResult {
    #[must_use]
    pub fn register(&self, name: &str) -> Option<&RegisterCounts> {
        self.registers.get(name)
    }

    pub fn registers(&self) -> impl Iterator<Item = (&str, &RegisterCounts)> {
        self.registers.iter().map(|(name, counts)| (name.as_str(), counts))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    fn record(&mut self, circuit: &Circuit, classical: &[bool], times: u64) {
        for register in circuit.registers() {
            let bits = &classical[register.offset..register.offset + register.size];
            let key: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
            let entry = self.registers.entry(register.name.clone()).or_insert_with(|| RegisterCounts {
                width: register.size,
                counts: BTreeMap::new(),
            });
            *entry.counts.entry(key).or_insert(0) += times;
        }
    }
}

/// Runs circuits against a dense statevector with a seedable RNG.
pub struct Executor {
    rng: SmallRng,
}

impl Executor {
    #[must_use]
    pub fn new() -> Self {
        Executor {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic executor for reproducible sampling.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Executor {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs one trajectory, returning the post-circuit state and the
    /// classical bits in flat order.
    pub fn run(&mut self, circuit: &Circuit) -> (StateVector, Vec<bool>) {
        let mut state = StateVector::zero(circuit.qubit_count());
        let mut classical = vec![false; circuit.clbit_count()];
        for instruction in circuit.instructions() {
            self.apply(circuit, instruction, &mut state, &mut classical);
        }
        (state, classical)
    }

    fn apply(
        &mut self,
        circuit: &Circuit,
        instruction: &Instruction,
        state: &mut StateVector,
        classical: &mut [bool],
    ) {
        match instruction {
            Instruction::Gate { gate, qubits } => state.apply_gate(*gate, qubits),
            Instruction::ControlledPauli {
                pauli,
                controls,
                control_state,
                target,
            } => state.apply_controlled_pauli(matrices::pauli(*pauli), controls, *control_state, *target),
            Instruction::ConditionalPauli {
                pauli,
                target,
                register,
                value,
            } => {
                let reg = circuit.register(*register);
                let held: u64 = (0..reg.size)
                    .filter(|&i| classical[reg.offset + i])
                    .map(|i| 1 << i)
                    .sum();
                if held == *value {
                    state.apply_gate(pauli.gate(), &[*target]);
                }
            }
            Instruction::Measure { qubit, clbit } => {
                classical[*clbit] = state.measure(*qubit, &mut self.rng);
            }
            Instruction::Reset { qubit } => state.reset(*qubit, &mut self.rng),
            Instruction::Delay { .. } | Instruction::Barrier { .. } => {}
        }
    }

    /// Samples `shots` executions and tallies per-register counts.
    ///
    /// When nothing but measurements, barriers and delays follow the first
    /// measurement, the state is evolved once and outcomes are drawn from
    /// the joint measured distribution. Circuits with mid-circuit
    /// measurements feeding later instructions run one trajectory per shot.
    pub fn sample(&mut self, circuit: &Circuit, shots: u64) -> RawResult {
        let mut result = RawResult::default();
        if let Some(terminal) = terminal_measurements(circuit) {
            let mut state = StateVector::zero(circuit.qubit_count());
            let mut classical = vec![false; circuit.clbit_count()];
            for instruction in circuit.instructions().take(terminal.prefix_len) {
                self.apply(circuit, instruction, &mut state, &mut classical);
            }
            let qubits: Vec<QubitId> = terminal.measurements.iter().map(|&(q, _)| q).collect();
            let probabilities = state.marginal_probabilities(&qubits);
            let sampler = WeightedIndex::new(&probabilities).expect("distribution sums to one");
            let mut tallies: BTreeMap<usize, u64> = BTreeMap::new();
            for _ in 0..shots {
                *tallies.entry(sampler.sample(&mut self.rng)).or_insert(0) += 1;
            }
            for (outcome, times) in tallies {
                for (j, &(_, clbit)) in terminal.measurements.iter().enumerate() {
                    classical[clbit] = outcome & (1 << j) != 0;
                }
                result.record(circuit, &classical, times);
            }
        } else {
            for _ in 0..shots {
                let (_, classical) = self.run(circuit);
                result.record(circuit, &classical, 1);
            }
        }
        result
    }
}

impl Default for Executor {
    fn default() -> Self {
        Executor::new()
    }
}

struct TerminalMeasurements {
    prefix_len: usize,
    measurements: Vec<(QubitId, usize)>,
}

/// The terminal measurement block, if every instruction from the first
/// measurement onward is a measurement, barrier or delay.
fn terminal_measurements(circuit: &Circuit) -> Option<TerminalMeasurements> {
    let prefix_len = circuit
        .instructions()
        .position(|i| matches!(i, Instruction::Measure { .. }))
        .unwrap_or(circuit.instruction_count());
    let mut measurements = Vec::new();
    for instruction in circuit.instructions().skip(prefix_len) {
        match instruction {
            Instruction::Measure { qubit, clbit } => measurements.push((*qubit, *clbit)),
            Instruction::Barrier { .. } | Instruction::Delay { .. } => {}
            _ => return None,
        }
    }
    Some(TerminalMeasurements {
        prefix_len,
        measurements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliKind;

    #[test]
    fn deterministic_circuit_yields_a_single_outcome() {
        let mut circuit = Circuit::new(2);
        let m = circuit.add_register("m", 2);
        circuit.x(0);
        circuit.measure(0, m, 0);
        circuit.measure(1, m, 1);
        let result = Executor::seeded(7).sample(&circuit, 100);
        let counts = &result.register("m").unwrap().counts;
        assert_eq!(counts.get("10"), Some(&100));
    }

    #[test]
    fn bell_pair_counts_split_between_correlated_outcomes() {
        let mut circuit = Circuit::new(2);
        let m = circuit.add_register("m", 2);
        circuit.h(0);
        circuit.cx(0, 1);
        circuit.measure(0, m, 0);
        circuit.measure(1, m, 1);
        let result = Executor::seeded(42).sample(&circuit, 2000);
        let counts = &result.register("m").unwrap().counts;
        assert!(counts.get("01").is_none());
        assert!(counts.get("10").is_none());
        let zeros = *counts.get("00").unwrap() as f64;
        assert!((zeros / 2000.0 - 0.5).abs() < 0.05);
    }

    #[test]
    fn conditional_pauli_reads_earlier_measurement() {
        let mut circuit = Circuit::new(2);
        let c = circuit.add_register("c", 1);
        let m = circuit.add_register("m", 1);
        circuit.h(0);
        circuit.measure(0, c, 0);
        circuit.conditional_pauli(PauliKind::X, 1, c, 1);
        circuit.measure(1, m, 0);
        let result = Executor::seeded(3).sample(&circuit, 500);
        let first = &result.register("c").unwrap().counts;
        let second = &result.register("m").unwrap().counts;
        // The conditional flip copies the first register into the second.
        assert_eq!(first.get("0"), second.get("0"));
        assert_eq!(first.get("1"), second.get("1"));
    }

    #[test]
    fn per_shot_and_single_pass_sampling_agree_on_support() {
        let mut fast = Circuit::new(2);
        let m = fast.add_register("m", 2);
        fast.h(0);
        fast.cx(0, 1);
        fast.measure(0, m, 0);
        fast.measure(1, m, 1);

        let mut slow = fast.clone();
        // A trailing reset forces the per-shot path without touching the
        // measured outcomes.
        slow.reset(0);

        let fast_counts = Executor::seeded(11).sample(&fast, 400);
        let slow_counts = Executor::seeded(11).sample(&slow, 400);
        let keys = |r: &RawResult| {
            r.register("m")
                .unwrap()
                .counts
                .keys()
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&fast_counts), keys(&slow_counts));
    }

    #[test]
    fn unmeasured_registers_report_zeros() {
        let mut circuit = Circuit::new(1);
        circuit.add_register("idle", 2);
        circuit.x(0);
        let result = Executor::seeded(1).sample(&circuit, 10);
        let counts = &result.register("idle").unwrap().counts;
        assert_eq!(counts.get("00"), Some(&10));
    }
}
