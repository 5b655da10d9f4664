//! Execution backends for sampled circuits.

use derive_more::Display;
use qcir::{Circuit, Executor, RawResult};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::RunError;

/// Lifecycle of a submitted job.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

/// A circuit rewritten for a concrete backend.
///
/// `initial_layout[i]` is the physical qubit holding virtual qubit `i`
/// at the start of the circuit.
#[derive(Clone, Debug)]
pub struct Transpiled {
    pub circuit: Circuit,
    pub initial_layout: Vec<usize>,
    pub depth: usize,
}

impl Transpiled {
    /// Whether the first virtual qubits sit on the requested physical ones.
    #[must_use]
    pub fn matches_layout(&self, required: &[usize]) -> bool {
        self.initial_layout.starts_with(required)
    }
}

/// Something that can rewrite a circuit for its hardware and sample it.
pub trait Backend {
    fn name(&self) -> &str;

    /// Rewrites `circuit` for this backend. Layout choice may be
    /// randomized, so repeated calls can return different placements.
    fn transpile(&mut self, circuit: &Circuit) -> Result<Transpiled, RunError>;

    fn run(&mut self, transpiled: &Transpiled, shots: u64, seed: u64) -> Result<RawResult, RunError>;
}

/// Dense statevector simulator behind the [`Backend`] interface.
///
/// Placement is a uniformly random permutation per transpile call, which
/// gives the layout search something to iterate over even though the
/// simulator itself is placement-agnostic.
#[derive(Debug)]
pub struct SimulatorBackend {
    capacity: usize,
    rng: SmallRng,
}

impl SimulatorBackend {
    // Dense amplitudes cap out at 28 qubits.
    const CAPACITY: usize = 28;

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self { capacity: Self::CAPACITY, rng: SmallRng::seed_from_u64(seed) }
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        "statevector-simulator"
    }

    fn transpile(&mut self, circuit: &Circuit) -> Result<Transpiled, RunError> {
        let needed = circuit.qubit_count();
        if needed > self.capacity {
            return Err(RunError::TooManyQubits {
                backend: self.name().to_owned(),
                needed,
                capacity: self.capacity,
            });
        }
        let mut layout: Vec<usize> = (0..needed).collect();
        layout.shuffle(&mut self.rng);
        Ok(Transpiled { circuit: circuit.clone(), initial_layout: layout, depth: circuit.depth() })
    }

    fn run(&mut self, transpiled: &Transpiled, shots: u64, seed: u64) -> Result<RawResult, RunError> {
        Ok(Executor::seeded(seed).sample(&transpiled.circuit, shots))
    }
}

#[cfg(test)]
mod tests {
    use qcir::Circuit;

    use super::*;

    #[test]
    fn simulator_rejects_circuits_beyond_its_capacity() {
        let mut backend = SimulatorBackend::seeded(1);
        let circuit = Circuit::new(29);
        let err = backend.transpile(&circuit).unwrap_err();
        assert!(matches!(err, RunError::TooManyQubits { needed: 29, .. }));
    }

    #[test]
    fn transpiled_layout_is_a_permutation() {
        let mut backend = SimulatorBackend::seeded(7);
        let transpiled = backend.transpile(&Circuit::new(5)).unwrap();
        let mut layout = transpiled.initial_layout.clone();
        layout.sort_unstable();
        assert_eq!(layout, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn simulator_samples_deterministically_per_seed() {
        let mut circuit = Circuit::new(1);
        let reg = circuit.add_register("out", 1);
        circuit.h(0);
        circuit.measure(0, reg, 0);

        let mut backend = SimulatorBackend::seeded(2);
        let transpiled = backend.transpile(&circuit).unwrap();
        let first = backend.run(&transpiled, 64, 9).unwrap();
        let second = backend.run(&transpiled, 64, 9).unwrap();
        assert_eq!(first, second);
    }
}
