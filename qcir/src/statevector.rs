use num_complex::Complex64;
use rand::Rng;

use crate::circuit::QubitId;
use crate::gate::Gate;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Dense state of `qubit_count` qubits.
///
/// Basis index bit `q` holds the value of qubit `q`.
#[derive(Clone, Debug)]
pub struct StateVector {
    amps: Vec<Complex64>,
    qubit_count: usize,
}

impl StateVector {
    /// The all-zeros computational basis state.
    ///
    /// # Panics
    ///
    /// Panics for more than 28 qubits; the dense representation does not
    /// scale past that.
    #[must_use]
    pub fn zero(qubit_count: usize) -> Self {
        assert!(qubit_count <= 28, "too many qubits for a dense state");
        let mut amps = vec![ZERO; 1 << qubit_count];
        amps[0] = ONE;
        StateVector { amps, qubit_count }
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    #[must_use]
    pub fn amplitude(&self, basis: usize) -> Complex64 {
        self.amps[basis]
    }

    #[must_use]
    pub fn probability(&self, basis: usize) -> f64 {
        self.amps[basis].norm_sqr()
    }

    /// Applies `matrix` to `target`, restricted to basis states whose bits
    /// under `control_mask` equal `control_value`.
    fn apply_controlled_matrix(
        &mut self,
        control_mask: usize,
        control_value: usize,
        target: QubitId,
        matrix: [[Complex64; 2]; 2],
    ) {
        let target_bit = 1usize << target;
        debug_assert_eq!(control_mask & target_bit, 0);
        for basis in 0..self.amps.len() {
            if basis & target_bit != 0 || basis & control_mask != control_value {
                continue;
            }
            let paired = basis | target_bit;
            let a0 = self.amps[basis];
            let a1 = self.amps[paired];
            self.amps[basis] = matrix[0][0] * a0 + matrix[0][1] * a1;
            self.amps[paired] = matrix[1][0] * a0 + matrix[1][1] * a1;
        }
    }

    fn apply_matrix(&mut self, target: QubitId, matrix: [[Complex64; 2]; 2]) {
        self.apply_controlled_matrix(0, 0, target, matrix);
    }

    fn swap_qubits(&mut self, a: QubitId, b: QubitId) {
        let bit_a = 1usize << a;
        let bit_b = 1usize << b;
        for basis in 0..self.amps.len() {
            if basis & bit_a != 0 && basis & bit_b == 0 {
                self.amps.swap(basis, basis ^ bit_a ^ bit_b);
            }
        }
    }

    pub fn apply_gate(&mut self, gate: Gate, qubits: &[QubitId]) {
        assert_eq!(gate.arity(), qubits.len());
        match gate {
            Gate::I => {}
            Gate::X => self.apply_matrix(qubits[0], matrices::X),
            Gate::Y => self.apply_matrix(qubits[0], matrices::Y),
            Gate::Z => self.apply_matrix(qubits[0], matrices::Z),
            Gate::H => self.apply_matrix(qubits[0], matrices::H),
            Gate::S => self.apply_matrix(qubits[0], matrices::S),
            Gate::Sdg => self.apply_matrix(qubits[0], matrices::SDG),
            Gate::Swap => self.swap_qubits(qubits[0], qubits[1]),
            Gate::Cx => self.apply_controlled_matrix(1 << qubits[0], 1 << qubits[0], qubits[1], matrices::X),
            Gate::Cy => self.apply_controlled_matrix(1 << qubits[0], 1 << qubits[0], qubits[1], matrices::Y),
            Gate::Cz => self.apply_controlled_matrix(1 << qubits[0], 1 << qubits[0], qubits[1], matrices::Z),
            Gate::Ccx => {
                let mask = (1 << qubits[0]) | (1 << qubits[1]);
                self.apply_controlled_matrix(mask, mask, qubits[2], matrices::X);
            }
        }
    }

    /// Applies `matrix`'s Pauli to `target` when every control qubit matches
    /// its bit of `control_state`.
    pub fn apply_controlled_pauli(
        &mut self,
        matrix: [[Complex64; 2]; 2],
        controls: &[QubitId],
        control_state: u32,
        target: QubitId,
    ) {
        let mut mask = 0usize;
        let mut value = 0usize;
        for (i, &control) in controls.iter().enumerate() {
            mask |= 1 << control;
            if control_state & (1 << i) != 0 {
                value |= 1 << control;
            }
        }
        self.apply_controlled_matrix(mask, value, target, matrix);
    }

    /// Probability of measuring `qubit` as one.
    #[must_use]
    pub fn probability_of_one(&self, qubit: QubitId) -> f64 {
        let bit = 1usize << qubit;
        self.amps
            .iter()
            .enumerate()
            .filter(|(basis, _)| basis & bit != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Joint outcome distribution of `qubits`; outcome bit `j` is the value
    /// of `qubits[j]`.
    #[must_use]
    pub fn marginal_probabilities(&self, qubits: &[QubitId]) -> Vec<f64> {
        let mut probabilities = vec![0.0; 1 << qubits.len()];
        for (basis, amp) in self.amps.iter().enumerate() {
            let p = amp.norm_sqr();
            if p == 0.0 {
                continue;
            }
            let mut outcome = 0usize;
            for (j, &qubit) in qubits.iter().enumerate() {
                if basis & (1 << qubit) != 0 {
                    outcome |= 1 << j;
                }
            }
            probabilities[outcome] += p;
        }
        probabilities
    }

    /// Projective measurement with collapse and renormalization.
    pub fn measure<R: Rng>(&mut self, qubit: QubitId, rng: &mut R) -> bool {
        let p_one = self.probability_of_one(qubit);
        let outcome = rng.gen::<f64>() < p_one;
        self.collapse(qubit, outcome, if outcome { p_one } else { 1.0 - p_one });
        outcome
    }

    fn collapse(&mut self, qubit: QubitId, outcome: bool, probability: f64) {
        let bit = 1usize << qubit;
        let norm = probability.sqrt();
        for (basis, amp) in self.amps.iter_mut().enumerate() {
            if (basis & bit != 0) == outcome {
                *amp /= norm;
            } else {
                *amp = ZERO;
            }
        }
    }

    /// Measures and flips back to zero when needed.
    pub fn reset<R: Rng>(&mut self, qubit: QubitId, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_matrix(qubit, matrices::X);
        }
    }
}

pub(crate) mod matrices {
    use super::{Complex64, ONE, ZERO};
    use crate::pauli::PauliKind;
    use std::f64::consts::FRAC_1_SQRT_2;

    const I_UNIT: Complex64 = Complex64::new(0.0, 1.0);
    const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
    const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
    const H_AMP: Complex64 = Complex64::new(FRAC_1_SQRT_2, 0.0);
    const NEG_H_AMP: Complex64 = Complex64::new(-FRAC_1_SQRT_2, 0.0);

    pub const X: [[Complex64; 2]; 2] = [[ZERO, ONE], [ONE, ZERO]];
    pub const Y: [[Complex64; 2]; 2] = [[ZERO, NEG_I], [I_UNIT, ZERO]];
    pub const Z: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_ONE]];
    pub const H: [[Complex64; 2]; 2] = [[H_AMP, H_AMP], [H_AMP, NEG_H_AMP]];
    pub const S: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, I_UNIT]];
    pub const SDG: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_I]];
    pub const IDENTITY: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

    pub fn pauli(kind: PauliKind) -> [[Complex64; 2]; 2] {
        match kind {
            PauliKind::I => IDENTITY,
            PauliKind::X => X,
            PauliKind::Y => Y,
            PauliKind::Z => Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-12, "{left} != {right}");
    }

    #[test]
    fn x_flips_a_basis_state() {
        let mut state = StateVector::zero(2);
        state.apply_gate(Gate::X, &[1]);
        assert_close(state.probability(0b10), 1.0);
    }

    #[test]
    fn hadamard_splits_amplitude_evenly() {
        let mut state = StateVector::zero(1);
        state.apply_gate(Gate::H, &[0]);
        assert_close(state.probability(0), 0.5);
        assert_close(state.probability(1), 0.5);
    }

    #[test]
    fn cx_entangles_into_a_bell_pair() {
        let mut state = StateVector::zero(2);
        state.apply_gate(Gate::H, &[0]);
        state.apply_gate(Gate::Cx, &[0, 1]);
        assert_close(state.probability(0b00), 0.5);
        assert_close(state.probability(0b11), 0.5);
        assert_close(state.probability(0b01), 0.0);
    }

    #[test]
    fn toffoli_fires_only_on_both_controls() {
        let mut state = StateVector::zero(3);
        state.apply_gate(Gate::X, &[0]);
        state.apply_gate(Gate::Ccx, &[0, 1, 2]);
        assert_close(state.probability(0b001), 1.0);
        state.apply_gate(Gate::X, &[1]);
        state.apply_gate(Gate::Ccx, &[0, 1, 2]);
        assert_close(state.probability(0b111), 1.0);
    }

    #[test]
    fn controlled_pauli_honours_zero_controls() {
        let mut state = StateVector::zero(3);
        // Fires on q0 = 0, q1 = 1.
        state.apply_gate(Gate::X, &[1]);
        state.apply_controlled_pauli(matrices::X, &[0, 1], 0b10, 2);
        assert_close(state.probability(0b110), 1.0);
    }

    #[test]
    fn measurement_collapses_and_renormalizes() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = StateVector::zero(2);
        state.apply_gate(Gate::H, &[0]);
        state.apply_gate(Gate::Cx, &[0, 1]);
        let outcome = state.measure(0, &mut rng);
        let expected = if outcome { 0b11 } else { 0b00 };
        assert_close(state.probability(expected), 1.0);
    }

    #[test]
    fn marginals_follow_qubit_order() {
        let mut state = StateVector::zero(3);
        state.apply_gate(Gate::X, &[2]);
        let probabilities = state.marginal_probabilities(&[2, 0]);
        assert_close(probabilities[0b01], 1.0);
    }
}
