//! The Steane [[7,1,3]] CSS code. Every logical gate in the supported
//! set is transversal, and gates may even be applied before encoding:
//! they land on the block representative and the encoder picks the
//! state up from there.

use qcir::{PauliKind, PauliString, QubitId};

use crate::dual::DualCircuit;
use crate::error::CodeError;
use crate::options::{CorrectionStrategy, EncodeOptions, EncodingState, InitialState, MeasureBasis};
use crate::syndrome::SyndromeTable;
use crate::{guard_encode, measure_operator_block, prepare_initial_state, EncodedCircuit};

const CODE: &str = "steane";
const BLOCK: usize = 7;
const ANCILLAS: usize = 6;

/// Parity checks of the [[7,1,3]] code; row `i` feeds ancilla `i` of its
/// half. The same three checks detect bit flips directly and phase flips
/// under transversal H.
const CHECKS: [&[usize]; 3] = [&[0, 2, 4, 6], &[1, 2, 5, 6], &[3, 4, 5, 6]];

pub struct Steane {
    dual: DualCircuit,
    table: SyndromeTable,
}

impl Steane {
    /// The check structure keys qubit `q` by pattern `q + 1`.
    #[must_use]
    pub fn new(logical_count: usize) -> Self {
        let table = SyndromeTable::from_css_checks(&CHECKS, BLOCK, PauliKind::X);
        table.assert_single_error_bijection(BLOCK, &[PauliKind::X]);
        Steane {
            dual: DualCircuit::new(logical_count, BLOCK),
            table,
        }
    }

    /// Pre-encoding gates land on the block representative; the state
    /// machine remembers so the encoder keeps them.
    fn gate_qubits(&mut self, logical: usize) -> Result<Vec<QubitId>, CodeError> {
        let data = self.dual.block(logical)?.data.clone();
        match self.dual.state() {
            EncodingState::Encoded => Ok(data),
            EncodingState::NotEncoded | EncodingState::GatesAppliedBeforeEncoding => {
                self.dual.set_state(EncodingState::GatesAppliedBeforeEncoding);
                Ok(vec![data[0]])
            }
            EncodingState::Decoded => Err(CodeError::AlreadyDecoded),
        }
    }

    fn parity_into(&mut self, logical: usize, ancillas: &[QubitId]) -> Result<(), CodeError> {
        let data = self.dual.block(logical)?.data.clone();
        for (row, check) in CHECKS.iter().enumerate() {
            for &qubit in *check {
                self.dual.physical.cx(data[qubit], ancillas[row]);
            }
        }
        Ok(())
    }
}

impl EncodedCircuit for Steane {
    fn name(&self) -> &'static str {
        CODE
    }

    fn dual(&self) -> &DualCircuit {
        &self.dual
    }

    fn dual_mut(&mut self) -> &mut DualCircuit {
        &mut self.dual
    }

    fn encode(&mut self, options: &EncodeOptions) -> Result<(), CodeError> {
        let gates_applied = self.dual.state() == EncodingState::GatesAppliedBeforeEncoding;
        if !guard_encode(&mut self.dual, options, CODE)? {
            return Ok(());
        }
        for (logical, &state) in options.initial_states.iter().enumerate() {
            let d = self.dual.block(logical)?.data.clone();
            // |0> and |1> blocks are prepared directly on the first three
            // qubits, skipping the representative-spreading CX pair
            let known_basis_state =
                !gates_applied && matches!(state, InitialState::Zero | InitialState::One);
            if gates_applied {
                if state != InitialState::Zero {
                    tracing::warn!(
                        code = CODE,
                        logical,
                        "gates were applied before encoding; ignoring the requested initial state"
                    );
                }
            } else if !known_basis_state {
                prepare_initial_state(&mut self.dual, logical, d[0], state);
            }
            self.dual.physical.barrier(None);
            if known_basis_state && state == InitialState::One {
                self.dual.physical.x(d[0]);
                self.dual.physical.x(d[1]);
                self.dual.physical.x(d[2]);
                self.dual.logical.x(logical);
            }
            self.dual.physical.h(d[4]);
            self.dual.physical.h(d[5]);
            self.dual.physical.h(d[6]);
            if !known_basis_state {
                self.dual.physical.cx(d[0], d[1]);
                self.dual.physical.cx(d[0], d[2]);
            }
            self.dual.physical.cx(d[4], d[3]);
            self.dual.physical.cx(d[5], d[3]);
            self.dual.physical.cx(d[6], d[3]);
            self.dual.physical.cx(d[4], d[2]);
            self.dual.physical.cx(d[5], d[2]);
            self.dual.physical.cx(d[4], d[1]);
            self.dual.physical.cx(d[6], d[1]);
            self.dual.physical.cx(d[5], d[0]);
            self.dual.physical.cx(d[6], d[0]);
        }
        self.dual.set_state(EncodingState::Encoded);
        Ok(())
    }

    fn x(&mut self, logical: usize) -> Result<(), CodeError> {
        for qubit in self.gate_qubits(logical)? {
            self.dual.physical.x(qubit);
        }
        self.dual.logical.x(logical);
        Ok(())
    }

    fn y(&mut self, logical: usize) -> Result<(), CodeError> {
        for qubit in self.gate_qubits(logical)? {
            self.dual.physical.y(qubit);
        }
        self.dual.logical.y(logical);
        Ok(())
    }

    fn z(&mut self, logical: usize) -> Result<(), CodeError> {
        for qubit in self.gate_qubits(logical)? {
            self.dual.physical.z(qubit);
        }
        self.dual.logical.z(logical);
        Ok(())
    }

    fn h(&mut self, logical: usize) -> Result<(), CodeError> {
        for qubit in self.gate_qubits(logical)? {
            self.dual.physical.h(qubit);
        }
        self.dual.logical.h(logical);
        Ok(())
    }

    fn cx(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        let control_qubits = self.gate_qubits(control)?;
        let target_qubits = self.gate_qubits(target)?;
        for (&c, &t) in control_qubits.iter().zip(&target_qubits) {
            self.dual.physical.cx(c, t);
        }
        self.dual.logical.cx(control, target);
        Ok(())
    }

    /// Two CSS halves back to back: parity checks into the first three
    /// ancillas correct bit flips, the same checks under transversal H
    /// into the other three correct phase flips.
    fn correct(&mut self, strategy: CorrectionStrategy) -> Result<(), CodeError> {
        if strategy != CorrectionStrategy::Coherent {
            return Err(CodeError::UnsupportedCorrection {
                code: CODE,
                strategy: strategy.as_str(),
            });
        }
        if self.dual.state() != EncodingState::Encoded {
            return Err(CodeError::NotEncoded);
        }
        for logical in 0..self.dual.logical_count() {
            let ancillas = self.dual.ensure_ancillas(logical, ANCILLAS);
            let data = self.dual.block(logical)?.data.clone();
            let (bit_half, phase_half) = ancillas.split_at(3);
            let corrections: Vec<_> = self.table.corrections().collect();

            self.parity_into(logical, bit_half)?;
            for &(pattern, correction) in &corrections {
                self.dual
                    .physical
                    .controlled_pauli(PauliKind::X, bit_half, pattern, data[correction.qubit]);
            }

            for &qubit in &data {
                self.dual.physical.h(qubit);
            }
            self.parity_into(logical, phase_half)?;
            for &(pattern, correction) in &corrections {
                self.dual
                    .physical
                    .controlled_pauli(PauliKind::X, phase_half, pattern, data[correction.qubit]);
            }
            for &qubit in &data {
                self.dual.physical.h(qubit);
            }
            self.dual.physical.barrier(None);
        }
        Ok(())
    }

    /// The logical circuit is measured in lockstep so the two sides stay
    /// comparable shot for shot.
    fn measure_all(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        if self.dual.state() != EncodingState::Encoded {
            return Err(CodeError::NotEncoded);
        }
        self.dual.physical.barrier(None);
        let logical_reg = self.dual.ensure_logical_reg();
        for logical in 0..self.dual.logical_count() {
            if basis == MeasureBasis::X {
                self.dual.logical.h(logical);
            }
            self.dual.logical.measure(logical, logical_reg, logical);

            let data = self.dual.block(logical)?.data.clone();
            match basis {
                MeasureBasis::Z => {
                    let readout = self.dual.ensure_measure_qubit(logical);
                    let creg = self.dual.ensure_state_reg(logical);
                    for &qubit in &data {
                        self.dual.physical.cx(qubit, readout);
                    }
                    self.dual.physical.measure(readout, creg, 0);
                }
                MeasureBasis::X => {
                    let readout = self.dual.ensure_measure_qubit(logical);
                    let creg = self.dual.ensure_state_reg(logical);
                    self.dual.physical.h(readout);
                    for &qubit in &data {
                        self.dual.physical.cx(readout, qubit);
                    }
                    self.dual.physical.h(readout);
                    self.dual.physical.measure(readout, creg, 0);
                }
                MeasureBasis::All => {
                    let creg = self.dual.ensure_data_reg(logical, BLOCK);
                    for (bit, &qubit) in data.iter().enumerate() {
                        self.dual.physical.measure(qubit, creg, bit);
                    }
                }
            }
        }
        Ok(())
    }

    fn measure_operator(&mut self, logical: usize, operator: &PauliString) -> Result<(), CodeError> {
        measure_operator_block(&mut self.dual, logical, operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_table_keys_qubit_by_pattern_plus_one() {
        let code = Steane::new(1);
        for qubit in 0..BLOCK {
            let correction = code.table.lookup((qubit + 1) as u32).unwrap();
            assert_eq!(correction.qubit, qubit);
            assert_eq!(correction.pauli, PauliKind::X);
        }
    }

    #[test]
    fn basis_state_encoding_skips_the_spreading_gates() {
        let mut zero = Steane::new(1);
        zero.encode(&EncodeOptions::zeros(1)).unwrap();
        let mut plus = Steane::new(1);
        plus.encode(&EncodeOptions::states("+").unwrap()).unwrap();
        // the |+> path keeps the preparation H and the two spreading CX
        assert_eq!(
            zero.physical_circuit().instruction_count() + 3,
            plus.physical_circuit().instruction_count()
        );

        let mut one = Steane::new(1);
        one.encode(&EncodeOptions::states("1").unwrap()).unwrap();
        // three direct X replace preparation plus spreading
        assert_eq!(
            one.physical_circuit().instruction_count(),
            zero.physical_circuit().instruction_count() + 3
        );
    }

    #[test]
    fn gates_before_encoding_move_the_state_machine() {
        let mut code = Steane::new(1);
        code.h(0).unwrap();
        assert_eq!(code.state(), EncodingState::GatesAppliedBeforeEncoding);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        assert_eq!(code.state(), EncodingState::Encoded);
    }

    #[test]
    fn measured_correction_is_rejected() {
        let mut code = Steane::new(1);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        assert!(matches!(
            code.correct(CorrectionStrategy::Measured),
            Err(CodeError::UnsupportedCorrection { .. })
        ));
        code.correct(CorrectionStrategy::Coherent).unwrap();
    }

    #[test]
    fn logical_and_physical_measured_in_lockstep() {
        let mut code = Steane::new(2);
        code.encode(&EncodeOptions::zeros(2)).unwrap();
        code.measure_all(MeasureBasis::Z).unwrap();
        assert!(code.logical_circuit().instruction_count() > 0);
        assert!(code.physical_circuit().instruction_count() > 0);
    }
}
