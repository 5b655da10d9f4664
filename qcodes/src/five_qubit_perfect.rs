//! The perfect [[5,1,3]] code.
//!
//! This rendition corrects after decoding: the four non-representative
//! data qubits then carry the syndrome, and every correction targets the
//! representative qubit alone. Coherent correction conditions on those
//! four qubits directly; measured correction reads them into a register
//! first.

use qcir::{PauliKind, PauliString};

use crate::dual::DualCircuit;
use crate::error::CodeError;
use crate::options::{CorrectionStrategy, EncodeOptions, EncodingState, MeasureBasis};
use crate::syndrome::{Correction, SyndromeTable};
use crate::{guard_encode, measure_operator_block, prepare_initial_state, unsupported, EncodedCircuit};

const CODE: &str = "five-qubit-perfect";
const BLOCK: usize = 5;
/// Representative data qubit within a block.
const REPRESENTATIVE: usize = 2;
/// Block qubits read as syndrome bits 0..3 after decoding.
const SYNDROME_QUBITS: [usize; 4] = [0, 1, 3, 4];

pub struct FiveQubitPerfect {
    dual: DualCircuit,
    table: SyndromeTable,
}

impl FiveQubitPerfect {
    #[must_use]
    pub fn new(logical_count: usize) -> Self {
        FiveQubitPerfect {
            dual: DualCircuit::new(logical_count, BLOCK),
            table: Self::residue_table(),
        }
    }

    /// Post-decode residues on the representative qubit. Eleven of the
    /// sixteen patterns key a correction; the other four, the trivial one
    /// included, leave the state alone. Distinct faults can share a
    /// pattern here, so this table is deliberately not a bijection over
    /// single-qubit errors.
    fn residue_table() -> SyndromeTable {
        let entry = |pattern: u32, pauli: PauliKind| {
            (pattern, Some(Correction { pauli, qubit: REPRESENTATIVE }))
        };
        SyndromeTable::new(
            4,
            0,
            [
                (0b0000, None),
                (0b0001, None),
                (0b0010, None),
                (0b0100, None),
                (0b1100, None),
                entry(0b1000, PauliKind::Z),
                entry(0b1010, PauliKind::Z),
                entry(0b0101, PauliKind::Z),
                entry(0b0011, PauliKind::Z),
                entry(0b1111, PauliKind::Z),
                entry(0b0110, PauliKind::X),
                entry(0b1110, PauliKind::X),
                entry(0b1001, PauliKind::X),
                entry(0b1101, PauliKind::X),
                entry(0b0111, PauliKind::X),
                entry(0b1011, PauliKind::Y),
            ],
        )
    }

    fn require_encoded(&self) -> Result<(), CodeError> {
        match self.dual.state() {
            EncodingState::Encoded => Ok(()),
            EncodingState::Decoded => Err(CodeError::AlreadyDecoded),
            _ => Err(CodeError::NotEncoded),
        }
    }

    fn require_decoded(&self) -> Result<(), CodeError> {
        if self.dual.state() == EncodingState::Decoded {
            Ok(())
        } else {
            Err(CodeError::NotEncoded)
        }
    }

    /// Inverse of the encoder; the logical state returns to the
    /// representative qubit and the rest become syndrome flags.
    pub fn decode(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let d = self.dual.block(logical)?.data.clone();
            self.dual.physical.barrier(None);
            self.dual.physical.cz(d[3], d[4]);
            self.dual.physical.cx(d[1], d[4]);
            self.dual.physical.cx(d[3], d[2]);
            self.dual.physical.cx(d[0], d[4]);
            self.dual.physical.cx(d[0], d[2]);
            self.dual.physical.cx(d[2], d[4]);
            self.dual
                .physical
                .controlled_pauli(PauliKind::Z, &[d[1], d[3]], 0b00, d[2]);
            self.dual
                .physical
                .controlled_pauli(PauliKind::Z, &[d[1], d[3]], 0b11, d[2]);
            self.dual.physical.h(d[3]);
            self.dual.physical.h(d[1]);
            self.dual.physical.h(d[0]);
        }
        self.dual.set_state(EncodingState::Decoded);
        Ok(())
    }

    /// Reads the four syndrome qubits into the block's syndrome register.
    pub fn measure_syndrome(&mut self) -> Result<(), CodeError> {
        self.require_decoded()?;
        for logical in 0..self.dual.logical_count() {
            let creg = self.dual.ensure_syndrome_reg(logical, SYNDROME_QUBITS.len());
            let data = self.dual.block(logical)?.data.clone();
            for (bit, &qubit) in SYNDROME_QUBITS.iter().enumerate() {
                self.dual.physical.measure(data[qubit], creg, bit);
            }
            self.dual.block_mut(logical)?.syndrome_measured = true;
        }
        Ok(())
    }

    /// Post-decode readout of the representative qubit.
    pub fn measure(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        self.require_decoded()?;
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let creg = self.dual.ensure_state_reg(logical);
            let representative = self.dual.block(logical)?.data[REPRESENTATIVE];
            if basis == MeasureBasis::X {
                self.dual.physical.h(representative);
            }
            self.dual.physical.measure(representative, creg, 0);
        }
        Ok(())
    }

    /// Ancilla-mediated readout of a logical operator on the encoded
    /// state. `Z` measures the encoded bit, `X` its conjugate; `All`
    /// reads in `Z`.
    pub fn logical_measure(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        self.require_encoded()?;
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let ancilla = self.dual.ensure_measure_qubit(logical);
            let creg = self.dual.ensure_state_reg(logical);
            let d = self.dual.block(logical)?.data.clone();
            self.dual.physical.h(ancilla);
            match basis {
                MeasureBasis::Z | MeasureBasis::All => {
                    self.dual.physical.cx(ancilla, d[0]);
                    self.dual.physical.cx(ancilla, d[1]);
                    self.dual.physical.cx(ancilla, d[2]);
                }
                MeasureBasis::X => {
                    self.dual.physical.cz(ancilla, d[0]);
                    self.dual.physical.cx(ancilla, d[1]);
                    self.dual.physical.cx(ancilla, d[2]);
                    self.dual.physical.cz(ancilla, d[3]);
                    self.dual.physical.cz(ancilla, d[4]);
                }
            }
            self.dual.physical.h(ancilla);
            self.dual.physical.measure(ancilla, creg, 0);
        }
        Ok(())
    }
}

impl EncodedCircuit for FiveQubitPerfect {
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
        if !guard_encode(&mut self.dual, options, CODE)? {
            return Ok(());
        }
        for (logical, &state) in options.initial_states.iter().enumerate() {
            let d = self.dual.block(logical)?.data.clone();
            prepare_initial_state(&mut self.dual, logical, d[REPRESENTATIVE], state);
            self.dual.physical.barrier(None);
            self.dual.physical.h(d[0]);
            self.dual.physical.h(d[1]);
            self.dual.physical.h(d[3]);
            self.dual
                .physical
                .controlled_pauli(PauliKind::Z, &[d[1], d[3]], 0b11, d[2]);
            self.dual
                .physical
                .controlled_pauli(PauliKind::Z, &[d[1], d[3]], 0b00, d[2]);
            self.dual.physical.cx(d[2], d[4]);
            self.dual.physical.cx(d[0], d[2]);
            self.dual.physical.cx(d[0], d[4]);
            self.dual.physical.cx(d[3], d[2]);
            self.dual.physical.cx(d[1], d[4]);
            self.dual.physical.cz(d[3], d[4]);
        }
        self.dual.set_state(EncodingState::Encoded);
        Ok(())
    }

    /// Logical X is the encoded operator Z X X Z Z.
    fn x(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let d = self.dual.block(logical)?.data.clone();
        for (qubit, pauli) in [
            (d[0], PauliKind::Z),
            (d[1], PauliKind::X),
            (d[2], PauliKind::X),
            (d[3], PauliKind::Z),
            (d[4], PauliKind::Z),
        ] {
            self.dual.physical.pauli(pauli, qubit);
        }
        self.dual.logical.x(logical);
        Ok(())
    }

    fn y(&mut self, _logical: usize) -> Result<(), CodeError> {
        Err(unsupported(CODE, "y"))
    }

    /// Logical Z is the encoded operator X X X I I.
    fn z(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let d = self.dual.block(logical)?.data.clone();
        self.dual.physical.x(d[0]);
        self.dual.physical.x(d[1]);
        self.dual.physical.x(d[2]);
        self.dual.logical.z(logical);
        Ok(())
    }

    fn h(&mut self, _logical: usize) -> Result<(), CodeError> {
        Err(unsupported(CODE, "h"))
    }

    fn cx(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let control_data = self.dual.block(control)?.data.clone();
        let target_data = self.dual.block(target)?.data.clone();
        for (&c, &t) in control_data.iter().zip(&target_data) {
            self.dual.physical.cx(c, t);
        }
        self.dual.logical.cx(control, target);
        Ok(())
    }

    fn correct(&mut self, strategy: CorrectionStrategy) -> Result<(), CodeError> {
        self.require_decoded()?;
        for logical in 0..self.dual.logical_count() {
            let data = self.dual.block(logical)?.data.clone();
            let controls: Vec<_> = SYNDROME_QUBITS.iter().map(|&q| data[q]).collect();
            let table = self.table.clone();
            match strategy {
                CorrectionStrategy::Coherent => {
                    for (pattern, correction) in table.corrections() {
                        self.dual.physical.controlled_pauli(
                            correction.pauli,
                            &controls,
                            pattern,
                            data[correction.qubit],
                        );
                    }
                }
                CorrectionStrategy::Measured => {
                    if !self.dual.block(logical)?.syndrome_measured {
                        return Err(CodeError::SyndromeNotMeasured);
                    }
                    let creg = self
                        .dual
                        .block(logical)?
                        .syndrome_reg
                        .expect("measured syndrome has a register");
                    for (pattern, correction) in table.corrections() {
                        self.dual.physical.conditional_pauli(
                            correction.pauli,
                            data[correction.qubit],
                            creg,
                            u64::from(pattern),
                        );
                    }
                }
            }
            self.dual.physical.barrier(None);
        }
        Ok(())
    }

    fn measure_all(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let data = self.dual.block(logical)?.data.clone();
            let creg = self.dual.ensure_data_reg(logical, BLOCK);
            if basis == MeasureBasis::X {
                for &qubit in &data {
                    self.dual.physical.h(qubit);
                }
            }
            for (bit, &qubit) in data.iter().enumerate() {
                self.dual.physical.measure(qubit, creg, bit);
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
    fn residue_table_has_eleven_corrections() {
        let table = FiveQubitPerfect::residue_table();
        assert_eq!(table.corrections().count(), 11);
        for (_, correction) in table.corrections() {
            assert_eq!(correction.qubit, REPRESENTATIVE);
        }
        assert_eq!(table.lookup(0b0001), None);
        assert!(table.lookup(0b1011).is_some());
    }

    #[test]
    fn correction_requires_decoding_first() {
        let mut code = FiveQubitPerfect::new(1);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        assert_eq!(code.correct(CorrectionStrategy::Coherent), Err(CodeError::NotEncoded));
        code.decode().unwrap();
        code.correct(CorrectionStrategy::Coherent).unwrap();
    }

    #[test]
    fn decoded_circuit_rejects_logical_gates() {
        let mut code = FiveQubitPerfect::new(1);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        code.decode().unwrap();
        assert_eq!(code.x(0), Err(CodeError::AlreadyDecoded));
        assert_eq!(code.decode(), Err(CodeError::AlreadyDecoded));
    }
}
