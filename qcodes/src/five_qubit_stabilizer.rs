//! The [[5,1,3]] code driven by its stabilizer generators XZZXI, IXZZX,
//! XIXZZ and ZXIXZ. Each block carries five data qubits, four syndrome
//! ancillas and a parity-readout qubit.
//!
//! The two-qubit gates use a three-round conjugated transversal
//! construction; their fault-tolerant variants insert a check-matrix
//! syndrome pass over the joint ten-qubit block between the second and
//! third rounds.

use qcir::{PauliKind, PauliString, QubitId};

use crate::dual::DualCircuit;
use crate::error::CodeError;
use crate::options::{CorrectionStrategy, EncodeOptions, EncodingState, MeasureBasis};
use crate::syndrome::SyndromeTable;
use crate::{
    apply_table_corrections, guard_encode, measure_operator_block, prepare_initial_state, unsupported,
    EncodedCircuit,
};

const CODE: &str = "five-qubit-stabilizer";
const BLOCK: usize = 5;
const ANCILLAS: usize = 4;

/// The four stabilizer generators, one row per ancilla.
const STABILIZERS: [[PauliKind; BLOCK]; ANCILLAS] = {
    use PauliKind::{I, X, Z};
    [
        [X, Z, Z, X, I],
        [I, X, Z, Z, X],
        [X, I, X, Z, Z],
        [Z, X, I, X, Z],
    ]
};

/// Joint check matrix for the fault-tolerant cx pass: eight checks over
/// the ten data qubits of both blocks, X components first.
const FT_CX_CHECKS: [[u8; 20]; 8] = [
    [1, 0, 1, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
];

/// Joint check matrix for the fault-tolerant cz pass.
const FT_CZ_CHECKS: [[u8; 20]; 8] = [
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 1, 0, 1],
    [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 1, 0, 0, 0, 1],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 0, 1, 0, 0, 1, 0, 0, 1, 1],
    [0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 1],
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum TwoQubitGate {
    Cx,
    Cz,
}

pub struct FiveQubitStabilizer {
    dual: DualCircuit,
    table: SyndromeTable,
}

impl FiveQubitStabilizer {
    #[must_use]
    pub fn new(logical_count: usize) -> Self {
        let table = SyndromeTable::from_rows(
            ANCILLAS,
            &{
                use PauliKind::{X, Y, Z};
                [
                    ("0001", X, 0),
                    ("1000", X, 1),
                    ("1100", X, 2),
                    ("0110", X, 3),
                    ("0011", X, 4),
                    ("1010", Z, 0),
                    ("0101", Z, 1),
                    ("0010", Z, 2),
                    ("1001", Z, 3),
                    ("0100", Z, 4),
                    ("1011", Y, 0),
                    ("1101", Y, 1),
                    ("1110", Y, 2),
                    ("1111", Y, 3),
                    ("0111", Y, 4),
                ]
            },
        );
        table.assert_single_error_bijection(BLOCK, &[PauliKind::X, PauliKind::Y, PauliKind::Z]);
        FiveQubitStabilizer {
            dual: DualCircuit::new(logical_count, BLOCK),
            table,
        }
    }

    fn require_encoded(&self) -> Result<(), CodeError> {
        match self.dual.state() {
            EncodingState::Encoded => Ok(()),
            EncodingState::Decoded => Err(CodeError::AlreadyDecoded),
            _ => Err(CodeError::NotEncoded),
        }
    }

    /// One coherent parity pass per stabilizer generator.
    pub fn spot_syndrome(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let ancillas = self.dual.ensure_ancillas(logical, ANCILLAS);
            let data = self.dual.block(logical)?.data.clone();
            for &ancilla in &ancillas {
                self.dual.physical.h(ancilla);
            }
            self.dual.physical.barrier(None);
            for (row, stabilizer) in STABILIZERS.iter().enumerate() {
                for (i, &term) in stabilizer.iter().enumerate() {
                    match term {
                        PauliKind::I => {}
                        PauliKind::X => self.dual.physical.cx(ancillas[row], data[i]),
                        PauliKind::Y => self.dual.physical.cy(ancillas[row], data[i]),
                        PauliKind::Z => self.dual.physical.cz(ancillas[row], data[i]),
                    }
                }
                self.dual.physical.barrier(None);
            }
            for &ancilla in &ancillas {
                self.dual.physical.h(ancilla);
            }
            self.dual.physical.barrier(None);
            self.dual.block_mut(logical)?.syndrome_spotted = true;
        }
        Ok(())
    }

    /// Measures ancilla `i` into syndrome bit `i`.
    pub fn measure_syndrome(&mut self) -> Result<(), CodeError> {
        for logical in 0..self.dual.logical_count() {
            if !self.dual.block(logical)?.syndrome_spotted {
                return Err(CodeError::SyndromeNotExtracted);
            }
            let creg = self.dual.ensure_syndrome_reg(logical, ANCILLAS);
            let ancillas = self.dual.block(logical)?.ancillas.clone();
            for (bit, &ancilla) in ancillas.iter().enumerate() {
                self.dual.physical.measure(ancilla, creg, bit);
            }
            self.dual.block_mut(logical)?.syndrome_measured = true;
        }
        Ok(())
    }

    /// Parity readout of the logical state onto the block's measurement
    /// qubit. `Z` accumulates data parity on the readout qubit; `X`
    /// conjugates the readout qubit instead. `All` reads in `Z`.
    pub fn measure(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        self.require_encoded()?;
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let readout = self.dual.ensure_measure_qubit(logical);
            let creg = self.dual.ensure_state_reg(logical);
            let data = self.dual.block(logical)?.data.clone();
            match basis {
                MeasureBasis::Z | MeasureBasis::All => {
                    for &qubit in &data {
                        self.dual.physical.cx(qubit, readout);
                    }
                }
                MeasureBasis::X => {
                    self.dual.physical.h(readout);
                    for &qubit in &data {
                        self.dual.physical.cx(readout, qubit);
                    }
                    self.dual.physical.h(readout);
                }
            }
            self.dual.physical.measure(readout, creg, 0);
        }
        Ok(())
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.two_qubit(control, target, TwoQubitGate::Cz, false)
    }

    /// `cx` with the joint syndrome check between the second and third
    /// transversal rounds.
    pub fn cx_fault_tolerant(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.two_qubit(control, target, TwoQubitGate::Cx, true)
    }

    /// `cz` with the joint syndrome check between the second and third
    /// transversal rounds.
    pub fn cz_fault_tolerant(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.two_qubit(control, target, TwoQubitGate::Cz, true)
    }

    fn two_qubit(
        &mut self,
        control: usize,
        target: usize,
        gate: TwoQubitGate,
        fault_tolerant: bool,
    ) -> Result<(), CodeError> {
        self.require_encoded()?;
        let control_data = self.dual.block(control)?.data.clone();
        let target_data = self.dual.block(target)?.data.clone();

        self.dual.physical.barrier(None);
        for data in [&control_data, &target_data] {
            self.dual.physical.h(data[0]);
            self.dual.physical.s(data[0]);
            self.dual.physical.y(data[2]);
            self.dual.physical.h(data[4]);
            self.dual.physical.s(data[4]);
        }
        self.dual.physical.barrier(None);

        // rounds permute the target qubit by two positions each time
        for round in [[0, 2, 4], [4, 0, 2]] {
            for (i, &source) in [0, 2, 4].iter().enumerate() {
                match gate {
                    TwoQubitGate::Cx => self.dual.physical.cx(control_data[source], target_data[round[i]]),
                    TwoQubitGate::Cz => self.dual.physical.cz(control_data[source], target_data[round[i]]),
                }
            }
            self.dual.physical.barrier(None);
        }

        if fault_tolerant {
            let matrix = match gate {
                TwoQubitGate::Cx => &FT_CX_CHECKS,
                TwoQubitGate::Cz => &FT_CZ_CHECKS,
            };
            self.joint_check(control, target, matrix)?;
        }

        for (i, &source) in [0, 2, 4].iter().enumerate() {
            let round = [2, 4, 0];
            match gate {
                TwoQubitGate::Cx => self.dual.physical.cx(control_data[source], target_data[round[i]]),
                TwoQubitGate::Cz => self.dual.physical.cz(control_data[source], target_data[round[i]]),
            }
        }
        self.dual.physical.barrier(None);

        for data in [&control_data, &target_data] {
            self.dual.physical.sdg(data[0]);
            self.dual.physical.h(data[0]);
            self.dual.physical.y(data[2]);
            self.dual.physical.sdg(data[4]);
            self.dual.physical.h(data[4]);
        }
        self.dual.physical.barrier(None);

        match gate {
            TwoQubitGate::Cx => self.dual.logical.cx(control, target),
            TwoQubitGate::Cz => self.dual.logical.cz(control, target),
        }
        Ok(())
    }

    /// Extracts and coherently corrects the joint eight-check syndrome
    /// over both blocks' data qubits, using both blocks' ancillas.
    fn joint_check(
        &mut self,
        control: usize,
        target: usize,
        matrix: &[[u8; 20]; 8],
    ) -> Result<(), CodeError> {
        let mut data: Vec<QubitId> = self.dual.block(control)?.data.clone();
        data.extend(self.dual.block(target)?.data.iter().copied());
        let mut ancillas = self.dual.ensure_ancillas(control, ANCILLAS);
        ancillas.extend(self.dual.ensure_ancillas(target, ANCILLAS));

        self.dual.physical.barrier(None);
        for &ancilla in &ancillas {
            self.dual.physical.h(ancilla);
        }
        self.dual.physical.barrier(None);
        for (row, check) in matrix.iter().enumerate() {
            for (qubit, &target_qubit) in data.iter().enumerate() {
                match (check[qubit], check[qubit + data.len()]) {
                    (1, 1) => self.dual.physical.cy(ancillas[row], target_qubit),
                    (1, 0) => self.dual.physical.cx(ancillas[row], target_qubit),
                    (0, 1) => self.dual.physical.cz(ancillas[row], target_qubit),
                    _ => {}
                }
            }
            self.dual.physical.barrier(None);
        }
        for &ancilla in &ancillas {
            self.dual.physical.h(ancilla);
        }
        self.dual.physical.barrier(None);

        let rows: Vec<Vec<u8>> = matrix.iter().map(|row| row.to_vec()).collect();
        let table = SyndromeTable::from_check_matrix(&rows, data.len());
        for (pattern, correction) in table.corrections() {
            self.dual
                .physical
                .controlled_pauli(correction.pauli, &ancillas, pattern, data[correction.qubit]);
        }
        self.dual.physical.barrier(None);
        Ok(())
    }
}

impl EncodedCircuit for FiveQubitStabilizer {
    fn name(&self) -> &'static str {
        CODE
    }

    fn dual(&self) -> &DualCircuit {
        &self.dual
    }

    fn dual_mut(&mut self) -> &mut DualCircuit {
        &mut self.dual
    }

    /// Universal encoder acting on the prepared state of data qubit 0.
    fn encode(&mut self, options: &EncodeOptions) -> Result<(), CodeError> {
        if !guard_encode(&mut self.dual, options, CODE)? {
            return Ok(());
        }
        for (logical, &state) in options.initial_states.iter().enumerate() {
            let d = self.dual.block(logical)?.data.clone();
            prepare_initial_state(&mut self.dual, logical, d[0], state);
            self.dual.physical.barrier(None);
            self.dual.physical.z(d[0]);
            self.dual.physical.h(d[2]);
            self.dual.physical.h(d[3]);
            self.dual.physical.sdg(d[0]);
            self.dual.physical.cx(d[2], d[4]);
            self.dual.physical.cx(d[3], d[1]);
            self.dual.physical.h(d[1]);
            self.dual.physical.cx(d[3], d[4]);
            self.dual.physical.cx(d[1], d[0]);
            self.dual.physical.sdg(d[2]);
            self.dual.physical.s(d[3]);
            self.dual.physical.sdg(d[4]);
            self.dual.physical.s(d[0]);
            self.dual.physical.s(d[1]);
            self.dual.physical.z(d[2]);
            self.dual.physical.cx(d[4], d[0]);
            self.dual.physical.h(d[4]);
            self.dual.physical.cx(d[4], d[1]);
        }
        self.dual.set_state(EncodingState::Encoded);
        Ok(())
    }

    fn x(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let data = self.dual.block(logical)?.data.clone();
        for &qubit in &data {
            self.dual.physical.x(qubit);
        }
        self.dual.logical.x(logical);
        Ok(())
    }

    fn y(&mut self, _logical: usize) -> Result<(), CodeError> {
        Err(unsupported(CODE, "y"))
    }

    fn z(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let data = self.dual.block(logical)?.data.clone();
        for &qubit in &data {
            self.dual.physical.z(qubit);
        }
        self.dual.logical.z(logical);
        Ok(())
    }

    /// Transversal H followed by the qubit permutation that restores the
    /// codeword ordering.
    fn h(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let d = self.dual.block(logical)?.data.clone();
        for &qubit in &d {
            self.dual.physical.h(qubit);
        }
        self.dual.physical.swap(d[0], d[3]);
        self.dual.physical.swap(d[0], d[4]);
        self.dual.physical.swap(d[0], d[1]);
        self.dual.logical.h(logical);
        self.dual.physical.barrier(None);
        Ok(())
    }

    fn cx(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.two_qubit(control, target, TwoQubitGate::Cx, false)
    }

    fn correct(&mut self, strategy: CorrectionStrategy) -> Result<(), CodeError> {
        for logical in 0..self.dual.logical_count() {
            let table = self.table.clone();
            apply_table_corrections(&mut self.dual, logical, &table, strategy)?;
        }
        Ok(())
    }

    fn measure_all(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let block = self.dual.block(logical)?;
            let with_ancillas = block.syndrome_spotted && !block.syndrome_measured;
            let mut qubits = block.data.clone();
            if with_ancillas || basis == MeasureBasis::All {
                qubits.extend(block.ancillas.iter().copied());
            }
            let creg = if qubits.len() > BLOCK {
                self.dual.ensure_all_reg(logical, BLOCK + ANCILLAS)
            } else {
                self.dual.ensure_data_reg(logical, BLOCK)
            };
            if basis == MeasureBasis::X {
                for &qubit in &qubits {
                    self.dual.physical.h(qubit);
                }
            }
            for (bit, &qubit) in qubits.iter().enumerate() {
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
    fn syndrome_table_is_a_full_bijection() {
        let code = FiveQubitStabilizer::new(1);
        assert_eq!(code.table.corrections().count(), 15);
    }

    #[test]
    fn ft_check_matrices_build_valid_tables() {
        for matrix in [&FT_CX_CHECKS, &FT_CZ_CHECKS] {
            let rows: Vec<Vec<u8>> = matrix.iter().map(|row| row.to_vec()).collect();
            let table = SyndromeTable::from_check_matrix(&rows, 10);
            assert_eq!(table.width(), 8);
            assert_eq!(table.lookup(0), None);
            assert!(table.corrections().count() > 10);
        }
    }

    #[test]
    fn sequencing_is_enforced() {
        let mut code = FiveQubitStabilizer::new(2);
        assert_eq!(code.spot_syndrome(), Err(CodeError::NotEncoded));
        code.encode(&EncodeOptions::zeros(2)).unwrap();
        assert_eq!(code.measure_syndrome(), Err(CodeError::SyndromeNotExtracted));
        code.spot_syndrome().unwrap();
        code.correct(CorrectionStrategy::Coherent).unwrap();
        code.cx_fault_tolerant(0, 1).unwrap();
    }
}
