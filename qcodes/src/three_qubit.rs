//! The three-qubit repetition code, in its bit-flip and phase-flip
//! variants. One logical qubit is carried by three data qubits plus two
//! syndrome ancillas.

use qcir::{PauliKind, PauliString};

use crate::dual::DualCircuit;
use crate::error::CodeError;
use crate::options::{CorrectionStrategy, EncodeOptions, EncodingState, MeasureBasis};
use crate::syndrome::SyndromeTable;
use crate::{
    apply_table_corrections, guard_encode, measure_operator_block, prepare_initial_state, unsupported,
    EncodedCircuit,
};

const CODE: &str = "three-qubit";
const BLOCK: usize = 3;
const ANCILLAS: usize = 2;

/// Which single-qubit error family the repetition code protects against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreeQubitKind {
    BitFlip,
    PhaseFlip,
}

impl ThreeQubitKind {
    /// The Pauli this variant corrects.
    #[must_use]
    pub fn corrected_pauli(self) -> PauliKind {
        match self {
            ThreeQubitKind::BitFlip => PauliKind::X,
            ThreeQubitKind::PhaseFlip => PauliKind::Z,
        }
    }
}

pub struct ThreeQubit {
    dual: DualCircuit,
    kind: ThreeQubitKind,
    table: SyndromeTable,
}

impl ThreeQubit {
    /// Ancilla 0 checks the parity of data qubits 0 and 1, ancilla 1 that
    /// of data qubits 1 and 2, so the syndrome patterns are `10` for the
    /// first qubit, `11` for the middle one and `01` for the last.
    #[must_use]
    pub fn new(logical_count: usize, kind: ThreeQubitKind) -> Self {
        let pauli = kind.corrected_pauli();
        let table = SyndromeTable::from_rows(ANCILLAS, &[("10", pauli, 0), ("11", pauli, 1), ("01", pauli, 2)]);
        table.assert_single_error_bijection(BLOCK, &[pauli]);
        ThreeQubit {
            dual: DualCircuit::new(logical_count, BLOCK),
            kind,
            table,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ThreeQubitKind {
        self.kind
    }

    fn require_encoded(&self) -> Result<(), CodeError> {
        match self.dual.state() {
            EncodingState::Encoded => Ok(()),
            EncodingState::Decoded => Err(CodeError::AlreadyDecoded),
            _ => Err(CodeError::NotEncoded),
        }
    }

    /// Undoes the encoder, leaving the logical state on data qubit 0.
    pub fn decode(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let data = self.dual.block(logical)?.data.clone();
            self.dual.physical.barrier(None);
            if self.kind == ThreeQubitKind::PhaseFlip {
                for &qubit in &data {
                    self.dual.physical.h(qubit);
                }
            }
            self.dual.physical.cx(data[0], data[2]);
            self.dual.physical.cx(data[0], data[1]);
        }
        self.dual.set_state(EncodingState::Decoded);
        Ok(())
    }

    /// Copies each stabilizer parity onto the block ancillas.
    pub fn spot_syndrome(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let ancillas = self.dual.ensure_ancillas(logical, ANCILLAS);
            let data = self.dual.block(logical)?.data.clone();
            match self.kind {
                ThreeQubitKind::BitFlip => {
                    self.dual.physical.cx(data[0], ancillas[0]);
                    self.dual.physical.cx(data[1], ancillas[0]);
                    self.dual.physical.cx(data[1], ancillas[1]);
                    self.dual.physical.cx(data[2], ancillas[1]);
                }
                ThreeQubitKind::PhaseFlip => {
                    for &ancilla in &ancillas {
                        self.dual.physical.h(ancilla);
                    }
                    self.dual.physical.cx(ancillas[0], data[0]);
                    self.dual.physical.cx(ancillas[0], data[1]);
                    self.dual.physical.cx(ancillas[1], data[1]);
                    self.dual.physical.cx(ancillas[1], data[2]);
                    for &ancilla in &ancillas {
                        self.dual.physical.h(ancilla);
                    }
                }
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

    /// Post-decode readout of the representative qubit.
    pub fn measure(&mut self, basis: MeasureBasis) -> Result<(), CodeError> {
        if self.dual.state() != EncodingState::Decoded {
            return Err(CodeError::NotEncoded);
        }
        self.dual.physical.barrier(None);
        for logical in 0..self.dual.logical_count() {
            let creg = self.dual.ensure_state_reg(logical);
            let representative = self.dual.block(logical)?.data[0];
            if basis == MeasureBasis::X {
                self.dual.physical.h(representative);
            }
            self.dual.physical.measure(representative, creg, 0);
        }
        Ok(())
    }
}

impl EncodedCircuit for ThreeQubit {
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
            let data = self.dual.block(logical)?.data.clone();
            prepare_initial_state(&mut self.dual, logical, data[0], state);
            self.dual.physical.barrier(None);
            self.dual.physical.cx(data[0], data[1]);
            self.dual.physical.cx(data[0], data[2]);
            if self.kind == ThreeQubitKind::PhaseFlip {
                for &qubit in &data {
                    self.dual.physical.h(qubit);
                }
            }
        }
        self.dual.set_state(EncodingState::Encoded);
        Ok(())
    }

    fn x(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let data = self.dual.block(logical)?.data.clone();
        let pauli = match self.kind {
            ThreeQubitKind::BitFlip => PauliKind::X,
            ThreeQubitKind::PhaseFlip => PauliKind::Z,
        };
        for &qubit in &data {
            self.dual.physical.pauli(pauli, qubit);
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
        let pauli = match self.kind {
            ThreeQubitKind::BitFlip => PauliKind::Z,
            ThreeQubitKind::PhaseFlip => PauliKind::X,
        };
        for &qubit in &data {
            self.dual.physical.pauli(pauli, qubit);
        }
        self.dual.logical.z(logical);
        Ok(())
    }

    fn h(&mut self, _logical: usize) -> Result<(), CodeError> {
        Err(unsupported(CODE, "h"))
    }

    /// Transversal CX; the phase-flip conjugation exchanges control and
    /// target at the physical layer.
    fn cx(&mut self, control: usize, target: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let control_data = self.dual.block(control)?.data.clone();
        let target_data = self.dual.block(target)?.data.clone();
        for (&c, &t) in control_data.iter().zip(&target_data) {
            match self.kind {
                ThreeQubitKind::BitFlip => self.dual.physical.cx(c, t),
                ThreeQubitKind::PhaseFlip => self.dual.physical.cx(t, c),
            }
        }
        self.dual.logical.cx(control, target);
        Ok(())
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
