//! The Shor [[9,1,3]] code: three bit-flip blocks nested inside one
//! phase-flip block. Nine data qubits, eight syndrome ancillas and a
//! parity-readout qubit per logical qubit.
//!
//! Two correction routes are offered. The stabilizer route extracts the
//! eight-check syndrome onto the ancillas and corrects in place; the
//! decoding route undoes the encoder with majority-vote Toffolis and
//! leaves the recovered state on the block representative.

use qcir::{PauliKind, PauliString};

use crate::dual::DualCircuit;
use crate::error::CodeError;
use crate::options::{CorrectionStrategy, EncodeOptions, EncodingState, MeasureBasis};
use crate::syndrome::{Correction, SyndromeTable};
use crate::{
    apply_table_corrections, guard_encode, measure_operator_block, prepare_initial_state, unsupported,
    EncodedCircuit,
};

const CODE: &str = "shor";
const BLOCK: usize = 9;
const ANCILLAS: usize = 8;

/// Which correction pass runs before readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShorCorrection {
    /// Majority-vote decoding; the logical state ends on the block
    /// representative.
    Decoding,
    /// In-place stabilizer correction; the block stays encoded.
    Stabilizers,
}

pub struct Shor {
    dual: DualCircuit,
    table: SyndromeTable,
}

impl Shor {
    #[must_use]
    pub fn new(logical_count: usize) -> Self {
        Shor {
            dual: DualCircuit::new(logical_count, BLOCK),
            table: Self::stabilizer_table(),
        }
    }

    /// Ancillas 2b and 2b+1 carry the ZZ parities inside bit-flip block
    /// b, flagging X errors; ancillas 6 and 7 carry the two six-qubit X
    /// parities, flagging Z errors up to a per-block representative.
    /// Y combines both flags. Twenty-one corrective patterns in all.
    fn stabilizer_table() -> SyndromeTable {
        // bit i of an X-error pattern is the intra-block ancilla it trips
        const X_PATTERNS: [u32; BLOCK] = [1, 3, 2, 4, 12, 8, 16, 48, 32];
        const Z_PATTERNS: [u32; 3] = [0b0100_0000, 0b1100_0000, 0b1000_0000];
        let mut entries: Vec<(u32, Option<Correction>)> = vec![(0, None)];
        for (qubit, &pattern) in X_PATTERNS.iter().enumerate() {
            entries.push((pattern, Some(Correction { pauli: PauliKind::X, qubit })));
            entries.push((
                pattern | Z_PATTERNS[qubit / 3],
                Some(Correction { pauli: PauliKind::Y, qubit }),
            ));
        }
        for (block, &pattern) in Z_PATTERNS.iter().enumerate() {
            entries.push((pattern, Some(Correction { pauli: PauliKind::Z, qubit: block * 3 })));
        }
        SyndromeTable::new(ANCILLAS, 0, entries)
    }

    fn require_encoded(&self) -> Result<(), CodeError> {
        match self.dual.state() {
            EncodingState::Encoded => Ok(()),
            EncodingState::Decoded => Err(CodeError::AlreadyDecoded),
            _ => Err(CodeError::NotEncoded),
        }
    }

    /// Majority-vote decoder: the inverse encoder with Toffolis fixing
    /// any single bit or phase flip on the way down.
    pub fn decode(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let d = self.dual.block(logical)?.data.clone();
            self.dual.physical.barrier(None);
            for base in [0, 3, 6] {
                self.dual.physical.cx(d[base], d[base + 1]);
                self.dual.physical.cx(d[base], d[base + 2]);
            }
            for base in [0, 3, 6] {
                self.dual.physical.ccx(d[base + 1], d[base + 2], d[base]);
            }
            self.dual.physical.h(d[0]);
            self.dual.physical.h(d[3]);
            self.dual.physical.h(d[6]);
            self.dual.physical.cx(d[0], d[3]);
            self.dual.physical.cx(d[0], d[6]);
            self.dual.physical.ccx(d[3], d[6], d[0]);
        }
        self.dual.set_state(EncodingState::Decoded);
        Ok(())
    }

    /// Extracts all eight stabilizer parities onto the block ancillas.
    pub fn spot_syndrome(&mut self) -> Result<(), CodeError> {
        self.require_encoded()?;
        for logical in 0..self.dual.logical_count() {
            let ancillas = self.dual.ensure_ancillas(logical, ANCILLAS);
            let d = self.dual.block(logical)?.data.clone();
            for block in 0..3 {
                let base = block * 3;
                self.dual.physical.cx(d[base], ancillas[2 * block]);
                self.dual.physical.cx(d[base + 1], ancillas[2 * block]);
                self.dual.physical.cx(d[base + 1], ancillas[2 * block + 1]);
                self.dual.physical.cx(d[base + 2], ancillas[2 * block + 1]);
            }
            for (ancilla, range) in [(ancillas[6], 0..6), (ancillas[7], 3..9)] {
                self.dual.physical.h(ancilla);
                for qubit in range {
                    self.dual.physical.cx(ancilla, d[qubit]);
                }
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

    /// `measure_all` with an explicit correction route. The logical
    /// circuit is measured in lockstep either way.
    pub fn measure_all_with(&mut self, basis: MeasureBasis, correction: ShorCorrection) -> Result<(), CodeError> {
        if correction == ShorCorrection::Decoding && self.dual.state() == EncodingState::Encoded {
            self.decode()?;
        }
        match self.dual.state() {
            EncodingState::Encoded | EncodingState::Decoded => {}
            _ => return Err(CodeError::NotEncoded),
        }
        self.dual.physical.barrier(None);
        let logical_reg = self.dual.ensure_logical_reg();
        for logical in 0..self.dual.logical_count() {
            if basis == MeasureBasis::X {
                self.dual.logical.h(logical);
            }
            self.dual.logical.measure(logical, logical_reg, logical);

            let d = self.dual.block(logical)?.data.clone();
            if basis == MeasureBasis::All {
                let creg = self.dual.ensure_data_reg(logical, BLOCK);
                for (bit, &qubit) in d.iter().enumerate() {
                    self.dual.physical.measure(qubit, creg, bit);
                }
                continue;
            }
            match correction {
                ShorCorrection::Decoding => {
                    let creg = self.dual.ensure_state_reg(logical);
                    if basis == MeasureBasis::X {
                        self.dual.physical.h(d[0]);
                    }
                    self.dual.physical.measure(d[0], creg, 0);
                }
                ShorCorrection::Stabilizers => {
                    let readout = self.dual.ensure_measure_qubit(logical);
                    let creg = self.dual.ensure_state_reg(logical);
                    match basis {
                        // logical Z of the code is an X-type parity
                        MeasureBasis::Z => {
                            self.dual.physical.h(readout);
                            for &qubit in &d {
                                self.dual.physical.cx(readout, qubit);
                            }
                            self.dual.physical.h(readout);
                        }
                        MeasureBasis::X => {
                            for &qubit in &d {
                                self.dual.physical.cx(qubit, readout);
                            }
                        }
                        MeasureBasis::All => unreachable!(),
                    }
                    self.dual.physical.measure(readout, creg, 0);
                }
            }
        }
        Ok(())
    }
}

impl EncodedCircuit for Shor {
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
            prepare_initial_state(&mut self.dual, logical, d[0], state);
            self.dual.physical.barrier(None);
            self.dual.physical.cx(d[0], d[3]);
            self.dual.physical.cx(d[0], d[6]);
            self.dual.physical.h(d[0]);
            self.dual.physical.h(d[3]);
            self.dual.physical.h(d[6]);
            for base in [0, 3, 6] {
                self.dual.physical.cx(d[base], d[base + 1]);
                self.dual.physical.cx(d[base], d[base + 2]);
            }
        }
        self.dual.set_state(EncodingState::Encoded);
        Ok(())
    }

    /// Logical X of the nested construction is transversal Z.
    fn x(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let data = self.dual.block(logical)?.data.clone();
        for &qubit in &data {
            self.dual.physical.z(qubit);
        }
        self.dual.logical.x(logical);
        Ok(())
    }

    fn y(&mut self, _logical: usize) -> Result<(), CodeError> {
        Err(unsupported(CODE, "y"))
    }

    /// Logical Z of the nested construction is transversal X.
    fn z(&mut self, logical: usize) -> Result<(), CodeError> {
        self.require_encoded()?;
        let data = self.dual.block(logical)?.data.clone();
        for &qubit in &data {
            self.dual.physical.x(qubit);
        }
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
        // transversal under the X/Z exchange: physical control is the
        // logical target's block
        for (&c, &t) in target_data.iter().zip(&control_data) {
            self.dual.physical.cx(c, t);
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
        self.measure_all_with(basis, ShorCorrection::Stabilizers)
    }

    fn measure_operator(&mut self, logical: usize, operator: &PauliString) -> Result<(), CodeError> {
        measure_operator_block(&mut self.dual, logical, operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stabilizer_table_has_twenty_one_corrections() {
        let table = Shor::stabilizer_table();
        assert_eq!(table.corrections().count(), 21);
        assert_eq!(
            table.lookup(0b11),
            Some(Correction { pauli: PauliKind::X, qubit: 1 })
        );
        assert_eq!(
            table.lookup(0b1100_0000),
            Some(Correction { pauli: PauliKind::Z, qubit: 3 })
        );
        assert_eq!(table.lookup(0), None);
    }

    #[test]
    fn decoding_route_decodes_once() {
        let mut code = Shor::new(1);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        code.measure_all_with(MeasureBasis::Z, ShorCorrection::Decoding).unwrap();
        assert_eq!(code.state(), EncodingState::Decoded);
    }

    #[test]
    fn decoded_circuit_rejects_gates_and_syndromes() {
        let mut code = Shor::new(1);
        code.encode(&EncodeOptions::zeros(1)).unwrap();
        code.decode().unwrap();
        assert_eq!(code.x(0), Err(CodeError::AlreadyDecoded));
        assert_eq!(code.spot_syndrome(), Err(CodeError::AlreadyDecoded));
    }
}
