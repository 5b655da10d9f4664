//! Error-correcting-code circuit engines.
//!
//! Each engine builds a pair of circuits in lockstep: the logical circuit
//! records the ideal computation, while the physical circuit carries the
//! encoded rendition, syndrome extraction and corrections. The
//! [`EncodedCircuit`] trait is the shared contract; the per-code wiring
//! lives in the engine modules.

pub mod dual;
pub mod error;
pub mod five_qubit_perfect;
pub mod five_qubit_stabilizer;
pub mod options;
pub mod shor;
pub mod steane;
pub mod syndrome;
pub mod three_qubit;

pub use dual::{CodeBlock, DualCircuit};
pub use error::CodeError;
pub use five_qubit_perfect::FiveQubitPerfect;
pub use five_qubit_stabilizer::FiveQubitStabilizer;
pub use options::{CorrectionStrategy, EncodeOptions, EncodingState, InitialState, MeasureBasis};
pub use shor::{Shor, ShorCorrection};
pub use steane::Steane;
pub use syndrome::{Correction, SyndromeTable};
pub use three_qubit::{ThreeQubit, ThreeQubitKind};

use qcir::{Circuit, PauliKind, PauliString, QubitId, TimeUnit};
use rand::{Rng, RngCore};

/// The shared contract of every code engine.
///
/// Logical gates return [`CodeError::UnsupportedGate`] where the code has
/// no encoded rendition, never a silent no-op.
pub trait EncodedCircuit {
    fn name(&self) -> &'static str;
    fn dual(&self) -> &DualCircuit;
    fn dual_mut(&mut self) -> &mut DualCircuit;

    fn encode(&mut self, options: &EncodeOptions) -> Result<(), CodeError>;
    fn x(&mut self, logical: usize) -> Result<(), CodeError>;
    fn y(&mut self, logical: usize) -> Result<(), CodeError>;
    fn z(&mut self, logical: usize) -> Result<(), CodeError>;
    fn h(&mut self, logical: usize) -> Result<(), CodeError>;
    fn cx(&mut self, control: usize, target: usize) -> Result<(), CodeError>;
    fn correct(&mut self, strategy: CorrectionStrategy) -> Result<(), CodeError>;
    fn measure_all(&mut self, basis: MeasureBasis) -> Result<(), CodeError>;

    /// Measures a Pauli operator over one block via a fresh ancilla.
    fn measure_operator(&mut self, logical: usize, operator: &PauliString) -> Result<(), CodeError>;

    fn logical_qubit_count(&self) -> usize {
        self.dual().logical_count()
    }

    fn block_size(&self) -> usize {
        self.dual().block_size()
    }

    fn state(&self) -> EncodingState {
        self.dual().state()
    }

    fn logical_circuit(&self) -> &Circuit {
        self.dual().logical()
    }

    fn physical_circuit(&self) -> &Circuit {
        self.dual().physical()
    }

    /// Data qubits of a logical qubit's block.
    fn physical_qubits(&self, logical: usize) -> Result<Vec<QubitId>, CodeError> {
        Ok(self.dual().block(logical)?.data.clone())
    }

    /// Injects a Pauli fault on one physical data qubit.
    fn apply_error(&mut self, pauli: PauliKind, physical: QubitId) -> Result<(), CodeError> {
        self.dual_mut().apply_error(pauli, physical)
    }

    /// One uniformly random Pauli fault per block; returns what was injected.
    fn random_error(&mut self, rng: &mut dyn RngCore) -> Vec<(PauliKind, QubitId)> {
        let block_size = self.block_size();
        let count = self.logical_qubit_count();
        let mut injected = Vec::with_capacity(count);
        for logical in 0..count {
            let pauli = match rng.gen_range(0..3) {
                0 => PauliKind::X,
                1 => PauliKind::Y,
                _ => PauliKind::Z,
            };
            let qubit = logical * block_size + rng.gen_range(0..block_size);
            self.dual_mut()
                .apply_error(pauli, qubit)
                .expect("data qubit index is in range");
            injected.push((pauli, qubit));
        }
        self.dual_mut().physical.barrier(None);
        injected
    }

    fn delay(&mut self, duration: f64, unit: TimeUnit) -> Result<(), CodeError> {
        for logical in 0..self.logical_qubit_count() {
            self.dual_mut().delay_block(logical, duration, unit)?;
        }
        self.dual_mut().physical.barrier(None);
        Ok(())
    }

    fn barrier(&mut self) {
        self.dual_mut().barrier();
    }
}

pub(crate) fn unsupported(code: &'static str, gate: &'static str) -> CodeError {
    CodeError::UnsupportedGate { code, gate }
}

/// Common encode sequencing: re-encode warns and no-ops unless forced, a
/// decoded circuit rejects encoding, and the initial-state list must match
/// the logical qubit count. Returns whether the encoder should run.
pub(crate) fn guard_encode(
    dual: &mut DualCircuit,
    options: &EncodeOptions,
    code: &'static str,
) -> Result<bool, CodeError> {
    if dual.state() == EncodingState::Decoded {
        return Err(CodeError::AlreadyDecoded);
    }
    if options.initial_states.len() != dual.logical_count() {
        return Err(CodeError::InitialStateLengthMismatch {
            expected: dual.logical_count(),
            count: options.initial_states.len(),
        });
    }
    if dual.state() == EncodingState::Encoded {
        if !options.force {
            tracing::warn!(code, "encoder already applied; pass force to re-encode");
            return Ok(false);
        }
        tracing::warn!(code, "re-encoding: resetting data qubits");
        for logical in 0..dual.logical_count() {
            dual.reset_block(logical)?;
        }
    }
    Ok(true)
}

/// Prepares a block's representative qubit (and the logical mirror) in one
/// of the four supported initial states.
pub(crate) fn prepare_initial_state(
    dual: &mut DualCircuit,
    logical: usize,
    representative: QubitId,
    state: InitialState,
) {
    match state {
        InitialState::Zero => {}
        InitialState::One => {
            dual.physical.x(representative);
            dual.logical.x(logical);
        }
        InitialState::Plus => {
            dual.physical.h(representative);
            dual.logical.h(logical);
        }
        InitialState::Minus => {
            dual.physical.x(representative);
            dual.logical.x(logical);
            dual.physical.h(representative);
            dual.logical.h(logical);
        }
    }
}

/// Ancilla-mediated Pauli-operator measurement: H, controlled terms, H,
/// then measure the ancilla into its own register.
pub(crate) fn measure_operator_block(
    dual: &mut DualCircuit,
    logical: usize,
    operator: &PauliString,
) -> Result<(), CodeError> {
    if operator.len() != dual.block_size() {
        return Err(CodeError::OperatorLengthMismatch {
            expected: dual.block_size(),
            got: operator.len(),
        });
    }
    let data = dual.block(logical)?.data.clone();
    let (ancilla, creg) = dual.add_extra_ancilla(logical);
    dual.physical.barrier(None);
    dual.physical.h(ancilla);
    for (i, pauli) in operator.iter().enumerate() {
        match pauli {
            PauliKind::I => {}
            PauliKind::X => dual.physical.cx(ancilla, data[i]),
            PauliKind::Y => dual.physical.cy(ancilla, data[i]),
            PauliKind::Z => dual.physical.cz(ancilla, data[i]),
        }
    }
    dual.physical.h(ancilla);
    dual.physical.measure(ancilla, creg, 0);
    Ok(())
}

/// Appends a syndrome table's corrections.
///
/// Coherent: one multi-controlled Pauli per corrective pattern, controls
/// on the block's ancillas. Measured: one conditioned Pauli per pattern,
/// keyed on the measured syndrome register.
pub(crate) fn apply_table_corrections(
    dual: &mut DualCircuit,
    logical: usize,
    table: &SyndromeTable,
    strategy: CorrectionStrategy,
) -> Result<(), CodeError> {
    let block = dual.block(logical)?;
    let data = block.data.clone();
    let ancillas = block.ancillas.clone();
    match strategy {
        CorrectionStrategy::Coherent => {
            if !block.syndrome_spotted {
                return Err(CodeError::SyndromeNotExtracted);
            }
            assert_eq!(ancillas.len(), table.width());
            for (pattern, correction) in table.corrections() {
                dual.physical
                    .controlled_pauli(correction.pauli, &ancillas, pattern, data[correction.qubit]);
            }
        }
        CorrectionStrategy::Measured => {
            if !block.syndrome_measured {
                return Err(CodeError::SyndromeNotMeasured);
            }
            let creg = block.syndrome_reg.expect("measured syndrome has a register");
            for (pattern, correction) in table.corrections() {
                dual.physical
                    .conditional_pauli(correction.pauli, data[correction.qubit], creg, u64::from(pattern));
            }
        }
    }
    dual.physical.barrier(None);
    Ok(())
}
