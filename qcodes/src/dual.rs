use qcir::{Circuit, Creg, PauliKind, QubitId, TimeUnit};

use crate::error::CodeError;
use crate::options::EncodingState;

/// Per-logical-qubit physical resources.
///
/// Data qubits are fixed at construction; syndrome ancillas and the
/// measurement qubit are allocated the first time they are used. Extra
/// ancillas for operator measurements are append-only and never reused.
#[derive(Clone, Debug)]
pub struct CodeBlock {
    pub data: Vec<QubitId>,
    pub ancillas: Vec<QubitId>,
    pub measure_qubit: Option<QubitId>,
    pub extra_ancillas: Vec<QubitId>,
    pub syndrome_reg: Option<Creg>,
    pub data_reg: Option<Creg>,
    pub state_reg: Option<Creg>,
    pub all_reg: Option<Creg>,
    pub extra_regs: Vec<Creg>,
    pub syndrome_spotted: bool,
    pub syndrome_measured: bool,
}

/// The logical circuit and its physical rendition kept in lockstep.
#[derive(Clone, Debug)]
pub struct DualCircuit {
    pub(crate) logical: Circuit,
    pub(crate) physical: Circuit,
    state: EncodingState,
    blocks: Vec<CodeBlock>,
    block_size: usize,
    logical_reg: Option<Creg>,
}

impl DualCircuit {
    /// Lays out `logical_count` blocks of `block_size` contiguous data
    /// qubits; block `i` owns physical qubits `i * block_size ..`.
    #[must_use]
    pub fn new(logical_count: usize, block_size: usize) -> Self {
        assert!(logical_count > 0, "at least one logical qubit");
        let blocks = (0..logical_count)
            .map(|i| CodeBlock {
                data: (i * block_size..(i + 1) * block_size).collect(),
                ancillas: Vec::new(),
                measure_qubit: None,
                extra_ancillas: Vec::new(),
                syndrome_reg: None,
                data_reg: None,
                state_reg: None,
                all_reg: None,
                extra_regs: Vec::new(),
                syndrome_spotted: false,
                syndrome_measured: false,
            })
            .collect();
        DualCircuit {
            logical: Circuit::new(logical_count),
            physical: Circuit::new(logical_count * block_size),
            state: EncodingState::NotEncoded,
            blocks,
            block_size,
            logical_reg: None,
        }
    }

    #[must_use]
    pub fn logical(&self) -> &Circuit {
        &self.logical
    }

    #[must_use]
    pub fn physical(&self) -> &Circuit {
        &self.physical
    }

    #[must_use]
    pub fn logical_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[must_use]
    pub fn state(&self) -> EncodingState {
        self.state
    }

    pub fn set_state(&mut self, state: EncodingState) {
        self.state = state;
    }

    pub fn block(&self, logical: usize) -> Result<&CodeBlock, CodeError> {
        self.blocks.get(logical).ok_or(CodeError::LogicalIndexOutOfRange {
            index: logical,
            count: self.blocks.len(),
        })
    }

    pub fn block_mut(&mut self, logical: usize) -> Result<&mut CodeBlock, CodeError> {
        let count = self.blocks.len();
        self.blocks
            .get_mut(logical)
            .ok_or(CodeError::LogicalIndexOutOfRange { index: logical, count })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter()
    }

    /// Allocates the block's fixed syndrome ancillas on first use.
    pub fn ensure_ancillas(&mut self, logical: usize, count: usize) -> Vec<QubitId> {
        if self.blocks[logical].ancillas.is_empty() {
            let ancillas: Vec<QubitId> = (0..count).map(|_| self.physical.add_qubit()).collect();
            self.blocks[logical].ancillas = ancillas;
        }
        assert_eq!(self.blocks[logical].ancillas.len(), count);
        self.blocks[logical].ancillas.clone()
    }

    pub fn ensure_measure_qubit(&mut self, logical: usize) -> QubitId {
        if let Some(qubit) = self.blocks[logical].measure_qubit {
            return qubit;
        }
        let qubit = self.physical.add_qubit();
        self.blocks[logical].measure_qubit = Some(qubit);
        qubit
    }

    /// A fresh ancilla and one-bit register for an operator measurement.
    pub fn add_extra_ancilla(&mut self, logical: usize) -> (QubitId, Creg) {
        let qubit = self.physical.add_qubit();
        let index = self.blocks[logical].extra_ancillas.len();
        let creg = self
            .physical
            .add_register(&format!("q{logical}_extra_meas{index}"), 1);
        let block = &mut self.blocks[logical];
        block.extra_ancillas.push(qubit);
        block.extra_regs.push(creg);
        (qubit, creg)
    }

    pub fn ensure_syndrome_reg(&mut self, logical: usize, width: usize) -> Creg {
        if let Some(creg) = self.blocks[logical].syndrome_reg {
            return creg;
        }
        let creg = self.physical.add_register(&format!("q{logical}_anc_meas"), width);
        self.blocks[logical].syndrome_reg = Some(creg);
        creg
    }

    pub fn ensure_data_reg(&mut self, logical: usize, width: usize) -> Creg {
        if let Some(creg) = self.blocks[logical].data_reg {
            return creg;
        }
        let creg = self.physical.add_register(&format!("q{logical}_meas"), width);
        self.blocks[logical].data_reg = Some(creg);
        creg
    }

    pub fn ensure_state_reg(&mut self, logical: usize) -> Creg {
        if let Some(creg) = self.blocks[logical].state_reg {
            return creg;
        }
        let creg = self.physical.add_register(&format!("q{logical}_state_meas"), 1);
        self.blocks[logical].state_reg = Some(creg);
        creg
    }

    pub fn ensure_all_reg(&mut self, logical: usize, width: usize) -> Creg {
        if let Some(creg) = self.blocks[logical].all_reg {
            return creg;
        }
        let creg = self.physical.add_register(&format!("q{logical}_all_meas"), width);
        self.blocks[logical].all_reg = Some(creg);
        creg
    }

    /// Readout register of the logical circuit, created on first use.
    pub fn ensure_logical_reg(&mut self) -> Creg {
        if let Some(creg) = self.logical_reg {
            return creg;
        }
        let count = self.logical.qubit_count();
        let creg = self.logical.add_register("logical_bits", count);
        self.logical_reg = Some(creg);
        creg
    }

    pub fn barrier(&mut self) {
        self.physical.barrier(None);
        self.logical.barrier(None);
    }

    /// Resets a block's data qubits and its logical mirror.
    pub fn reset_block(&mut self, logical: usize) -> Result<(), CodeError> {
        let data = self.block(logical)?.data.clone();
        for qubit in data {
            self.physical.reset(qubit);
        }
        self.logical.reset(logical);
        Ok(())
    }

    /// Fault injection: a Pauli on one physical data qubit, with no logical
    /// mirror.
    pub fn apply_error(&mut self, pauli: PauliKind, physical: QubitId) -> Result<(), CodeError> {
        let data_count = self.blocks.len() * self.block_size;
        if physical >= data_count {
            return Err(CodeError::PhysicalIndexOutOfRange {
                index: physical,
                count: data_count,
            });
        }
        self.physical.pauli(pauli, physical);
        Ok(())
    }

    /// Per-data-qubit delay mirrored as one logical delay.
    pub fn delay_block(&mut self, logical: usize, duration: f64, unit: TimeUnit) -> Result<(), CodeError> {
        let data = self.block(logical)?.data.clone();
        for qubit in data {
            self.physical.delay(duration, unit, qubit);
        }
        self.logical.delay(duration, unit, logical);
        Ok(())
    }
}
