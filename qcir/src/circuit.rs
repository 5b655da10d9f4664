use derive_more::Display;
use smallvec::SmallVec;

use crate::gate::Gate;
use crate::pauli::PauliKind;

pub type QubitId = usize;

/// Handle to a classical register owned by a [`Circuit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Creg(pub(crate) usize);

/// A named run of classical bits inside a circuit's flat bit space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassicalRegister {
    pub name: String,
    pub offset: usize,
    pub size: usize,
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum TimeUnit {
    #[display("s")]
    Seconds,
    #[display("ms")]
    Milliseconds,
    #[display("us")]
    Microseconds,
    #[display("ns")]
    Nanoseconds,
    #[display("dt")]
    Dt,
}

#[derive(Clone, Debug)]
pub enum Instruction {
    Gate {
        gate: Gate,
        qubits: SmallVec<[QubitId; 2]>,
    },
    /// Coherent multi-controlled Pauli. Bit `i` of `control_state` gives the
    /// basis value `controls[i]` must hold for the Pauli to fire.
    ControlledPauli {
        pauli: PauliKind,
        controls: SmallVec<[QubitId; 4]>,
        control_state: u32,
        target: QubitId,
    },
    /// Pauli applied only when `register` holds exactly `value`, reading
    /// classical bit `i` of the register as bit `i` of the value.
    ConditionalPauli {
        pauli: PauliKind,
        target: QubitId,
        register: Creg,
        value: u64,
    },
    Measure {
        qubit: QubitId,
        clbit: usize,
    },
    Reset {
        qubit: QubitId,
    },
    Delay {
        duration: f64,
        unit: TimeUnit,
        qubit: QubitId,
    },
    Barrier {
        label: Option<String>,
    },
}

/// An instruction-list circuit over a growable qubit set.
///
/// Qubits are plain indices; classical bits live in named registers
/// created on demand with [`Circuit::add_register`].
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Circuit {
    qubit_count: usize,
    cregs: Vec<ClassicalRegister>,
    clbit_count: usize,
    pub(crate) instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new(qubit_count: usize) -> Self {
        Circuit {
            qubit_count,
            ..Circuit::default()
        }
    }

    pub fn with_capacity(qubit_count: usize, capacity: usize) -> Self {
        Circuit {
            qubit_count,
            instructions: Vec::with_capacity(capacity),
            ..Circuit::default()
        }
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    #[must_use]
    pub fn clbit_count(&self) -> usize {
        self.clbit_count
    }

    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Appends a fresh qubit and returns its index.
    pub fn add_qubit(&mut self) -> QubitId {
        self.qubit_count += 1;
        self.qubit_count - 1
    }

    /// Creates a classical register of `size` bits.
    ///
    /// # Panics
    ///
    /// Panics if a register with the same name already exists.
    pub fn add_register(&mut self, name: &str, size: usize) -> Creg {
        assert!(
            self.cregs.iter().all(|r| r.name != name),
            "duplicate classical register {name}"
        );
        let register = ClassicalRegister {
            name: name.to_owned(),
            offset: self.clbit_count,
            size,
        };
        self.clbit_count += size;
        self.cregs.push(register);
        Creg(self.cregs.len() - 1)
    }

    #[must_use]
    pub fn register(&self, creg: Creg) -> &ClassicalRegister {
        &self.cregs[creg.0]
    }

    pub fn registers(&self) -> impl Iterator<Item = &ClassicalRegister> {
        self.cregs.iter()
    }

    /// Flat index of bit `bit` of register `creg`.
    #[must_use]
    pub fn clbit(&self, creg: Creg, bit: usize) -> usize {
        let register = &self.cregs[creg.0];
        assert!(bit < register.size, "bit {bit} out of range for {}", register.name);
        register.offset + bit
    }

    fn check_qubit(&self, qubit: QubitId) {
        assert!(qubit < self.qubit_count, "qubit {qubit} out of range");
    }

    pub fn gate(&mut self, gate: Gate, qubits: &[QubitId]) {
        assert_eq!(gate.arity(), qubits.len(), "{gate} expects {} qubits", gate.arity());
        for &qubit in qubits {
            self.check_qubit(qubit);
        }
        self.instructions.push(Instruction::Gate {
            gate,
            qubits: SmallVec::from_slice(qubits),
        });
    }

    pub fn x(&mut self, qubit: QubitId) {
        self.gate(Gate::X, &[qubit]);
    }

    pub fn y(&mut self, qubit: QubitId) {
        self.gate(Gate::Y, &[qubit]);
    }

    pub fn z(&mut self, qubit: QubitId) {
        self.gate(Gate::Z, &[qubit]);
    }

    pub fn h(&mut self, qubit: QubitId) {
        self.gate(Gate::H, &[qubit]);
    }

    pub fn s(&mut self, qubit: QubitId) {
        self.gate(Gate::S, &[qubit]);
    }

    pub fn sdg(&mut self, qubit: QubitId) {
        self.gate(Gate::Sdg, &[qubit]);
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) {
        self.gate(Gate::Swap, &[a, b]);
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) {
        self.gate(Gate::Cx, &[control, target]);
    }

    pub fn cy(&mut self, control: QubitId, target: QubitId) {
        self.gate(Gate::Cy, &[control, target]);
    }

    pub fn cz(&mut self, control: QubitId, target: QubitId) {
        self.gate(Gate::Cz, &[control, target]);
    }

    pub fn ccx(&mut self, control1: QubitId, control2: QubitId, target: QubitId) {
        self.gate(Gate::Ccx, &[control1, control2, target]);
    }

    pub fn pauli(&mut self, pauli: PauliKind, qubit: QubitId) {
        if pauli != PauliKind::I {
            self.gate(pauli.gate(), &[qubit]);
        }
    }

    /// # Panics
    ///
    /// Panics on an empty or duplicated control list, on a control state
    /// wider than the control list, or when the target is also a control.
    pub fn controlled_pauli(
        &mut self,
        pauli: PauliKind,
        controls: &[QubitId],
        control_state: u32,
        target: QubitId,
    ) {
        assert!(!controls.is_empty(), "controlled Pauli needs at least one control");
        assert!(controls.len() < 32, "too many controls");
        assert!(
            u64::from(control_state) < (1 << controls.len()),
            "control state {control_state:#b} wider than {} controls",
            controls.len()
        );
        for (i, &control) in controls.iter().enumerate() {
            self.check_qubit(control);
            assert_ne!(control, target, "control {control} collides with target");
            assert!(!controls[..i].contains(&control), "duplicate control {control}");
        }
        self.check_qubit(target);
        self.instructions.push(Instruction::ControlledPauli {
            pauli,
            controls: SmallVec::from_slice(controls),
            control_state,
            target,
        });
    }

    pub fn conditional_pauli(&mut self, pauli: PauliKind, target: QubitId, register: Creg, value: u64) {
        self.check_qubit(target);
        assert!(register.0 < self.cregs.len(), "unknown classical register");
        self.instructions.push(Instruction::ConditionalPauli {
            pauli,
            target,
            register,
            value,
        });
    }

    pub fn measure(&mut self, qubit: QubitId, register: Creg, bit: usize) {
        self.check_qubit(qubit);
        let clbit = self.clbit(register, bit);
        self.instructions.push(Instruction::Measure { qubit, clbit });
    }

    pub fn reset(&mut self, qubit: QubitId) {
        self.check_qubit(qubit);
        self.instructions.push(Instruction::Reset { qubit });
    }

    pub fn delay(&mut self, duration: f64, unit: TimeUnit, qubit: QubitId) {
        self.check_qubit(qubit);
        self.instructions.push(Instruction::Delay { duration, unit, qubit });
    }

    pub fn barrier(&mut self, label: Option<&str>) {
        self.instructions.push(Instruction::Barrier {
            label: label.map(str::to_owned),
        });
    }

    /// Circuit depth counted over qubits and classical bits, with barriers
    /// synchronizing every wire.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut qubit_front = vec![0usize; self.qubit_count];
        let mut clbit_front = vec![0usize; self.clbit_count];
        for instruction in &self.instructions {
            match instruction {
                Instruction::Gate { qubits, .. } => {
                    let level = qubits.iter().map(|&q| qubit_front[q]).max().unwrap_or(0) + 1;
                    for &q in qubits {
                        qubit_front[q] = level;
                    }
                }
                Instruction::ControlledPauli { controls, target, .. } => {
                    let level = controls
                        .iter()
                        .chain(std::iter::once(target))
                        .map(|&q| qubit_front[q])
                        .max()
                        .unwrap_or(0)
                        + 1;
                    for &q in controls.iter().chain(std::iter::once(target)) {
                        qubit_front[q] = level;
                    }
                }
                Instruction::ConditionalPauli { target, register, .. } => {
                    let reg = &self.cregs[register.0];
                    let bits = reg.offset..reg.offset + reg.size;
                    let level = bits
                        .clone()
                        .map(|b| clbit_front[b])
                        .chain(std::iter::once(qubit_front[*target]))
                        .max()
                        .unwrap_or(0)
                        + 1;
                    qubit_front[*target] = level;
                    for b in bits {
                        clbit_front[b] = level;
                    }
                }
                Instruction::Measure { qubit, clbit } => {
                    let level = qubit_front[*qubit].max(clbit_front[*clbit]) + 1;
                    qubit_front[*qubit] = level;
                    clbit_front[*clbit] = level;
                }
                Instruction::Reset { qubit } | Instruction::Delay { qubit, .. } => {
                    qubit_front[*qubit] += 1;
                }
                Instruction::Barrier { .. } => {
                    let level = qubit_front.iter().copied().max().unwrap_or(0);
                    for front in &mut qubit_front {
                        *front = level;
                    }
                }
            }
        }
        qubit_front
            .iter()
            .chain(clbit_front.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}
