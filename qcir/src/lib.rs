//! Circuit model for encoded-qubit experiments.
//!
//! A [`Circuit`] is a list of [`Instruction`]s over a growable set of
//! qubits and named classical registers. Circuits are executed by an
//! [`Executor`], which evolves a dense [`StateVector`] and samples
//! per-register measurement counts.

pub mod circuit;
pub mod executor;
pub mod gate;
pub mod pauli;
pub mod statevector;

pub use circuit::{ClassicalRegister, Circuit, Creg, Instruction, QubitId, TimeUnit};
pub use executor::{Executor, RawResult, RegisterCounts};
pub use gate::Gate;
pub use pauli::{PauliKind, PauliParseError, PauliString};
pub use statevector::StateVector;
