//! Running encoded circuits: backend abstraction, transpilation search
//! and a persistent experiment ledger.

pub mod backend;
pub mod ledger;
pub mod transpile;

pub use backend::{Backend, JobStatus, SimulatorBackend, Transpiled};
pub use ledger::{Ledger, Record, RecordMetadata};
pub use transpile::search_transpilation;

use thiserror::Error;

/// Failures while transpiling, running or recording jobs.
#[derive(Debug, Error)]
pub enum RunError {
    /// Every transpilation attempt either failed or missed the required
    /// layout.
    #[error("no usable transpilation found in {attempts} attempts")]
    NoTranspilationFound { attempts: usize },
    /// The circuit does not fit on the backend.
    #[error("circuit needs {needed} qubits but backend `{backend}` supports {capacity}")]
    TooManyQubits { backend: String, needed: usize, capacity: usize },
    #[error("ledger file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}
