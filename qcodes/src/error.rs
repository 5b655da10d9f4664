use thiserror::Error;

/// Errors reported for invalid caller input or sequencing.
///
/// Malformed internal tables are programming errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("logical qubit {index} out of range for {count} logical qubits")]
    LogicalIndexOutOfRange { index: usize, count: usize },

    #[error("physical qubit {index} out of range for {count} physical qubits")]
    PhysicalIndexOutOfRange { index: usize, count: usize },

    #[error("operator acts on {got} qubits but the code block holds {expected}")]
    OperatorLengthMismatch { expected: usize, got: usize },

    #[error("{count} initial states given for {expected} logical qubits")]
    InitialStateLengthMismatch { expected: usize, count: usize },

    #[error("logical {gate} is not defined for the {code} code")]
    UnsupportedGate { code: &'static str, gate: &'static str },

    #[error("the {code} code does not support {strategy} correction")]
    UnsupportedCorrection { code: &'static str, strategy: &'static str },

    #[error("operation requires an encoded circuit")]
    NotEncoded,

    #[error("circuit has been decoded; no further encoded operations are possible")]
    AlreadyDecoded,

    #[error("syndrome has not been extracted onto the ancillas")]
    SyndromeNotExtracted,

    #[error("syndrome has not been measured into its classical register")]
    SyndromeNotMeasured,
}
