use std::fmt;
use std::str::FromStr;

/// Where a code circuit stands in its encode/correct/measure lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingState {
    NotEncoded,
    Encoded,
    /// Gates were applied to the bare representative qubits before the
    /// encoder ran (Steane and Shor allow this).
    GatesAppliedBeforeEncoding,
    /// The block has been decoded back onto its representative qubit.
    Decoded,
}

/// Initial state prepared on a block's representative qubit before encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialState {
    #[default]
    Zero,
    One,
    Plus,
    Minus,
}

/// Error returned when an initial-state string holds an unknown character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("initial states are written with the characters 0, 1, + and -")]
pub struct InitialStateParseError;

impl InitialState {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(InitialState::Zero),
            '1' => Some(InitialState::One),
            '+' => Some(InitialState::Plus),
            '-' => Some(InitialState::Minus),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            InitialState::Zero => '0',
            InitialState::One => '1',
            InitialState::Plus => '+',
            InitialState::Minus => '-',
        }
    }
}

impl fmt::Display for InitialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Per-logical-qubit initial states plus the re-encode override.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    pub initial_states: Vec<InitialState>,
    pub force: bool,
}

impl EncodeOptions {
    /// All-zeros initial states.
    #[must_use]
    pub fn zeros(logical_count: usize) -> Self {
        EncodeOptions {
            initial_states: vec![InitialState::Zero; logical_count],
            force: false,
        }
    }

    /// One state per logical qubit, e.g. `"0+1"`.
    pub fn states(text: &str) -> Result<Self, InitialStateParseError> {
        let initial_states = text
            .chars()
            .map(|c| InitialState::from_char(c).ok_or(InitialStateParseError))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodeOptions {
            initial_states,
            force: false,
        })
    }

    #[must_use]
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Measurement basis for the final readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeasureBasis {
    #[default]
    Z,
    X,
    /// Every physical qubit of the block, ancillas included where present.
    All,
}

impl FromStr for MeasureBasis {
    type Err = MeasureBasisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Z" | "z" => Ok(MeasureBasis::Z),
            "X" | "x" => Ok(MeasureBasis::X),
            "all" | "All" => Ok(MeasureBasis::All),
            _ => Err(MeasureBasisParseError),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("measurement bases are Z, X or all")]
pub struct MeasureBasisParseError;

/// How syndrome information is turned into corrections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorrectionStrategy {
    /// Multi-controlled Paulis keyed on the ancilla state.
    #[default]
    Coherent,
    /// Measure the ancillas, then apply classically conditioned Paulis.
    Measured,
}

impl CorrectionStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CorrectionStrategy::Coherent => "coherent",
            CorrectionStrategy::Measured => "measured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_strings_parse_per_qubit() {
        let options = EncodeOptions::states("0+1-").unwrap();
        assert_eq!(options.initial_states.len(), 4);
        assert_eq!(options.initial_states[1], InitialState::Plus);
        assert!(!options.force);
    }

    #[test]
    fn bad_initial_state_characters_are_rejected() {
        assert!(EncodeOptions::states("0q").is_err());
    }

    #[test]
    fn basis_parses_both_cases() {
        assert_eq!("x".parse::<MeasureBasis>().unwrap(), MeasureBasis::X);
        assert_eq!("all".parse::<MeasureBasis>().unwrap(), MeasureBasis::All);
        assert!("y".parse::<MeasureBasis>().is_err());
    }
}
