use std::fmt;
use std::str::FromStr;

use crate::gate::Gate;

/// A single-qubit Pauli operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PauliKind {
    I,
    X,
    Y,
    Z,
}

impl PauliKind {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PauliKind::I),
            'X' => Some(PauliKind::X),
            'Y' => Some(PauliKind::Y),
            'Z' => Some(PauliKind::Z),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            PauliKind::I => 'I',
            PauliKind::X => 'X',
            PauliKind::Y => 'Y',
            PauliKind::Z => 'Z',
        }
    }

    /// The corresponding single-qubit gate.
    #[must_use]
    pub fn gate(self) -> Gate {
        match self {
            PauliKind::I => Gate::I,
            PauliKind::X => Gate::X,
            PauliKind::Y => Gate::Y,
            PauliKind::Z => Gate::Z,
        }
    }
}

impl fmt::Display for PauliKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Error returned when a Pauli string contains a non-Pauli character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Pauli strings may only contain the characters I, X, Y and Z")]
pub struct PauliParseError;

/// An ordered product of single-qubit Paulis, one per qubit.
///
/// Character `i` of the textual form acts on qubit `i`:
///
/// ```
/// use qcir::{PauliKind, PauliString};
///
/// let p: PauliString = "XIZ".parse().unwrap();
/// assert_eq!(p.len(), 3);
/// assert_eq!(p.term(1), PauliKind::I);
/// assert_eq!(p.support().collect::<Vec<_>>(), vec![(0, PauliKind::X), (2, PauliKind::Z)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PauliString {
    terms: Vec<PauliKind>,
}

impl PauliString {
    #[must_use]
    pub fn new(terms: Vec<PauliKind>) -> Self {
        PauliString { terms }
    }

    #[must_use]
    pub fn identity(length: usize) -> Self {
        PauliString {
            terms: vec![PauliKind::I; length],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn term(&self, index: usize) -> PauliKind {
        self.terms[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = PauliKind> + '_ {
        self.terms.iter().copied()
    }

    /// Non-identity terms with their qubit indices.
    pub fn support(&self) -> impl Iterator<Item = (usize, PauliKind)> + '_ {
        self.terms
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p != PauliKind::I)
    }

    /// Number of non-identity terms.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.support().count()
    }
}

impl FromStr for PauliString {
    type Err = PauliParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let terms = s
            .chars()
            .map(|c| PauliKind::from_char(c).ok_or(PauliParseError))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PauliString { terms })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_non_pauli_characters() {
        assert_eq!("XQZ".parse::<PauliString>(), Err(PauliParseError));
    }

    #[test]
    fn parse_accepts_lowercase() {
        let p: PauliString = "xyzi".parse().unwrap();
        assert_eq!(p.to_string(), "XYZI");
    }

    #[test]
    fn weight_counts_non_identity_terms() {
        let p: PauliString = "IXIYZ".parse().unwrap();
        assert_eq!(p.weight(), 3);
        assert_eq!(PauliString::identity(4).weight(), 0);
    }
}
