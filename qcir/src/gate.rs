use derive_more::{Display, FromStr};

/// Unitary gates the executor knows how to apply directly.
///
/// Multi-controlled Paulis and classically conditioned Paulis are not
/// gates; they are separate instruction variants.
#[derive(Clone, Copy, Debug, Display, FromStr, PartialEq, Eq, Hash)]
pub enum Gate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    Swap,
    Cx,
    Cy,
    Cz,
    Ccx,
}

impl Gate {
    /// Number of qubits the gate acts on.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Gate::I | Gate::X | Gate::Y | Gate::Z | Gate::H | Gate::S | Gate::Sdg => 1,
            Gate::Swap | Gate::Cx | Gate::Cy | Gate::Cz => 2,
            Gate::Ccx => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn arity_matches_qubit_usage() {
        assert_eq!(Gate::H.arity(), 1);
        assert_eq!(Gate::Cx.arity(), 2);
        assert_eq!(Gate::Ccx.arity(), 3);
    }

    #[test]
    fn display_round_trips() {
        for gate in [Gate::X, Gate::Sdg, Gate::Swap, Gate::Ccx] {
            assert_eq!(Gate::from_str(&gate.to_string()).unwrap(), gate);
        }
    }
}
