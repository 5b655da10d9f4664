use std::collections::BTreeMap;

use qcir::PauliKind;

/// A single-qubit correction inside a code block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Correction {
    pub pauli: PauliKind,
    /// Data qubit index within the block.
    pub qubit: usize,
}

/// Maps ancilla syndrome patterns to corrections.
///
/// Bit `i` of a pattern is the value of syndrome ancilla `i`. An entry of
/// `None` records a pattern that needs no data correction; the trivial
/// pattern is always such an entry.
#[derive(Clone, Debug)]
pub struct SyndromeTable {
    width: usize,
    trivial: u32,
    entries: BTreeMap<u32, Option<Correction>>,
}

impl SyndromeTable {
    /// Builds and validates a table.
    ///
    /// # Panics
    ///
    /// Panics when a pattern repeats or exceeds the width, or when the
    /// trivial pattern is missing or carries a correction.
    #[must_use]
    pub fn new(
        width: usize,
        trivial: u32,
        entries: impl IntoIterator<Item = (u32, Option<Correction>)>,
    ) -> Self {
        let mut map = BTreeMap::new();
        for (pattern, correction) in entries {
            assert!(pattern < (1 << width), "pattern {pattern:#b} exceeds {width} syndrome bits");
            assert!(
                map.insert(pattern, correction).is_none(),
                "duplicate syndrome pattern {pattern:#b}"
            );
        }
        assert_eq!(
            map.get(&trivial),
            Some(&None),
            "trivial pattern {trivial:#b} must be present and carry no correction"
        );
        SyndromeTable {
            width,
            trivial,
            entries: map,
        }
    }

    /// Parses a pattern string where character `i` is syndrome bit `i`.
    ///
    /// # Panics
    ///
    /// Panics on characters other than `0` and `1`.
    #[must_use]
    pub fn pattern(text: &str) -> u32 {
        let mut value = 0u32;
        for (i, c) in text.chars().enumerate() {
            match c {
                '0' => {}
                '1' => value |= 1 << i,
                _ => panic!("syndrome patterns are written with 0 and 1"),
            }
        }
        value
    }

    /// Table from `(pattern string, pauli, block qubit)` rows plus an
    /// all-zero trivial entry.
    #[must_use]
    pub fn from_rows(width: usize, rows: &[(&str, PauliKind, usize)]) -> Self {
        let entries = std::iter::once((0, None)).chain(rows.iter().map(|&(text, pauli, qubit)| {
            assert_eq!(text.len(), width);
            (Self::pattern(text), Some(Correction { pauli, qubit }))
        }));
        SyndromeTable::new(width, 0, entries)
    }

    /// CSS-style table: check `i` flips syndrome bit `i`, and every data
    /// qubit's check membership gives its pattern. All corrections share
    /// one Pauli kind.
    #[must_use]
    pub fn from_css_checks(checks: &[&[usize]], block_size: usize, pauli: PauliKind) -> Self {
        let width = checks.len();
        let entries = std::iter::once((0, None)).chain((0..block_size).map(|qubit| {
            let pattern = checks
                .iter()
                .enumerate()
                .filter(|(_, check)| check.contains(&qubit))
                .fold(0u32, |acc, (i, _)| acc | 1 << i);
            assert_ne!(pattern, 0, "qubit {qubit} is covered by no check");
            (pattern, Some(Correction { pauli, qubit }))
        }));
        SyndromeTable::new(width, 0, entries)
    }

    /// Table derived from a binary check matrix over `2 * block` columns,
    /// X-part first. Column `c` keys a Z correction by its X-part rows, an
    /// X correction by its Z-part rows, and a Y correction by their sum.
    ///
    /// Degenerate columns produce the same pattern; the last column wins,
    /// which corrects up to a stabilizer.
    #[must_use]
    pub fn from_check_matrix(matrix: &[Vec<u8>], block_size: usize) -> Self {
        let width = matrix.len();
        for row in matrix {
            assert_eq!(row.len(), 2 * block_size, "check matrix rows hold X and Z parts");
        }
        let column = |offset: usize, qubit: usize| {
            matrix
                .iter()
                .enumerate()
                .filter(|(_, row)| row[offset + qubit] == 1)
                .fold(0u32, |acc, (i, _)| acc | 1 << i)
        };
        let mut entries: BTreeMap<u32, Option<Correction>> = BTreeMap::new();
        entries.insert(0, None);
        for qubit in 0..block_size {
            let x_part = column(0, qubit);
            let z_part = column(block_size, qubit);
            for (pattern, pauli) in [
                (x_part, PauliKind::Z),
                (z_part, PauliKind::X),
                (x_part ^ z_part, PauliKind::Y),
            ] {
                assert_ne!(pattern, 0, "check matrix column {qubit} cannot signal an error");
                entries.insert(pattern, Some(Correction { pauli, qubit }));
            }
        }
        SyndromeTable {
            width,
            trivial: 0,
            entries,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn trivial(&self) -> u32 {
        self.trivial
    }

    #[must_use]
    pub fn lookup(&self, pattern: u32) -> Option<Correction> {
        self.entries.get(&pattern).copied().flatten()
    }

    /// Patterns that trigger a correction, in ascending pattern order.
    pub fn corrections(&self) -> impl Iterator<Item = (u32, Correction)> + '_ {
        self.entries
            .iter()
            .filter_map(|(&pattern, correction)| correction.map(|c| (pattern, c)))
    }

    /// Asserts the single-error family is a bijection: every `(qubit,
    /// pauli)` pair over the block appears exactly once.
    ///
    /// # Panics
    ///
    /// Panics when a pair is missing or duplicated.
    pub fn assert_single_error_bijection(&self, block_size: usize, paulis: &[PauliKind]) {
        let mut seen = BTreeMap::new();
        for (pattern, correction) in self.corrections() {
            assert!(
                seen.insert((correction.qubit, correction.pauli), pattern).is_none(),
                "correction {:?} on qubit {} appears twice",
                correction.pauli,
                correction.qubit
            );
        }
        for qubit in 0..block_size {
            for &pauli in paulis {
                assert!(
                    seen.contains_key(&(qubit, pauli)),
                    "no syndrome corrects {pauli:?} on qubit {qubit}"
                );
            }
        }
        assert_eq!(seen.len(), block_size * paulis.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PauliKind::{X, Y, Z};

    #[test]
    fn pattern_strings_read_bit_i_at_char_i() {
        assert_eq!(SyndromeTable::pattern("0001"), 0b1000);
        assert_eq!(SyndromeTable::pattern("10"), 0b01);
    }

    #[test]
    fn rows_build_a_valid_table() {
        let table = SyndromeTable::from_rows(2, &[("10", X, 0), ("11", X, 1), ("01", X, 2)]);
        table.assert_single_error_bijection(3, &[X]);
        assert_eq!(table.lookup(0b01), Some(Correction { pauli: X, qubit: 0 }));
        assert_eq!(table.lookup(0), None);
    }

    #[test]
    #[should_panic(expected = "duplicate syndrome pattern")]
    fn repeated_patterns_panic() {
        let _ = SyndromeTable::from_rows(2, &[("10", X, 0), ("10", Z, 1)]);
    }

    #[test]
    #[should_panic(expected = "no syndrome corrects")]
    fn bijection_requires_full_coverage() {
        let table = SyndromeTable::from_rows(2, &[("10", X, 0)]);
        table.assert_single_error_bijection(2, &[X]);
    }

    #[test]
    fn css_checks_key_each_qubit_by_membership() {
        // The [[7,1,3]] parity checks.
        let table = SyndromeTable::from_css_checks(
            &[&[0, 2, 4, 6], &[1, 2, 5, 6], &[3, 4, 5, 6]],
            7,
            X,
        );
        table.assert_single_error_bijection(7, &[X]);
        for qubit in 0..7 {
            let pattern = (qubit + 1) as u32;
            assert_eq!(table.lookup(pattern), Some(Correction { pauli: X, qubit }));
        }
    }

    #[test]
    fn check_matrix_tables_cover_all_three_paulis() {
        // Two-qubit toy matrix with one single-entry check per column.
        let matrix = vec![
            vec![1, 0, 0, 0],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 1],
        ];
        let table = SyndromeTable::from_check_matrix(&matrix, 2);
        assert_eq!(table.lookup(0b0001), Some(Correction { pauli: Z, qubit: 0 }));
        assert_eq!(table.lookup(0b0010), Some(Correction { pauli: X, qubit: 0 }));
        assert_eq!(table.lookup(0b0011), Some(Correction { pauli: Y, qubit: 0 }));
        assert_eq!(table.lookup(0b1100), Some(Correction { pauli: Y, qubit: 1 }));
        table.assert_single_error_bijection(2, &[X, Y, Z]);
    }
}
