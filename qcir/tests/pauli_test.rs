use proptest::prelude::*;
use qcir::{PauliKind, PauliString};

fn pauli_strings() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('I'), Just('X'), Just('Y'), Just('Z')], 0..16)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn parse_and_display_round_trip(text in pauli_strings()) {
        let parsed: PauliString = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn weight_never_exceeds_length(text in pauli_strings()) {
        let parsed: PauliString = text.parse().unwrap();
        prop_assert!(parsed.weight() <= parsed.len());
    }

    #[test]
    fn support_skips_identities(text in pauli_strings()) {
        let parsed: PauliString = text.parse().unwrap();
        prop_assert!(parsed.support().all(|(_, p)| p != PauliKind::I));
    }
}
