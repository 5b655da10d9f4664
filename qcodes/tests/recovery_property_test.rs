use proptest::prelude::*;
use qcir::{Executor, PauliKind};
use qcodes::{
    CorrectionStrategy, EncodeOptions, EncodedCircuit, FiveQubitPerfect, MeasureBasis, ThreeQubit,
    ThreeQubitKind,
};

const SHOTS: u64 = 8;

fn paulis() -> impl Strategy<Value = PauliKind> {
    prop_oneof![Just(PauliKind::X), Just(PauliKind::Y), Just(PauliKind::Z)]
}

/// Samples the physical circuit and returns the single deterministic
/// outcome of `register`.
fn sole_outcome(code: &dyn EncodedCircuit, register: &str) -> String {
    let result = Executor::seeded(11).sample(code.physical_circuit(), SHOTS);
    let counts = &result
        .register(register)
        .unwrap_or_else(|| panic!("register {register} missing"))
        .counts;
    assert_eq!(counts.len(), 1, "outcome should be deterministic, got {counts:?}");
    counts.keys().next().expect("one outcome").clone()
}

proptest! {
    #[test]
    fn bit_flip_code_recovers_any_x_error_on_any_basis_state(one in any::<bool>(), qubit in 0usize..3) {
        let state = if one { "1" } else { "0" };
        let mut code = ThreeQubit::new(1, ThreeQubitKind::BitFlip);
        code.encode(&EncodeOptions::states(state).unwrap()).unwrap();
        code.apply_error(PauliKind::X, qubit).unwrap();
        code.spot_syndrome().unwrap();
        code.correct(CorrectionStrategy::Coherent).unwrap();
        code.decode().unwrap();
        code.measure(MeasureBasis::Z).unwrap();
        prop_assert_eq!(sole_outcome(&code, "q0_state_meas"), state);
    }

    #[test]
    fn perfect_code_recovers_any_single_pauli_on_any_basis_state(
        one in any::<bool>(),
        qubit in 0usize..5,
        pauli in paulis(),
    ) {
        let state = if one { "1" } else { "0" };
        let mut code = FiveQubitPerfect::new(1);
        code.encode(&EncodeOptions::states(state).unwrap()).unwrap();
        code.apply_error(pauli, qubit).unwrap();
        code.decode().unwrap();
        code.correct(CorrectionStrategy::Coherent).unwrap();
        code.measure(MeasureBasis::Z).unwrap();
        prop_assert_eq!(sole_outcome(&code, "q0_state_meas"), state);
    }
}
