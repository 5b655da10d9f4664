//! Full pipeline: encode a logical qubit, run it through a backend, and
//! compare the extracted distribution against its expectation.

use qcir::PauliKind;
use qcodes::{CorrectionStrategy, EncodeOptions, EncodedCircuit, MeasureBasis, Steane};
use qrun::{search_transpilation, Backend, JobStatus, Ledger, Record, RecordMetadata, SimulatorBackend};
use qstat::{confidence_epsilon, extract, total_variation_distance, Normalization};

const SHOTS: u64 = 256;

#[test]
fn corrected_steane_run_matches_its_expected_distribution() {
    let mut code = Steane::new(1);
    code.encode(&EncodeOptions::states("1").unwrap()).unwrap();
    code.apply_error(PauliKind::X, 4).unwrap();
    code.correct(CorrectionStrategy::Coherent).unwrap();
    code.measure_all(MeasureBasis::Z).unwrap();

    let mut backend = SimulatorBackend::seeded(5);
    let transpiled = search_transpilation(&mut backend, code.physical_circuit(), 10, None).unwrap();
    let raw = backend.run(&transpiled, SHOTS, 17).unwrap();

    let distributions = extract(&raw, Normalization::Probability, false).unwrap();
    let measured = &distributions["q0_state_meas"];
    let expected = qstat::Distribution::from([("0".to_owned(), 0.0), ("1".to_owned(), 1.0)]);

    let epsilon = confidence_epsilon(1, SHOTS, 0.05);
    let tvd = total_variation_distance(measured, &expected, false);
    assert!(tvd < epsilon, "tvd {tvd} exceeds tolerance {epsilon}");
}

#[test]
fn experiment_run_is_recorded_in_the_ledger() {
    let mut code = Steane::new(1);
    code.encode(&EncodeOptions::zeros(1)).unwrap();
    code.measure_all(MeasureBasis::Z).unwrap();

    let mut backend = SimulatorBackend::seeded(8);
    let transpiled = search_transpilation(&mut backend, code.physical_circuit(), 5, None).unwrap();
    let raw = backend.run(&transpiled, SHOTS, 23).unwrap();
    let distributions = extract(&raw, Normalization::Probability, false).unwrap();

    let path = std::env::temp_dir().join(format!("qrun-experiment-{}.json", std::process::id()));
    let mut ledger = Ledger::open(&path).unwrap();
    ledger
        .append(
            "steane-baseline",
            Record {
                job_id: "local-0".to_owned(),
                status: JobStatus::Done,
                metadata: RecordMetadata {
                    expected_distribution: distributions["q0_state_meas"].clone(),
                    initial_layout: transpiled.initial_layout.clone(),
                    duration_estimate: 0.0,
                    encoder: "steane".to_owned(),
                },
            },
        )
        .unwrap();

    let done = ledger.results_for("steane-baseline");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].metadata.encoder, "steane");
    assert_eq!(done[0].metadata.expected_distribution["0"], 1.0);
    std::fs::remove_file(&path).unwrap();
}
