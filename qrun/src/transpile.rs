//! Layout search over repeated transpilation attempts.

use qcir::Circuit;
use tracing::warn;

use crate::backend::{Backend, Transpiled};
use crate::RunError;

/// Transpiles `circuit` up to `iterations` times and keeps the
/// shallowest result.
///
/// With `required_layout` set, attempts whose leading virtual qubits do
/// not land on those physical qubits are discarded. Failed attempts are
/// logged and skipped rather than aborting the search; only a search
/// where every attempt failed or was discarded returns
/// [`RunError::NoTranspilationFound`].
pub fn search_transpilation(
    backend: &mut dyn Backend,
    circuit: &Circuit,
    iterations: usize,
    required_layout: Option<&[usize]>,
) -> Result<Transpiled, RunError> {
    let mut best: Option<Transpiled> = None;
    for attempt in 0..iterations {
        let transpiled = match backend.transpile(circuit) {
            Ok(transpiled) => transpiled,
            Err(error) => {
                warn!(backend = backend.name(), attempt, %error, "transpilation attempt failed");
                continue;
            }
        };
        if let Some(required) = required_layout {
            if !transpiled.matches_layout(required) {
                continue;
            }
        }
        if best.as_ref().map_or(true, |b| transpiled.depth < b.depth) {
            best = Some(transpiled);
        }
    }
    best.ok_or(RunError::NoTranspilationFound { attempts: iterations })
}

#[cfg(test)]
mod tests {
    use qcir::{Executor, RawResult};

    use super::*;

    /// Backend whose layouts and depths are scripted per attempt.
    struct ScriptedBackend {
        attempts: Vec<Result<(Vec<usize>, usize), RunError>>,
        next: usize,
    }

    impl Backend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn transpile(&mut self, circuit: &Circuit) -> Result<Transpiled, RunError> {
            let scripted = self.attempts[self.next % self.attempts.len()].as_ref();
            self.next += 1;
            match scripted {
                Ok((layout, depth)) => Ok(Transpiled {
                    circuit: circuit.clone(),
                    initial_layout: layout.clone(),
                    depth: *depth,
                }),
                Err(_) => Err(RunError::NoTranspilationFound { attempts: 0 }),
            }
        }

        fn run(&mut self, transpiled: &Transpiled, shots: u64, seed: u64) -> Result<RawResult, RunError> {
            Ok(Executor::seeded(seed).sample(&transpiled.circuit, shots))
        }
    }

    #[test]
    fn search_keeps_the_shallowest_matching_layout() {
        let mut backend = ScriptedBackend {
            attempts: vec![
                Ok((vec![0, 1, 2], 9)),
                Ok((vec![2, 1, 0], 3)),
                Ok((vec![0, 1, 2], 5)),
            ],
            next: 0,
        };
        let circuit = Circuit::new(3);
        let found = search_transpilation(&mut backend, &circuit, 3, Some(&[0, 1])).unwrap();
        assert_eq!(found.depth, 5);
        assert_eq!(found.initial_layout, [0, 1, 2]);
    }

    #[test]
    fn search_skips_failed_attempts() {
        let mut backend = ScriptedBackend {
            attempts: vec![
                Err(RunError::NoTranspilationFound { attempts: 0 }),
                Ok((vec![1, 0], 4)),
            ],
            next: 0,
        };
        let found = search_transpilation(&mut backend, &Circuit::new(2), 4, None).unwrap();
        assert_eq!(found.depth, 4);
    }

    #[test]
    fn search_reports_when_no_attempt_matches() {
        let mut backend = ScriptedBackend { attempts: vec![Ok((vec![1, 0], 2))], next: 0 };
        let err = search_transpilation(&mut backend, &Circuit::new(2), 5, Some(&[0])).unwrap_err();
        assert!(matches!(err, RunError::NoTranspilationFound { attempts: 5 }));
    }
}
