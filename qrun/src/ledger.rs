//! JSON file ledger of submitted experiment jobs.
//!
//! Experiments accumulate job records across sessions, so the ledger is
//! persisted after every mutation and reloaded on open.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use qstat::Distribution;
use serde::{Deserialize, Serialize};

use crate::backend::JobStatus;
use crate::RunError;

/// Everything needed to interpret a job's results later.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RecordMetadata {
    pub expected_distribution: Distribution,
    pub initial_layout: Vec<usize>,
    pub duration_estimate: f64,
    pub encoder: String,
}

/// One submitted job of an experiment.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    pub job_id: String,
    pub status: JobStatus,
    pub metadata: RecordMetadata,
}

/// File-backed map from experiment name to its job records.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    experiments: BTreeMap<String, Vec<Record>>,
}

impl Ledger {
    /// Opens the ledger at `path`, starting empty when the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        let experiments = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, experiments })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds `record` to `experiment` and persists the ledger.
    ///
    /// A record whose `job_id` is already present replaces the stored one
    /// instead of duplicating it, so re-appending after a status change is
    /// the way to update a job.
    pub fn append(&mut self, experiment: &str, record: Record) -> Result<(), RunError> {
        let records = self.experiments.entry(experiment.to_owned()).or_default();
        match records.iter_mut().find(|existing| existing.job_id == record.job_id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save()
    }

    /// All records of `experiment`, in insertion order.
    #[must_use]
    pub fn records_for(&self, experiment: &str) -> &[Record] {
        self.experiments.get(experiment).map_or(&[], Vec::as_slice)
    }

    /// The completed records of `experiment`.
    #[must_use]
    pub fn results_for(&self, experiment: &str) -> Vec<&Record> {
        self.records_for(experiment)
            .iter()
            .filter(|record| record.status == JobStatus::Done)
            .collect()
    }

    fn save(&self) -> Result<(), RunError> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.experiments)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qrun-ledger-{tag}-{}.json", std::process::id()))
    }

    fn record(job_id: &str, status: JobStatus) -> Record {
        Record {
            job_id: job_id.to_owned(),
            status,
            metadata: RecordMetadata {
                expected_distribution: Distribution::from([("0".to_owned(), 1.0)]),
                initial_layout: vec![0, 1, 2],
                duration_estimate: 1.5,
                encoder: "steane".to_owned(),
            },
        }
    }

    #[test]
    fn append_persists_across_reopen() {
        let path = scratch_path("reopen");
        {
            let mut ledger = Ledger::open(&path).unwrap();
            ledger.append("t1-sweep", record("job-1", JobStatus::Done)).unwrap();
        }
        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.records_for("t1-sweep").len(), 1);
        assert_eq!(ledger.records_for("t1-sweep")[0].job_id, "job-1");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn append_replaces_a_known_job_id() {
        let path = scratch_path("dedup");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger.append("sweep", record("job-1", JobStatus::Queued)).unwrap();
        ledger.append("sweep", record("job-1", JobStatus::Done)).unwrap();
        assert_eq!(ledger.records_for("sweep").len(), 1);
        assert_eq!(ledger.records_for("sweep")[0].status, JobStatus::Done);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn results_keep_only_completed_jobs() {
        let path = scratch_path("done");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger.append("sweep", record("job-1", JobStatus::Done)).unwrap();
        ledger.append("sweep", record("job-2", JobStatus::Error)).unwrap();
        ledger.append("sweep", record("job-3", JobStatus::Running)).unwrap();
        let done = ledger.results_for("sweep");
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].job_id, "job-1");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_experiment_reads_as_empty() {
        let path = scratch_path("unknown");
        let ledger = Ledger::open(&path).unwrap();
        assert!(ledger.records_for("nothing").is_empty());
    }
}
