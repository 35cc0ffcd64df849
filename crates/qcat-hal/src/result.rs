//! Execution results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::job::JobId;
use crate::provider::Provider;

/// Measurement counts keyed by bitstring.
///
/// Keys put the lowest-indexed bit leftmost on every provider. Keys are
/// kept sorted so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero if never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum over all outcomes.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Outcome seen most often; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (k, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((k.as_str(), v)),
            })
    }

    /// Relative frequency of each outcome.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }

    /// Iterate outcomes in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Copy with every key reversed, for converting from a
    /// highest-bit-leftmost convention.
    #[must_use]
    pub fn reversed_keys(&self) -> Self {
        let mut out = Counts::new();
        for (k, &v) in &self.counts {
            out.insert(k.chars().rev().collect::<String>(), v);
        }
        out
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

/// What an execution produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ExecutionOutput {
    /// Sampled outcomes.
    Counts(Counts),
    /// Final amplitudes, indexed in the backend's own qubit order.
    Statevector(Vec<Complex64>),
}

/// Result of one `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Counts or amplitudes.
    pub output: ExecutionOutput,
    /// Shots taken; zero for statevector runs.
    pub shots: u32,
    /// Provider that executed the circuit.
    pub provider: Provider,
    /// Simulator or device name.
    pub backend_name: String,
    /// Remote job id, if the run was remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// Result holding sampled counts.
    pub fn counts(
        provider: Provider,
        backend_name: impl Into<String>,
        counts: Counts,
        shots: u32,
    ) -> Self {
        Self::new(provider, backend_name, ExecutionOutput::Counts(counts), shots)
    }

    /// Result holding a statevector.
    pub fn statevector(
        provider: Provider,
        backend_name: impl Into<String>,
        amplitudes: Vec<Complex64>,
    ) -> Self {
        Self::new(
            provider,
            backend_name,
            ExecutionOutput::Statevector(amplitudes),
            0,
        )
    }

    fn new(
        provider: Provider,
        backend_name: impl Into<String>,
        output: ExecutionOutput,
        shots: u32,
    ) -> Self {
        Self {
            output,
            shots,
            provider,
            backend_name: backend_name.into(),
            job_id: None,
            execution_time_ms: None,
            completed_at: Utc::now(),
        }
    }

    /// Record the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Record the remote job id.
    #[must_use]
    pub fn with_job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Counts, if this was a sampling run.
    pub fn as_counts(&self) -> Option<&Counts> {
        match &self.output {
            ExecutionOutput::Counts(c) => Some(c),
            ExecutionOutput::Statevector(_) => None,
        }
    }

    /// Amplitudes, if this was a statevector run.
    pub fn as_statevector(&self) -> Option<&[Complex64]> {
        match &self.output {
            ExecutionOutput::Statevector(v) => Some(v),
            ExecutionOutput::Counts(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);

        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 10);
        assert_eq!(counts.most_frequent(), Some(("00", 5)));
    }

    #[test]
    fn test_probabilities() {
        let counts: Counts = [("0".to_string(), 1), ("1".to_string(), 3)]
            .into_iter()
            .collect();
        let probs = counts.probabilities();
        assert!((probs["0"] - 0.25).abs() < 1e-12);
        assert!((probs["1"] - 0.75).abs() < 1e-12);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_reversed_keys() {
        let mut counts = Counts::new();
        counts.insert("001", 7);
        counts.insert("100", 1);
        let reversed = counts.reversed_keys();
        assert_eq!(reversed.get("100"), 7);
        assert_eq!(reversed.get("001"), 1);
    }

    #[test]
    fn test_result_accessors() {
        let result = ExecutionResult::statevector(
            Provider::Google,
            "simulator",
            vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        )
        .with_execution_time(4);

        assert_eq!(result.shots, 0);
        assert!(result.as_counts().is_none());
        assert_eq!(result.as_statevector().map(<[_]>::len), Some(2));
        assert_eq!(result.execution_time_ms, Some(4));
    }
}
