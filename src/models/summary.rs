use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::RunError;
use crate::models::outcome::RequestOutcome;

/// Every outcome of a run, indexed by request number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCollection {
    outcomes: Vec<RequestOutcome>,
}

impl ResultCollection {
    /// Fails if any slot was never filled by a worker.
    pub fn from_slots(slots: Vec<Option<RequestOutcome>>) -> Result<Self, RunError> {
        let outcomes = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(RunError::MissingOutcome { index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { outcomes })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RequestOutcome> {
        self.outcomes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestOutcome> {
        self.outcomes.iter()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Count per status code or failure kind.
    pub fn breakdown(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_requests: usize,
    pub success: usize,
    pub failed: usize,
    pub elapsed: Duration,

    pub concurrency: usize,
    pub peak_in_flight: usize,
    pub started_at: DateTime<Local>,

    pub status_counts: BTreeMap<String, u64>,
}

impl RunSummary {
    pub fn new(
        results: &ResultCollection,
        elapsed: Duration,
        concurrency: usize,
        peak_in_flight: usize,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            total_requests: results.len(),
            success: results.success_count(),
            failed: results.failure_count(),
            elapsed,
            concurrency,
            peak_in_flight,
            started_at,
            status_counts: results.breakdown(),
        }
    }

    /// The two report lines, in order.
    pub fn lines(&self) -> [String; 2] {
        [
            format!("Success {}/{}", self.success, self.total_requests),
            format!("Time: {:.2}s", self.elapsed.as_secs_f64()),
        ]
    }
}
