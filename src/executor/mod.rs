use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::{build_client, send_get};
use crate::error::{ConfigError, RunError};
use crate::models::outcome::RequestOutcome;
use crate::models::run_config::RunConfig;
use crate::models::summary::{ResultCollection, RunSummary};

/// Hands out request indices `0..total`, each exactly once.
struct WorkQueue {
    next: AtomicUsize,
    total: usize,
}

impl WorkQueue {
    fn new(total: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            total,
        }
    }

    fn take(&self) -> Option<usize> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        (index < self.total).then_some(index)
    }
}

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(self)
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a InFlight);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

type WorkerResults = Vec<(usize, RequestOutcome)>;

/// One empty slot per request, or an error if that many cannot be held.
fn allocate_slots(total: usize) -> Result<Vec<Option<RequestOutcome>>, ConfigError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(total)
        .map_err(|_| ConfigError::TooManyRequests(total))?;
    slots.resize(total, None);
    Ok(slots)
}

/// Joins every worker into `slots`. The first panic aborts the workers still
/// running.
async fn join_workers(
    mut workers: JoinSet<WorkerResults>,
    slots: &mut [Option<RequestOutcome>],
) -> Result<(), RunError> {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(finished) => {
                for (index, outcome) in finished {
                    slots[index] = Some(outcome);
                }
            }
            Err(err) => {
                workers.abort_all();
                return Err(RunError::WorkerPanicked(err));
            }
        }
    }
    Ok(())
}

/// Runs `config.total_requests` GETs with at most `config.concurrency` in
/// flight and waits for every one of them before summarising.
///
/// Per-request failures end up in the summary; only configuration problems
/// (reported before anything is sent) and a panicking worker return `Err`.
pub async fn run_load_test(config: &RunConfig) -> Result<RunSummary, RunError> {
    let uri = config.validate()?;
    let mut slots = allocate_slots(config.total_requests)?;

    let client = Arc::new(build_client());
    let queue = Arc::new(WorkQueue::new(config.total_requests));
    let in_flight = Arc::new(InFlight::default());
    let limit = config.timeout;

    let worker_count = config.concurrency.min(config.total_requests);

    info!(
        target_url = %uri,
        total_requests = config.total_requests,
        workers = worker_count,
        timeout_ms = limit.as_millis() as u64,
        "starting load run"
    );

    let started_at = Local::now();
    let start = Instant::now();
    let mut workers = JoinSet::new();

    for worker_id in 0..worker_count {
        let client = Arc::clone(&client);
        let queue = Arc::clone(&queue);
        let in_flight = Arc::clone(&in_flight);
        let uri = uri.clone();

        workers.spawn(async move {
            let mut finished = Vec::new();

            while let Some(index) = queue.take() {
                let request_start = Instant::now();
                let outcome = {
                    let _slot = in_flight.enter();
                    send_get(&client, &uri, limit).await
                };

                debug!(
                    worker_id,
                    index,
                    outcome = %outcome,
                    duration_ms = request_start.elapsed().as_millis() as u64,
                    "request finished"
                );

                finished.push((index, outcome));
            }

            finished
        });
    }

    join_workers(workers, &mut slots).await?;

    let elapsed = start.elapsed();
    let results = ResultCollection::from_slots(slots)?;
    let summary = RunSummary::new(
        &results,
        elapsed,
        config.concurrency,
        in_flight.peak(),
        started_at,
    );

    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            total_requests = summary.total_requests,
            "some requests did not complete"
        );
    }
    info!(
        success = summary.success,
        total_requests = summary.total_requests,
        elapsed_ms = elapsed.as_millis() as u64,
        peak_in_flight = summary.peak_in_flight,
        "load run finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn queue_hands_out_each_index_once() {
        let queue = Arc::new(WorkQueue::new(1000));

        let taken: Vec<usize> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(index) = queue.take() {
                        mine.push(index);
                    }
                    mine
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(taken.len(), 1000);
        let unique: HashSet<usize> = taken.into_iter().collect();
        assert_eq!(unique.len(), 1000);
        assert!(unique.iter().all(|&i| i < 1000));
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let queue = WorkQueue::new(0);
        assert_eq!(queue.take(), None);
        assert_eq!(queue.take(), None);
    }

    #[test]
    fn in_flight_tracks_peak() {
        let gauge = InFlight::default();
        {
            let _a = gauge.enter();
            let _b = gauge.enter();
            {
                let _c = gauge.enter();
            }
            let _d = gauge.enter();
        }
        assert_eq!(gauge.peak(), 3);
        assert_eq!(gauge.current.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn slots_start_empty() {
        let slots = allocate_slots(4).unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(Option::is_none));
    }

    #[test]
    fn unallocatable_count_is_a_config_error() {
        assert!(matches!(
            allocate_slots(usize::MAX),
            Err(ConfigError::TooManyRequests(usize::MAX))
        ));
    }

    #[tokio::test]
    async fn huge_count_fails_before_any_request() {
        let config = RunConfig::new("http://127.0.0.1:1/")
            .with_total_requests(usize::MAX)
            .with_concurrency(2);
        let err = run_load_test(&config).await.unwrap_err();
        assert!(matches!(
            err,
            RunError::Config(ConfigError::TooManyRequests(usize::MAX))
        ));
    }

    #[tokio::test]
    async fn panicking_worker_stops_the_others() {
        let finished = Arc::new(AtomicBool::new(false));
        let mut workers: JoinSet<WorkerResults> = JoinSet::new();

        let flag = Arc::clone(&finished);
        workers.spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
            Vec::new()
        });
        workers.spawn(async { Option::<WorkerResults>::None.expect("worker blew up") });

        let mut slots = allocate_slots(0).unwrap();
        let err = join_workers(workers, &mut slots).await.unwrap_err();
        assert!(matches!(err, RunError::WorkerPanicked(_)));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn config_errors_abort_before_dispatch() {
        let config = RunConfig::new("ftp://127.0.0.1/").with_total_requests(3);
        let err = run_load_test(&config).await.unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }
}
