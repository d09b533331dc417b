//! Concurrent review of every failed simulation in a run.
//!
//! All cases are scheduled at once; a semaphore admits at most `concurrency`
//! of them into the client at a time. Results come back in completion order,
//! each tagged with its task id. The first failing review aborts the batch and
//! drops the requests still in flight.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, ensure};
use futures::TryStreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

use crate::core::case_format::{PendingCase, collect_cases};
use crate::core::domain::Domain;
use crate::core::readable::render_reviews;
use crate::core::types::ReviewRecord;
use crate::io::client::ReviewClient;
use crate::io::store::{DataPaths, load_simulations, load_tasks, write_readable, write_reviews};

/// Files produced by [`review_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRunOutput {
    pub reviews_path: PathBuf,
    pub readable_path: PathBuf,
    pub reviewed: usize,
    /// Simulations with reward 1.0, not sent for review.
    pub skipped: usize,
}

/// Review every case with at most `concurrency` requests in flight.
#[instrument(skip_all, fields(cases = cases.len(), concurrency = concurrency))]
pub async fn review_cases<C>(
    client: &C,
    cases: Vec<PendingCase>,
    concurrency: usize,
) -> Result<Vec<ReviewRecord>>
where
    C: ReviewClient + ?Sized,
{
    ensure!(concurrency > 0, "concurrency must be > 0");
    let total = cases.len();
    let semaphore = Semaphore::new(concurrency);
    let finished = AtomicUsize::new(0);
    info!(total, concurrency, "batch review started");

    let mut in_flight: FuturesUnordered<_> = cases
        .into_iter()
        .map(|pending| review_one(client, &semaphore, &finished, total, pending))
        .collect();

    let mut records = Vec::with_capacity(total);
    while let Some(record) = in_flight.try_next().await? {
        records.push(record);
    }
    info!(reviewed = records.len(), "batch review complete");
    Ok(records)
}

async fn review_one<C>(
    client: &C,
    semaphore: &Semaphore,
    finished: &AtomicUsize,
    total: usize,
    pending: PendingCase,
) -> Result<ReviewRecord>
where
    C: ReviewClient + ?Sized,
{
    let _permit = semaphore
        .acquire()
        .await
        .context("review semaphore closed")?;
    let content = client
        .review(&pending.case)
        .await
        .with_context(|| format!("review task {}", pending.task_id))?;
    let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
    info!(task_id = pending.task_id, done, total, "review done");
    Ok(ReviewRecord {
        task_id: pending.task_id,
        case: pending.case,
        content,
    })
}

/// Review a named simulation run end to end: load, format, review, persist
/// the review file and the readable report (with case text).
#[instrument(skip_all, fields(run = %name, concurrency = concurrency))]
pub async fn review_run<C>(
    client: &C,
    paths: &DataPaths,
    name: &str,
    concurrency: usize,
    wrap_width: usize,
) -> Result<ReviewRunOutput>
where
    C: ReviewClient + ?Sized,
{
    let domain = Domain::from_run_name(name)?;
    let tasks = load_tasks(paths, domain)?;
    let simulations = load_simulations(paths, name)?;
    let cases = collect_cases(&tasks, &simulations)?;
    let skipped = simulations.len() - cases.len();
    info!(%domain, simulations = simulations.len(), skipped, "run loaded");

    let records = review_cases(client, cases, concurrency).await?;

    let reviews_path = write_reviews(paths, name, &records)?;
    let readable = render_reviews(&records, true, wrap_width);
    let readable_path = write_readable(paths, name, &readable)?;

    Ok(ReviewRunOutput {
        reviews_path,
        readable_path,
        reviewed: records.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use anyhow::bail;
    use async_trait::async_trait;

    use crate::core::types::ReviewContent;
    use crate::test_support::content;

    /// Client that tracks how many calls overlap and optionally fails one case.
    #[derive(Default)]
    struct CountingClient {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ReviewClient for CountingClient {
        async fn review(&self, case: &str) -> Result<ReviewContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(case) {
                bail!("rate limited");
            }
            Ok(ReviewContent {
                review: format!("reviewed {case}"),
                ..content()
            })
        }
    }

    fn cases(count: usize) -> Vec<PendingCase> {
        (0..count)
            .map(|task_id| PendingCase {
                task_id,
                case: format!("case-{task_id}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_limit() {
        let client = CountingClient::default();
        let records = review_cases(&client, cases(20), 3).await.expect("batch");

        assert_eq!(records.len(), 20);
        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn tags_each_record_with_its_case() {
        let client = CountingClient::default();
        let mut records = review_cases(&client, cases(5), 2).await.expect("batch");
        records.sort_by_key(|record| record.task_id);

        for (index, record) in records.iter().enumerate() {
            assert_eq!(record.task_id, index);
            assert_eq!(record.case, format!("case-{index}"));
            assert_eq!(record.content.review, format!("reviewed case-{index}"));
        }
    }

    /// Client whose case `case-0` takes much longer than the others.
    struct SlowFirstClient;

    #[async_trait]
    impl ReviewClient for SlowFirstClient {
        async fn review(&self, case: &str) -> Result<ReviewContent> {
            let delay = if case == "case-0" { 200 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(content())
        }
    }

    #[tokio::test]
    async fn freed_slots_admit_queued_cases_and_results_follow_completion() {
        let records = review_cases(&SlowFirstClient, cases(5), 2)
            .await
            .expect("batch");

        let order: Vec<usize> = records.iter().map(|record| record.task_id).collect();
        assert_eq!(order.len(), 5);
        // The fast cases share the second slot while case 0 holds the first.
        assert_eq!(order.last(), Some(&0));
        assert_eq!(order[..4], [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn one_failure_aborts_the_batch() {
        let client = CountingClient {
            fail_on: Some("case-2".to_string()),
            ..CountingClient::default()
        };
        let err = review_cases(&client, cases(6), 2)
            .await
            .expect_err("batch fails");
        let message = format!("{err:#}");
        assert!(message.contains("review task 2"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test]
    async fn rejects_zero_concurrency() {
        let client = CountingClient::default();
        let err = review_cases(&client, cases(1), 0)
            .await
            .expect_err("zero");
        assert!(err.to_string().contains("concurrency must be > 0"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let client = CountingClient::default();
        let records = review_cases(&client, Vec::new(), 4).await.expect("batch");
        assert!(records.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }
}
