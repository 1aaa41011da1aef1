//! Job poller
//!
//! Repeatedly queries a remote job's status until it reaches a terminal state,
//! the policy's time budget runs out, or the caller cancels.
//! The poller is generic over the status query, so one loop serves every
//! kind of job.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tandem_core::domain::job::{JobSnapshot, JobStatus, PollAttempt};
use tandem_core::domain::policy::JobPolicy;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Terminal outcome of a polling run
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job reached `Ready`
    Ready {
        result: Value,
        elapsed: Duration,
        attempts: u32,
    },
    /// The service reported the job as `Failed`
    Failed {
        detail: String,
        elapsed: Duration,
        attempts: u32,
    },
    /// The budget elapsed while the job was still pending
    TimedOut { elapsed: Duration, attempts: u32 },
    /// The cancellation token fired before a terminal state was observed
    Cancelled { elapsed: Duration, attempts: u32 },
}

impl PollOutcome {
    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Ready { elapsed, .. }
            | PollOutcome::Failed { elapsed, .. }
            | PollOutcome::TimedOut { elapsed, .. }
            | PollOutcome::Cancelled { elapsed, .. } => *elapsed,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Ready { attempts, .. }
            | PollOutcome::Failed { attempts, .. }
            | PollOutcome::TimedOut { attempts, .. }
            | PollOutcome::Cancelled { attempts, .. } => *attempts,
        }
    }
}

/// A status query failed mid-poll
///
/// Carries the time spent polling so the caller can report it alongside the
/// query's own error.
#[derive(Debug)]
pub struct PollError<E> {
    pub source: E,
    pub elapsed: Duration,
    /// Queries issued, the failed one included
    pub attempts: u32,
}

/// Polls a single job under a [`JobPolicy`]
#[derive(Debug, Clone)]
pub struct JobPoller {
    policy: JobPolicy,
    cancel: CancellationToken,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(policy: JobPolicy, cancel: CancellationToken) -> Self {
        Self { policy, cancel }
    }

    pub fn policy(&self) -> &JobPolicy {
        &self.policy
    }

    /// Runs the polling loop
    ///
    /// `query` is invoked once per tick. The first query happens immediately;
    /// the deadline is only checked after a non-terminal observation, so a job
    /// seen `Ready` at the very edge of the budget still succeeds.
    ///
    /// Errors returned by `query` are not retried: they end the loop and are
    /// handed back with the elapsed time.
    pub async fn poll<F, Fut, E>(&self, mut query: F) -> Result<PollOutcome, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<JobSnapshot, E>>,
    {
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(PollOutcome::Cancelled {
                    elapsed: start.elapsed(),
                    attempts,
                });
            }

            attempts += 1;
            let snapshot = match query().await {
                Ok(snapshot) => snapshot,
                Err(source) => {
                    return Err(PollError {
                        source,
                        elapsed: start.elapsed(),
                        attempts,
                    });
                }
            };

            let attempt = PollAttempt {
                attempt: attempts,
                at: chrono::Utc::now(),
                status: snapshot.status,
                elapsed: start.elapsed(),
            };
            debug!(
                attempt = attempt.attempt,
                status = ?attempt.status,
                elapsed_ms = attempt.elapsed.as_millis() as u64,
                at = %attempt.at,
                "Polled job status"
            );

            match snapshot.status {
                JobStatus::Ready => {
                    return Ok(PollOutcome::Ready {
                        result: snapshot.result.unwrap_or(Value::Null),
                        elapsed: attempt.elapsed,
                        attempts,
                    });
                }
                JobStatus::Failed => {
                    return Ok(PollOutcome::Failed {
                        detail: snapshot
                            .error
                            .unwrap_or_else(|| "no error detail provided".to_string()),
                        elapsed: attempt.elapsed,
                        attempts,
                    });
                }
                JobStatus::Pending => {}
            }

            if attempt.elapsed > self.policy.max_wait() {
                return Ok(PollOutcome::TimedOut {
                    elapsed: attempt.elapsed,
                    attempts,
                });
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Ok(PollOutcome::Cancelled {
                        elapsed: start.elapsed(),
                        attempts,
                    });
                }
                _ = time::sleep(self.policy.interval()) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tandem_client::ClientError;

    /// Replays `script` one snapshot per query, repeating the last one forever
    fn scripted(
        script: Vec<JobSnapshot>,
        calls: Arc<AtomicU32>,
    ) -> impl FnMut() -> std::future::Ready<Result<JobSnapshot, ClientError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as usize;
            let snapshot = script
                .get(n)
                .or_else(|| script.last())
                .cloned()
                .unwrap_or_else(JobSnapshot::pending);
            std::future::ready(Ok(snapshot))
        }
    }

    fn poller(interval: u64, max_wait: u64) -> JobPoller {
        JobPoller::new(
            JobPolicy::from_secs(interval, max_wait).unwrap(),
            CancellationToken::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_tick_does_not_wait() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let outcome = poller(1, 5)
            .poll(scripted(vec![JobSnapshot::ready(json!({ "ok": true }))], calls.clone()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(
            outcome,
            PollOutcome::Ready {
                result: json!({ "ok": true }),
                elapsed: Duration::ZERO,
                attempts: 1,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_stops_polling_at_that_tick() {
        let calls = Arc::new(AtomicU32::new(0));
        let script = vec![
            JobSnapshot::pending(),
            JobSnapshot::pending(),
            JobSnapshot::failed("constraint not satisfied"),
            JobSnapshot::ready(json!({})),
        ];

        let outcome = poller(1, 60).poll(scripted(script, calls.clone())).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match outcome {
            PollOutcome::Failed {
                detail,
                elapsed,
                attempts,
            } => {
                assert_eq!(detail, "constraint not satisfied");
                assert_eq!(attempts, 3);
                assert_eq!(elapsed, Duration::from_secs(2));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_within_one_interval_of_budget() {
        for (interval, max_wait) in [(1, 5), (2, 5), (3, 10), (1, 2)] {
            let calls = Arc::new(AtomicU32::new(0));

            let outcome = poller(interval, max_wait)
                .poll(scripted(vec![JobSnapshot::pending()], calls.clone()))
                .await
                .unwrap();

            let elapsed = match outcome {
                PollOutcome::TimedOut { elapsed, .. } => elapsed,
                other => panic!("unexpected outcome: {other:?}"),
            };
            assert!(elapsed >= Duration::from_secs(max_wait));
            assert!(elapsed <= Duration::from_secs(max_wait + interval));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_observed_at_budget_boundary_is_honored() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut script = vec![JobSnapshot::pending(); 3];
        script.push(JobSnapshot::ready(json!({ "late": true })));

        // Fourth tick lands at exactly 3s == max_wait.
        let outcome = poller(1, 3).poll(scripted(script, calls.clone())).await.unwrap();

        assert!(matches!(outcome, PollOutcome::Ready { attempts: 4, .. }));
        assert_eq!(outcome.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = poller(1, 10)
            .poll(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                std::future::ready(if n == 0 {
                    Ok(JobSnapshot::pending())
                } else {
                    Err(ClientError::api_error(502, "bad gateway"))
                })
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err.source, ClientError::ApiError { status: 502, .. }));
        assert_eq!(err.attempts, 2);
        assert_eq!(err.elapsed, Duration::from_secs(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_wait() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        let poller = JobPoller::new(JobPolicy::from_secs(10, 600).unwrap(), cancel.clone());

        let trigger = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(15)).await;
            trigger.cancel();
        });

        let outcome = poller
            .poll(scripted(vec![JobSnapshot::pending()], calls.clone()))
            .await
            .unwrap();

        // Ticks at 0s and 10s, cancelled during the second wait.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(outcome, PollOutcome::Cancelled { attempts: 2, .. }));
        assert_eq!(outcome.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start_never_queries() {
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = JobPoller::new(JobPolicy::default(), cancel)
            .poll(scripted(vec![JobSnapshot::ready(json!({}))], calls.clone()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.attempts(), 0);
        assert!(matches!(outcome, PollOutcome::Cancelled { .. }));
    }
}
