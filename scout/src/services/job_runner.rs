//! Background runner for price sweeps
//!
//! Sweeps run for minutes, so callers submit them and poll. A single worker
//! drains the queue, which keeps at most one sweep talking to the model API
//! at a time on top of the global rate limiter. Only the most recent
//! finished jobs stay queryable; older ones are forgotten.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast, mpsc};
use tokio::task::JoinHandle;

use shared::{Component, JobId, scout_debug, scout_error, scout_info, scout_warn};
use crate::core::price_search::PriceSearchOrchestrator;
use crate::error::{ScoutError, ScoutResult};
use crate::traits::{ModelClient, PersistenceGateway};
use crate::types::{JobEvent, JobStatus, SweepJob, SweepRequest};

const QUEUE_CAPACITY: usize = 100;
const EVENT_CAPACITY: usize = 64;
/// Finished jobs kept for `status` lookups
pub const DEFAULT_FINISHED_RETENTION: usize = 100;

type JobTable = Arc<RwLock<HashMap<JobId, SweepJob>>>;

/// Handle for submitting sweeps and reading their state
///
/// Cloning the handle is cheap; the worker stops once every handle is dropped
/// and the queue is drained.
#[derive(Clone)]
pub struct SweepJobRunner {
    queue: mpsc::Sender<JobId>,
    pub(super) jobs: JobTable,
    events: broadcast::Sender<JobEvent>,
}

impl SweepJobRunner {
    /// Start the worker task for the given orchestrator
    pub fn spawn<M, P>(orchestrator: PriceSearchOrchestrator<M, P>) -> (Self, JoinHandle<()>)
    where
        M: ModelClient + 'static,
        P: PersistenceGateway + 'static,
    {
        Self::spawn_with_retention(orchestrator, DEFAULT_FINISHED_RETENTION)
    }

    /// Start the worker, keeping at most `retain_finished` finished jobs
    ///
    /// Pending and running jobs are never evicted.
    pub fn spawn_with_retention<M, P>(
        orchestrator: PriceSearchOrchestrator<M, P>,
        retain_finished: usize,
    ) -> (Self, JoinHandle<()>)
    where
        M: ModelClient + 'static,
        P: PersistenceGateway + 'static,
    {
        let (queue, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let jobs: JobTable = Arc::new(RwLock::new(HashMap::new()));

        let worker = tokio::spawn(run_worker(orchestrator, receiver, jobs.clone(), events.clone(), retain_finished));
        scout_info!(Component::JobRunner, "🚀 Sweep job runner started");

        (Self { queue, jobs, events }, worker)
    }

    /// Queue a sweep and return its job id
    pub async fn submit(&self, request: SweepRequest) -> ScoutResult<JobId> {
        // Reserve the queue slot first so a stopped runner leaves no record or event behind
        let permit = self.queue.reserve().await.map_err(|_| ScoutError::RunnerStopped)?;

        let job = SweepJob::new(request);
        let job_id = job.id;
        self.jobs.write().await.insert(job_id, job);
        let _ = self.events.send(JobEvent::Queued { job_id });
        // The worker only sees the job after this, so Queued precedes Started
        permit.send(job_id);

        scout_info!(Component::JobRunner, "📥 Queued sweep job {}", job_id);
        Ok(job_id)
    }

    /// Current record of a job, `None` for unknown ids
    pub async fn status(&self, job_id: JobId) -> Option<SweepJob> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    /// Receive lifecycle events for jobs submitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }
}

async fn run_worker<M, P>(
    orchestrator: PriceSearchOrchestrator<M, P>,
    mut receiver: mpsc::Receiver<JobId>,
    jobs: JobTable,
    events: broadcast::Sender<JobEvent>,
    retain_finished: usize,
) where
    M: ModelClient + 'static,
    P: PersistenceGateway + 'static,
{
    let mut finished: VecDeque<JobId> = VecDeque::new();

    while let Some(job_id) = receiver.recv().await {
        let request = {
            let mut table = jobs.write().await;
            let Some(job) = table.get_mut(&job_id) else {
                scout_warn!(Component::JobRunner, "⚠️ Job {} vanished before it started", job_id);
                continue;
            };
            job.status = JobStatus::Running;
            job.started_at = Some(Utc::now());
            job.request.clone()
        };
        let _ = events.send(JobEvent::Started { job_id });

        let status = match orchestrator.search_prices_report(&request).await {
            Ok(report) => {
                scout_info!(
                    Component::JobRunner,
                    "✅ Sweep job {} completed: {} prices found",
                    job_id,
                    report.prices_found
                );
                JobStatus::Completed { report }
            }
            Err(e) => {
                scout_error!(Component::JobRunner, "❌ Sweep job {} failed: {}", job_id, e);
                JobStatus::Failed { error: e.to_string() }
            }
        };

        {
            let mut table = jobs.write().await;
            if let Some(job) = table.get_mut(&job_id) {
                job.status = status.clone();
                job.finished_at = Some(Utc::now());
            }
            finished.push_back(job_id);
            while finished.len() > retain_finished {
                if let Some(evicted) = finished.pop_front() {
                    table.remove(&evicted);
                    scout_debug!(Component::JobRunner, "Forgot finished sweep job {}", evicted);
                }
            }
        }
        let _ = events.send(JobEvent::Finished { job_id, status });
    }

    scout_info!(Component::JobRunner, "🛑 Sweep job runner stopped");
}
