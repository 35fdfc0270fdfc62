//! Job lifecycle manager
//!
//! Owns the export and import collections, stamps new jobs, schedules their
//! completion and answers grouped-by-state queries.
//!
//! ```text
//! create_*_job ──► JobStore::insert (pending) ──► Scheduler::schedule(delay)
//!                                                        │
//!                                                        ▼
//!                                      JobStore::finish(id, clock.now())
//! ```
//!
//! Completion actions capture only the job id and the store handle. They go
//! through [`JobStore::finish`], which ignores unknown or finished jobs, so a
//! timer that outlives `clear_all` cannot bring a job back.

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::clock::{Clock, TokioClock};
use super::model::{ExportJob, ExportKind, ImportJob, ImportKind, Job, JobDelays, JobKind};
use super::scheduler::{Scheduler, TokioScheduler};
use super::store::{JobStore, JobsByState};

type SharedStore<K> = Arc<RwLock<JobStore<K>>>;

#[derive(Clone)]
pub struct JobManager {
    exports: SharedStore<ExportKind>,
    imports: SharedStore<ImportKind>,
    delays: JobDelays,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
}

impl JobManager {
    /// Manager backed by tokio timers and the tokio clock.
    pub fn new(delays: JobDelays) -> Self {
        Self::with_parts(delays, Arc::new(TokioScheduler), Arc::new(TokioClock::new()))
    }

    pub fn with_parts(
        delays: JobDelays,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            exports: Arc::new(RwLock::new(JobStore::new())),
            imports: Arc::new(RwLock::new(JobStore::new())),
            delays,
            scheduler,
            clock,
        }
    }

    pub async fn create_export_job(&self, book_id: String, kind: ExportKind) -> ExportJob {
        let job = ExportJob::new_export(book_id, kind, self.clock.now());
        let delay = self.delays.for_export(kind);
        self.submit(&self.exports, job, delay).await
    }

    pub async fn create_import_job(
        &self,
        book_id: String,
        kind: ImportKind,
        source_url: String,
    ) -> ImportJob {
        let job = ImportJob::new_import(book_id, kind, source_url, self.clock.now());
        let delay = self.delays.for_import(kind);
        self.submit(&self.imports, job, delay).await
    }

    pub async fn list_export_jobs_by_state(&self) -> JobsByState<ExportKind> {
        self.exports.read().await.grouped_by_state()
    }

    pub async fn list_import_jobs_by_state(&self) -> JobsByState<ImportKind> {
        self.imports.read().await.grouped_by_state()
    }

    /// Empties both collections and cancels their pending completions.
    pub async fn clear_all(&self) {
        self.exports.write().await.clear();
        self.imports.write().await.clear();
        info!("Cleared all export and import jobs");
    }

    async fn submit<K: JobKind>(
        &self,
        store: &SharedStore<K>,
        job: Job<K>,
        delay: Duration,
    ) -> Job<K> {
        let id = job.id;
        let mut guard = store.write().await;
        guard.insert(job.clone());

        // Held lock keeps a zero-delay completion from running before the
        // timer is tracked.
        let action = completion(store.clone(), self.clock.clone(), id);
        let handle = self.scheduler.schedule(delay, action);
        guard.track_timer(id, handle);
        drop(guard);

        info!(
            job_id = %id,
            family = %K::FAMILY,
            kind = %job.kind,
            delay_secs = delay.as_secs_f64(),
            "Job created"
        );
        job
    }
}

fn completion<K: JobKind>(
    store: SharedStore<K>,
    clock: Arc<dyn Clock>,
    id: Uuid,
) -> BoxFuture<'static, ()> {
    async move {
        let mut guard = store.write().await;
        match guard.finish(&id, clock.now()) {
            Some(job) => info!(
                job_id = %id,
                family = %K::FAMILY,
                kind = %job.kind,
                updated_at = %job.updated_at,
                "Job finished"
            ),
            None => debug!(
                job_id = %id,
                family = %K::FAMILY,
                "Skipping completion for missing or finished job"
            ),
        }
    }
    .boxed()
}
