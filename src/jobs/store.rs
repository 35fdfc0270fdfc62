use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::task::AbortHandle;
use uuid::Uuid;

use super::model::{Job, JobState};

/// Jobs partitioned by state. Only non-empty groups are present.
pub type JobsByState<K> = BTreeMap<JobState, Vec<Job<K>>>;

/// One family's jobs, in insertion order, plus the completion timers still
/// outstanding for them.
#[derive(Debug)]
pub struct JobStore<K> {
    jobs: Vec<Job<K>>,
    index: HashMap<Uuid, usize>,
    timers: HashMap<Uuid, AbortHandle>,
}

impl<K> Default for JobStore<K> {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            index: HashMap::new(),
            timers: HashMap::new(),
        }
    }
}

impl<K: Clone> JobStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job: Job<K>) {
        self.index.insert(job.id, self.jobs.len());
        self.jobs.push(job);
    }

    #[cfg(test)]
    pub fn get(&self, id: &Uuid) -> Option<&Job<K>> {
        self.index.get(id).map(|&pos| &self.jobs[pos])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn track_timer(&mut self, id: Uuid, handle: AbortHandle) {
        self.timers.insert(id, handle);
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The single place a job changes state. A missing or already finished
    /// job is left alone and `None` is returned.
    pub fn finish(&mut self, id: &Uuid, at: DateTime<Utc>) -> Option<&Job<K>> {
        self.timers.remove(id);

        let pos = *self.index.get(id)?;
        let job = &mut self.jobs[pos];
        if job.finish(at) {
            Some(&*job)
        } else {
            None
        }
    }

    pub fn grouped_by_state(&self) -> JobsByState<K> {
        let mut grouped: JobsByState<K> = BTreeMap::new();
        for job in &self.jobs {
            grouped.entry(job.state).or_default().push(job.clone());
        }
        grouped
    }

    /// Drops every job and aborts their outstanding timers.
    pub fn clear(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        self.jobs.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::model::{ExportJob, ExportKind};

    fn export(book_id: &str) -> ExportJob {
        ExportJob::new_export(book_id.to_string(), ExportKind::Epub, Utc::now())
    }

    #[test]
    fn test_grouping_omits_empty_states() {
        let mut store = JobStore::new();
        store.insert(export("a"));
        store.insert(export("b"));

        let grouped = store.grouped_by_state();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&JobState::Pending].len(), 2);
        assert!(!grouped.contains_key(&JobState::Finished));
    }

    #[test]
    fn test_grouping_keeps_insertion_order() {
        let mut store = JobStore::new();
        let jobs: Vec<_> = ["a", "b", "c", "d"].iter().map(|b| export(b)).collect();
        for job in &jobs {
            store.insert(job.clone());
        }

        store.finish(&jobs[1].id, Utc::now());
        store.finish(&jobs[3].id, Utc::now());

        let grouped = store.grouped_by_state();
        let book_ids = |state: JobState| -> Vec<&str> {
            grouped[&state].iter().map(|j| j.book_id.as_str()).collect()
        };
        assert_eq!(book_ids(JobState::Pending), vec!["a", "c"]);
        assert_eq!(book_ids(JobState::Finished), vec!["b", "d"]);
    }

    #[test]
    fn test_finish_unknown_job_is_noop() {
        let mut store: JobStore<ExportKind> = JobStore::new();
        assert!(store.finish(&Uuid::new_v4(), Utc::now()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_finish_twice_reports_once() {
        let mut store = JobStore::new();
        let job = export("a");
        store.insert(job.clone());

        assert!(store.finish(&job.id, Utc::now()).is_some());
        assert!(store.finish(&job.id, Utc::now()).is_none());
        assert_eq!(store.get(&job.id).unwrap().state, JobState::Finished);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut store = JobStore::new();
        let job = export("a");
        store.insert(job.clone());
        store.clear();

        assert_eq!(store.len(), 0);
        assert!(store.get(&job.id).is_none());
        assert!(store.finish(&job.id, Utc::now()).is_none());
        assert!(store.grouped_by_state().is_empty());
    }
}
