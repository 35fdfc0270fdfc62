//! Job domain: models, per-family storage, completion scheduling and the
//! lifecycle manager that ties them together.

pub mod clock;
pub mod manager;
pub mod model;
pub mod scheduler;
pub mod store;

pub use manager::JobManager;
pub use model::{
    ExportJob, ExportKind, ImportJob, ImportKind, Job, JobDelays, JobFamily, JobKind, JobState,
};
pub use store::JobsByState;
