// Book Jobs - REST service tracking book export and import conversion jobs

pub mod config;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod types;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use jobs::JobManager;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
