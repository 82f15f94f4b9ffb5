pub mod advice;
pub mod analysis;
pub mod app;
pub mod config;
pub mod delta;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod state;
pub mod storage;
pub mod trend;
pub mod triggers;

pub use analysis::analyze_patterns;
pub use app::router;
pub use config::AnalysisConfig;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
