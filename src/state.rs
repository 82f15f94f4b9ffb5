use crate::config::AnalysisConfig;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub config: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, config: AnalysisConfig) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            config: Arc::new(config),
        }
    }
}
