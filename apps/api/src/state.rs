use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::export::PageConfig;
use crate::resume::persistence::ResumeRepository;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single resume. Mutations hold the write lock until the record is saved.
    pub store: Arc<RwLock<ResumeStore>>,
    /// JSON file by default; in-memory when `RESUME_PERSIST=false`.
    pub repository: Arc<dyn ResumeRepository>,
    pub config: Config,
    /// A4 geometry and type sizes used by the PDF export.
    pub page_config: PageConfig,
}

impl AppState {
    pub fn new(
        store: ResumeStore,
        repository: Arc<dyn ResumeRepository>,
        config: Config,
        page_config: PageConfig,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            repository,
            config,
            page_config,
        }
    }
}
