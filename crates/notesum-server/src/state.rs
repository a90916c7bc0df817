//! Shared application state

use std::sync::Arc;

use notesum_core::accounts::AccountService;
use notesum_core::config::Config;
use notesum_core::notes::{NoteRepository, NoteStore, NoteSummaryCoordinator};
use notesum_core::storage::Database;
use notesum_core::summary::SummaryService;

/// Handles constructed once at startup and cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub notes: Arc<dyn NoteStore>,
    pub summaries: SummaryService,
    pub coordinator: NoteSummaryCoordinator,
    pub accounts: AccountService,
}

impl AppState {
    /// Wire the services around an open database
    pub fn new(db: Database, summaries: SummaryService, accounts: AccountService) -> Self {
        let notes: Arc<dyn NoteStore> = Arc::new(NoteRepository::new(db.clone()));
        let coordinator = NoteSummaryCoordinator::new(summaries.clone(), notes.clone());

        Self {
            db,
            notes,
            summaries,
            coordinator,
            accounts,
        }
    }

    /// Open the configured database and pick the summary strategy
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let db = Database::from_settings(&config.database).await?;
        let summaries = SummaryService::from_config(&config.llm)?;
        let accounts = AccountService::new(db.clone(), &config.auth);
        Ok(Self::new(db, summaries, accounts))
    }
}
