//! Notesum Core Library
//!
//! This crate provides the core functionality for notesum, including:
//! - Notes (user-scoped CRUD over SQLite)
//! - Summaries (completion API or local fallback)
//! - Note update coordination (summarize, then persist for the owner)
//! - Accounts (users, profiles, sessions)
//! - Storage (SQLite + migrations)
//! - LLM integration (OpenAI-compatible chat completions)

pub mod accounts;
pub mod config;
pub mod error;
pub mod llm;
pub mod notes;
pub mod storage;
pub mod summary;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::notes::{Note, NoteInput, NoteStore, NoteUpdate};
    pub use crate::summary::SummaryService;
}
