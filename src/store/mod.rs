// Booking Store - Repository for project requests
//
// One trait, two interchangeable backends:
// - MemoryStore: process-local, insertion order, gone on restart
// - SqliteStore: single `bookings` table, ids and timestamps from SQLite

pub mod booking;
pub mod memory;
pub mod sqlite;

pub use booking::{BookingInput, BookingRecord, ProjectType, ValidBooking};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{Config, StoreBackend};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("booking store lock poisoned")]
    Poisoned,
}

impl BookingError {
    pub fn required(field: &'static str) -> Self {
        BookingError::Validation {
            field,
            message: "is required".to_string(),
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, BookingError::Validation { .. })
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

pub trait BookingStore: Send + Sync {
    /// Validate and persist a booking, assigning its id and creation time
    fn create(&self, input: BookingInput) -> Result<BookingRecord, BookingError>;

    fn list_all(&self) -> Result<Vec<BookingRecord>, BookingError>;

    fn get_by_id(&self, id: i64) -> Result<Option<BookingRecord>, BookingError>;

    /// Short name for logs and the health endpoint
    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected by configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn BookingStore>> {
    let store: Arc<dyn BookingStore> = match config.store {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::open(&config.db_path)
                .with_context(|| format!("Failed to open booking database {:?}", config.db_path))?,
        ),
    };

    info!("booking store ready: {}", store.backend_name());
    Ok(store)
}

// ============================================================================
// TESTS
// ============================================================================
