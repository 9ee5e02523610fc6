// 🧠 In-memory booking store
//
// Append-only Vec behind a RwLock. Ids start at 1 and never repeat.

use super::{BookingError, BookingInput, BookingRecord, BookingStore};
use chrono::Utc;
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct Inner {
    next_id: i64,
    records: Vec<BookingRecord>,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    /// Number of stored bookings
    pub fn count(&self) -> Result<usize, BookingError> {
        let inner = self.inner.read().map_err(|_| BookingError::Poisoned)?;
        Ok(inner.records.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore for MemoryStore {
    fn create(&self, input: BookingInput) -> Result<BookingRecord, BookingError> {
        let valid = input.validate()?;

        let mut inner = self.inner.write().map_err(|_| BookingError::Poisoned)?;
        let record = valid.into_record(inner.next_id, Utc::now());
        inner.next_id += 1;
        inner.records.push(record.clone());

        debug!("stored booking #{} in memory", record.id);
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<BookingRecord>, BookingError> {
        let inner = self.inner.read().map_err(|_| BookingError::Poisoned)?;
        Ok(inner.records.clone())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<BookingRecord>, BookingError> {
        let inner = self.inner.read().map_err(|_| BookingError::Poisoned)?;
        Ok(inner.records.iter().find(|b| b.id == id).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::booking::tests::sample_input;
    use crate::store::ProjectType;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insertion_order() {
        let store = MemoryStore::new();
        for name in ["Ada", "Grace", "Linus"] {
            store
                .create(BookingInput { name: name.to_string(), ..sample_input() })
                .unwrap();
        }

        let names: Vec<String> = store.list_all().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Ada", "Grace", "Linus"]);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_failed_create_does_not_consume_id() {
        let store = MemoryStore::new();
        store
            .create(BookingInput { project_type: "".to_string(), ..sample_input() })
            .unwrap_err();

        let record = store.create(sample_input()).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.project_type, ProjectType::Branding);
    }

    #[test]
    fn test_concurrent_creates_get_unique_ids() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.create(sample_input()).unwrap().id)
            })
            .collect();

        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let writer = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.count(), Err(BookingError::Poisoned)));
        assert!(matches!(store.list_all(), Err(BookingError::Poisoned)));
    }
}
