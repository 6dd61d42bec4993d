use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::BookRecord;

/// Append-only record sequence shared with the detail-page handler.
#[derive(Debug, Default)]
pub struct RecordCollector {
    records: Mutex<Vec<BookRecord>>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: BookRecord) {
        self.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in append order.
    pub fn into_records(self) -> Vec<BookRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the record list, recovering the data from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, Vec<BookRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
