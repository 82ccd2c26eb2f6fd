use crate::record::{Record, RecordId, TRANSIENT_ID};
use crate::statics;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record ID {0} already exists")]
    DuplicateId(RecordId),
    #[error("record ID {0} not found")]
    NotFound(RecordId),
    #[error("record has no ID assigned")]
    TransientId,
    #[error("no record IDs left after {0}")]
    IdsExhausted(RecordId),
}

/// The in-session list of records for one entity kind, in insertion order.
/// Single-threaded: owned by one catalog.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: R) -> Result<(), StoreError> {
        let id = record.id();
        if id == TRANSIENT_ID {
            return Err(StoreError::TransientId);
        }
        if self.contains(id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.records.push(record);
        tracing::debug!(target: statics::LOG_STORE, id, "store.add");
        Ok(())
    }

    pub fn update(&mut self, record: R) -> Result<(), StoreError> {
        let id = record.id();
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = record;
        tracing::debug!(target: statics::LOG_STORE, id, "store.update");
        Ok(())
    }

    pub fn remove(&mut self, id: RecordId) -> Result<R, StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        tracing::debug!(target: statics::LOG_STORE, id, "store.remove");
        Ok(self.records.remove(idx))
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// `max(id) + 1`, or 1 for an empty store. Computed on every call so ids freed by
    /// removal of the highest record are the only ones ever reused.
    pub fn next_id(&self) -> Result<RecordId, StoreError> {
        match self.records.iter().map(Record::id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted(max)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the whole store, e.g. with the records a repository returned for a project.
    /// Nothing is replaced if any record is transient or ids collide.
    pub fn seed(&mut self, records: Vec<R>) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let id = record.id();
            if id == TRANSIENT_ID {
                return Err(StoreError::TransientId);
            }
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId(id));
            }
        }
        tracing::debug!(target: statics::LOG_STORE, count = records.len(), "store.seed");
        self.records = records;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordStore, StoreError};
    use crate::record::{Entry, Record};

    fn entry(id: u64, name: &str) -> Entry {
        Entry::new("faction", 1, name).with_id(id)
    }

    #[test]
    fn add_rejects_duplicate_and_transient_ids() {
        let mut store = RecordStore::new();
        store.add(entry(1, "A")).unwrap();
        assert_eq!(store.add(entry(1, "B")), Err(StoreError::DuplicateId(1)));
        assert_eq!(store.add(entry(0, "C")), Err(StoreError::TransientId));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = RecordStore::new();
        store.add(entry(1, "A")).unwrap();
        store.add(entry(2, "B")).unwrap();
        store.update(entry(1, "A2")).unwrap();
        let names: Vec<_> = store.all().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["A2", "B"]);
        assert_eq!(store.update(entry(9, "X")), Err(StoreError::NotFound(9)));
    }

    #[test]
    fn remove_reports_missing() {
        let mut store = RecordStore::new();
        store.add(entry(1, "A")).unwrap();
        assert_eq!(store.remove(1).map(|r| r.name), Ok("A".to_string()));
        assert_eq!(store.remove(1).map(|r| r.name), Err(StoreError::NotFound(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn next_id_skips_gaps_left_by_removal() {
        let mut store = RecordStore::new();
        assert_eq!(store.next_id(), Ok(1));
        for id in 1..=3 {
            store.add(entry(id, "x")).unwrap();
        }
        store.remove(2).unwrap();
        assert_eq!(store.next_id(), Ok(4));
    }

    #[test]
    fn next_id_reports_exhaustion_at_max_id() {
        let mut store = RecordStore::new();
        store.seed(vec![entry(u64::MAX, "last")]).unwrap();
        assert_eq!(store.next_id(), Err(StoreError::IdsExhausted(u64::MAX)));

        store.remove(u64::MAX).unwrap();
        assert_eq!(store.next_id(), Ok(1));
    }

    #[test]
    fn seed_is_all_or_nothing() {
        let mut store = RecordStore::new();
        store.add(entry(5, "keep")).unwrap();
        assert_eq!(
            store.seed(vec![entry(1, "a"), entry(1, "b")]),
            Err(StoreError::DuplicateId(1))
        );
        assert_eq!(store.all()[0].name, "keep");

        store.seed(vec![entry(3, "a"), entry(1, "b")]).unwrap();
        let ids: Vec<_> = store.all().iter().map(Record::id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
