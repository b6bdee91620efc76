use super::DocumentStore;
use crate::error::{MdraftError, Result};
use crate::model::DocumentRecord;
use uuid::Uuid;

/// In-memory document collection for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    records: Vec<DocumentRecord>,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutating call fail with a store error. Lets tests drive
    /// the coordinator's write-failure path.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(MdraftError::Store("write rejected".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryStore {
    fn list_all(&self) -> Result<Vec<DocumentRecord>> {
        Ok(self.records.clone())
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<DocumentRecord>> {
        Ok(self.records.iter().find(|r| r.id == *id).cloned())
    }

    fn upsert(&mut self, record: &DocumentRecord) -> Result<()> {
        self.check_writable()?;
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => self.records.insert(0, record.clone()),
        }
        Ok(())
    }

    fn remove(&mut self, id: &Uuid) -> Result<()> {
        self.check_writable()?;
        self.records.retain(|r| r.id != *id);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_documents(mut self, count: usize) -> Self {
            for i in 0..count {
                let title = format!("Test Document {}", i + 1);
                let content = format!("Content for document {}", i + 1);
                let record = DocumentRecord::new(title, content);
                self.store.upsert(&record).unwrap();
            }
            self
        }
    }
}
