//! # Storage Layer
//!
//! The document collection lives behind the [`DocumentStore`] trait so the
//! save pipeline never knows where records actually land.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage. The whole collection is one JSON
//!   array in a single file, committed atomically on every mutating call.
//! - [`memory::InMemoryStore`]: no persistence, used by tests (and able to
//!   inject write failures so the coordinator's failure paths are testable).
//!
//! ## Ordering Contract
//!
//! The collection is ordered most-recently-created first: `upsert` of an
//! unknown id inserts at the front, `upsert` of a known id replaces the
//! record in place without moving it. The listing views rely on this.
//!
//! ## Recovery Policy
//!
//! A collection that fails to deserialize on load is treated as empty. The
//! application must keep working on corrupt local state; the discarded blob
//! is reported through a log diagnostic only.

use crate::error::Result;
use crate::model::DocumentRecord;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Abstract interface for the document collection.
pub trait DocumentStore {
    /// All records, most recently created first. Empty if no store exists yet.
    fn list_all(&self) -> Result<Vec<DocumentRecord>>;

    /// Find a record by id.
    fn find_by_id(&self, id: &Uuid) -> Result<Option<DocumentRecord>>;

    /// Insert at the front, or replace in place when the id already exists.
    fn upsert(&mut self, record: &DocumentRecord) -> Result<()>;

    /// Delete the record if present; no-op otherwise.
    fn remove(&mut self, id: &Uuid) -> Result<()>;
}
