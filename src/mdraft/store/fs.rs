use super::DocumentStore;
use crate::config::MdraftConfig;
use crate::error::{MdraftError, Result};
use crate::model::DocumentRecord;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const STORE_FILENAME: &str = "documents.json";

/// File-backed document collection.
///
/// Every mutating call rewrites the whole collection file. The serialized
/// blob is produced before any file is touched and lands via a temp file
/// plus rename, so a failed commit leaves the previous state intact.
///
/// The commit is last-writer-wins over the entire collection. A single
/// process owns the file; concurrent writers must serialize externally.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file inside the given directory, using the standard filename.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORE_FILENAME))
    }

    /// Resolve the store location from config, falling back to the
    /// platform data directory.
    pub fn from_config(config: &MdraftConfig) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => Ok(Self::in_dir(dir)),
            None => Self::default_location(),
        }
    }

    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "mdraft")
            .ok_or_else(|| MdraftError::Store("No data directory available".to_string()))?;
        Ok(Self::in_dir(dirs.data_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<DocumentRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(MdraftError::Io)?;
        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "document collection is unreadable, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn commit(&self, records: &[DocumentRecord]) -> Result<()> {
        // Serialize before touching the file
        let json = serde_json::to_string_pretty(records).map_err(MdraftError::Serialization)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                if !parent.exists() {
                    fs::create_dir_all(parent).map_err(MdraftError::Io)?;
                }
                parent
            }
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(MdraftError::Io)?;
        tmp.write_all(json.as_bytes()).map_err(MdraftError::Io)?;
        tmp.persist(&self.path)
            .map_err(|err| MdraftError::Io(err.error))?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn list_all(&self) -> Result<Vec<DocumentRecord>> {
        self.load()
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<DocumentRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.id == *id))
    }

    fn upsert(&mut self, record: &DocumentRecord) -> Result<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.insert(0, record.clone()),
        }
        self.commit(&records)
    }

    fn remove(&mut self, id: &Uuid) -> Result<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != *id);
        if records.len() != before {
            self.commit(&records)?;
        }
        Ok(())
    }
}
