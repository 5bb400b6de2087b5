//! Persistent per-owner string stores.
//!
//! Each store keeps one small integer per owner (edge or node) pointing into
//! a table of distinct strings. On disk that is two files in the store's
//! directory: `<name>` (header + fixed-stride index) and `<name>_values.json`
//! (the distinct strings in id order).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::dedup::{DedupIndex, EntryWidth};
use super::error::StorageError;
use super::segment::{IndexSegment, MAX_OWNER, index_path, values_path};

/// Where a store lives and how wide its index entries are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub name: String,
    pub width: EntryWidth,
}

impl StoreConfig {
    /// A store with 2-byte entries.
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            width: EntryWidth::Short,
        }
    }

    pub fn with_width(mut self, width: EntryWidth) -> Self {
        self.width = width;
        self
    }

    pub fn index_path(&self) -> PathBuf {
        index_path(&self.directory, &self.name)
    }

    pub fn values_path(&self) -> PathBuf {
        values_path(&self.directory, &self.name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ValueTable {
    width: EntryWidth,
    values: Vec<String>,
}

#[derive(Debug, Clone)]
enum State {
    Uninitialized,
    Open {
        index: DedupIndex,
        segment: IndexSegment,
    },
    Closed,
}

/// Maps owner ids to deduplicated strings.
///
/// Lifecycle: `create` or `load_existing` exactly once, then any number of
/// `set_value`/`get_value`, then `flush` and `close`.
#[derive(Debug, Clone)]
pub struct DedupValueStore {
    config: StoreConfig,
    state: State,
}

impl DedupValueStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: State::Uninitialized,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    /// Start an empty store sized for `owner_capacity` owners.
    pub fn create(&mut self, owner_capacity: usize) -> Result<(), StorageError> {
        self.ensure_uninitialized()?;

        let width = self.config.width;
        self.state = State::Open {
            index: DedupIndex::new(self.config.name.clone(), width.max_values()),
            segment: IndexSegment::create(width, owner_capacity),
        };
        info!(
            store = %self.config.name,
            owners = owner_capacity,
            width = width.bytes(),
            "Created value store"
        );
        Ok(())
    }

    /// Open the store from its directory. Missing or inconsistent files are
    /// reported as corruption.
    pub fn load_existing(&mut self) -> Result<(), StorageError> {
        self.ensure_uninitialized()?;

        let name = self.config.name.clone();
        let segment = IndexSegment::load(&self.config.index_path(), &name)?;
        let table = read_value_table(&self.config.values_path(), &name)?;

        if segment.width() != table.width || segment.width() != self.config.width {
            return Err(StorageError::Corrupt {
                name,
                reason: format!(
                    "entry width mismatch (index {} bytes, values {} bytes, configured {} bytes)",
                    segment.width().bytes(),
                    table.width.bytes(),
                    self.config.width.bytes()
                ),
            });
        }

        let index = DedupIndex::from_values(name.clone(), table.values, table.width.max_values())?;
        info!(
            store = %name,
            entries = segment.entries(),
            distinct = index.len(),
            "Loaded value store"
        );
        self.state = State::Open { index, segment };
        Ok(())
    }

    /// Assign `value` to `owner`, adding it to the value table if new.
    pub fn set_value(&mut self, owner: usize, value: &str) -> Result<(), StorageError> {
        let State::Open { index, segment } = &mut self.state else {
            return Err(StorageError::NotInitialized(self.config.name.clone()));
        };
        if owner > MAX_OWNER {
            return Err(StorageError::OwnerOutOfRange {
                owner,
                limit: MAX_OWNER,
            });
        }
        let id = index.put(value)?;
        segment.set(owner, id + 1)
    }

    /// The value assigned to `owner`, or `None` if it never received one.
    pub fn get_value(&self, owner: usize) -> Result<Option<&str>, StorageError> {
        let (index, segment) = self.open()?;
        let stored = segment.get(owner);
        if stored == 0 {
            return Ok(None);
        }
        index
            .get(stored - 1)
            .map(Some)
            .ok_or_else(|| StorageError::UnknownId {
                name: self.config.name.clone(),
                id: stored - 1,
            })
    }

    /// Write the index and value table to the store's directory.
    pub fn flush(&self) -> Result<(), StorageError> {
        let (index, segment) = self.open()?;

        segment.flush(&self.config.index_path())?;
        let table = ValueTable {
            width: segment.width(),
            values: index.values().to_vec(),
        };
        std::fs::write(
            self.config.values_path(),
            serde_json::to_string_pretty(&table)?,
        )?;

        info!(
            store = %self.config.name,
            entries = segment.entries(),
            distinct = index.len(),
            "Flushed value store"
        );
        Ok(())
    }

    /// Release the in-memory data. Unflushed changes are lost.
    pub fn close(&mut self) -> Result<(), StorageError> {
        self.open()?;
        self.state = State::Closed;
        Ok(())
    }

    /// Copy this store's contents into an uninitialized store.
    pub fn copy_to(&self, target: &mut DedupValueStore) -> Result<(), StorageError> {
        let (index, segment) = self.open()?;
        let mismatch = |reason| StorageError::StorageMismatch {
            from: self.config.name.clone(),
            to: target.config.name.clone(),
            reason,
        };

        if !matches!(target.state, State::Uninitialized) {
            return Err(mismatch("target is already initialized"));
        }
        if target.config.width != segment.width() {
            return Err(mismatch("entry widths differ"));
        }

        let index = DedupIndex::from_values(
            target.config.name.clone(),
            index.values().to_vec(),
            index.limit(),
        )?;
        target.state = State::Open {
            index,
            segment: segment.clone(),
        };
        Ok(())
    }

    /// Number of owners holding a value.
    pub fn entries(&self) -> Result<u32, StorageError> {
        Ok(self.open()?.1.entries())
    }

    /// Number of distinct values.
    pub fn distinct_values(&self) -> Result<usize, StorageError> {
        Ok(self.open()?.0.len())
    }

    fn open(&self) -> Result<(&DedupIndex, &IndexSegment), StorageError> {
        match &self.state {
            State::Open { index, segment } => Ok((index, segment)),
            _ => Err(StorageError::NotInitialized(self.config.name.clone())),
        }
    }

    fn ensure_uninitialized(&self) -> Result<(), StorageError> {
        match self.state {
            State::Uninitialized => Ok(()),
            _ => Err(StorageError::AlreadyInitialized(self.config.name.clone())),
        }
    }
}

fn read_value_table(path: &Path, name: &str) -> Result<ValueTable, StorageError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StorageError::Corrupt {
        name: name.to_string(),
        reason: format!("cannot open {}: {e}", path.display()),
    })?;
    serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
        name: name.to_string(),
        reason: format!("invalid value table: {e}"),
    })
}
