//! Fixed-stride index files.
//!
//! Layout: an 8-byte header (entry width, entry count; little-endian `u32`
//! each) followed by one fixed-width entry per owner id. Owners beyond the
//! end of the body read back as zero.

use std::ops::Range;
use std::path::{Path, PathBuf};

use super::dedup::EntryWidth;
use super::error::StorageError;

const HEADER_BYTES: usize = 8;

/// Owner ids are stored as signed 32-bit integers elsewhere in the graph.
pub(crate) const MAX_OWNER: usize = i32::MAX as usize;

/// One owner-indexed array of small integers, held in memory.
#[derive(Debug, Clone)]
pub(crate) struct IndexSegment {
    width: EntryWidth,
    body: Vec<u8>,
    entries: u32,
}

impl IndexSegment {
    /// Create an empty segment with room for `owners` entries.
    pub(crate) fn create(width: EntryWidth, owners: usize) -> Self {
        Self {
            width,
            body: vec![0; owners.min(MAX_OWNER + 1).saturating_mul(width.bytes())],
            entries: 0,
        }
    }

    /// Read a segment from disk. A missing or malformed file is corruption.
    pub(crate) fn load(path: &Path, name: &str) -> Result<Self, StorageError> {
        let corrupt = |reason: String| StorageError::Corrupt {
            name: name.to_string(),
            reason,
        };

        let bytes = std::fs::read(path)
            .map_err(|e| corrupt(format!("cannot open {}: {e}", path.display())))?;
        if bytes.len() < HEADER_BYTES {
            return Err(corrupt(format!("header truncated ({} bytes)", bytes.len())));
        }

        let width_bytes = read_u32(&bytes[0..4]);
        let entries = read_u32(&bytes[4..8]);
        let width = EntryWidth::from_bytes(width_bytes)
            .ok_or_else(|| corrupt(format!("unsupported entry width {width_bytes}")))?;

        let body = bytes[HEADER_BYTES..].to_vec();
        if body.len() % width.bytes() != 0 {
            return Err(corrupt(format!(
                "body of {} bytes is not a multiple of {}",
                body.len(),
                width.bytes()
            )));
        }
        let slots = body.len() / width.bytes();
        if entries as usize > slots {
            return Err(corrupt(format!(
                "header claims {entries} entries but the body has {slots} slots"
            )));
        }

        Ok(Self {
            width,
            body,
            entries,
        })
    }

    /// Write header and body, creating parent directories if needed.
    pub(crate) fn flush(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut bytes = Vec::with_capacity(HEADER_BYTES + self.body.len());
        bytes.extend_from_slice(&(self.width.bytes() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.entries.to_le_bytes());
        bytes.extend_from_slice(&self.body);
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Store `value` for `owner`, growing the body as needed.
    pub(crate) fn set(&mut self, owner: usize, value: u32) -> Result<(), StorageError> {
        let slot = (owner <= MAX_OWNER)
            .then(|| self.slot(owner))
            .flatten()
            .ok_or(StorageError::OwnerOutOfRange {
                owner,
                limit: MAX_OWNER,
            })?;
        if self.body.len() < slot.end {
            self.body.resize(slot.end, 0);
        }

        if self.get(owner) == 0 && value != 0 {
            self.entries += 1;
        }

        let bytes = &mut self.body[slot];
        match self.width {
            EntryWidth::Short => bytes.copy_from_slice(&(value as u16).to_le_bytes()),
            EntryWidth::Int => bytes.copy_from_slice(&value.to_le_bytes()),
        }
        Ok(())
    }

    /// Stored value for `owner`; zero when never set.
    pub(crate) fn get(&self, owner: usize) -> u32 {
        let Some(slot) = self.slot(owner).and_then(|range| self.body.get(range)) else {
            return 0;
        };
        match self.width {
            EntryWidth::Short => u16::from_le_bytes([slot[0], slot[1]]) as u32,
            EntryWidth::Int => read_u32(slot),
        }
    }

    /// Byte range of `owner`'s entry, if it is addressable at all.
    fn slot(&self, owner: usize) -> Option<Range<usize>> {
        let stride = self.width.bytes();
        let start = owner.checked_mul(stride)?;
        let end = start.checked_add(stride)?;
        Some(start..end)
    }

    pub(crate) fn width(&self) -> EntryWidth {
        self.width
    }

    /// Number of owners that have been assigned a value.
    pub(crate) fn entries(&self) -> u32 {
        self.entries
    }

    /// Bytes held by the body.
    pub(crate) fn capacity(&self) -> usize {
        self.body.len()
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Path of the index file for a store.
pub(crate) fn index_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(name)
}

/// Path of the unique-value table for a store.
pub(crate) fn values_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}_values.json"))
}
