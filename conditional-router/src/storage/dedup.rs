//! Bijective small-integer/string table.

use std::collections::HashMap;

use super::error::StorageError;

/// Width of the per-owner index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EntryWidth {
    /// 2-byte entries, up to 32767 distinct values.
    Short,
    /// 4-byte entries.
    Int,
}

impl EntryWidth {
    /// Bytes per owner in the index body.
    pub fn bytes(self) -> usize {
        match self {
            EntryWidth::Short => 2,
            EntryWidth::Int => 4,
        }
    }

    /// Largest number of distinct values an index of this width can address.
    ///
    /// The index stores `id + 1` so that zero marks an owner without a value.
    pub fn max_values(self) -> u32 {
        match self {
            EntryWidth::Short => i16::MAX as u32,
            EntryWidth::Int => i32::MAX as u32,
        }
    }

    pub(crate) fn from_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            2 => Some(EntryWidth::Short),
            4 => Some(EntryWidth::Int),
            _ => None,
        }
    }
}

/// Assigns a stable id to each distinct string, in insertion order.
///
/// Consecutive insertions of the same value (adjacent edges sharing a tag)
/// are answered from a one-entry memo without touching the map.
#[derive(Debug, Clone)]
pub struct DedupIndex {
    name: String,
    values: Vec<String>,
    ids: HashMap<String, u32>,
    last: Option<(String, u32)>,
    limit: u32,
}

impl DedupIndex {
    /// Create an empty index holding at most `limit` distinct values.
    pub fn new(name: impl Into<String>, limit: u32) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            ids: HashMap::new(),
            last: None,
            limit,
        }
    }

    /// Rebuild an index from a persisted value table.
    pub fn from_values(
        name: impl Into<String>,
        values: Vec<String>,
        limit: u32,
    ) -> Result<Self, StorageError> {
        let name = name.into();
        if values.len() > limit as usize {
            return Err(StorageError::Corrupt {
                name,
                reason: format!("{} values exceed the limit of {limit}", values.len()),
            });
        }

        let mut ids = HashMap::with_capacity(values.len());
        for (id, value) in values.iter().enumerate() {
            if ids.insert(value.clone(), id as u32).is_some() {
                return Err(StorageError::Corrupt {
                    name,
                    reason: format!("duplicate value '{value}'"),
                });
            }
        }

        Ok(Self {
            name,
            values,
            ids,
            last: None,
            limit,
        })
    }

    /// Return the id of `value`, assigning the next free id if it is new.
    pub fn put(&mut self, value: &str) -> Result<u32, StorageError> {
        if let Some((last, id)) = &self.last
            && last == value
        {
            return Ok(*id);
        }

        let id = match self.ids.get(value) {
            Some(&id) => id,
            None => {
                if self.values.len() >= self.limit as usize {
                    return Err(StorageError::CapacityExceeded {
                        name: self.name.clone(),
                        limit: self.limit,
                    });
                }
                let id = self.values.len() as u32;
                self.values.push(value.to_owned());
                self.ids.insert(value.to_owned(), id);
                id
            }
        };

        self.last = Some((value.to_owned(), id));
        Ok(id)
    }

    /// Look up the value for an id.
    pub fn get(&self, id: u32) -> Option<&str> {
        self.values.get(id as usize).map(String::as_str)
    }

    /// Look up the id of a value without inserting it.
    pub fn id_of(&self, value: &str) -> Option<u32> {
        self.ids.get(value).copied()
    }

    /// All values in id order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}
