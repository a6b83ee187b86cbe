//! File-backed customer record store
//!
//! Persists the canonical record list to a single JSON file
//! (`records.json` under the XDG data dir). This is the storage layer
//! behind the REST API: list/get/create/update/delete over customer
//! records, with required-field validation on writes.

use chrono::Utc;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::rows::format_id;
use crate::data::{Customer, CustomerDraft};

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but is not valid JSON
    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A required field was missing on a write (rejected operation)
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Flat-file store holding the canonical customer list.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Creates a store at the default location
    /// (`~/.local/share/pawdesk/records.json` on Linux).
    ///
    /// Returns `None` if the data directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "pawdesk")?;
        let path = project_dirs.data_dir().join("records.json");
        Some(Self { path })
    }

    /// Creates a store backed by a specific file (used in tests and by
    /// the server when a path is configured).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns all records. A missing store file is an empty list.
    pub fn list(&self) -> Result<Vec<Customer>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up a record by id; absent ids are `None`, not an error.
    pub fn get(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Creates a record from a draft, assigning the next sequential id
    /// and stamping today's date. Owner name and pet name are required.
    pub fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        validate(&draft)?;

        let mut records = self.list()?;
        let id = next_id(&records);
        let created_date = Utc::now().date_naive().to_string();
        let customer = draft.into_customer(id, created_date);

        records.push(customer.clone());
        self.save(&records)?;
        Ok(customer)
    }

    /// Replaces the stored record's fields with the draft's. The id,
    /// creation date, and status are preserved. Returns `None` for an
    /// unknown id.
    pub fn update(&self, id: &str, draft: CustomerDraft) -> Result<Option<Customer>, StoreError> {
        validate(&draft)?;

        let mut records = self.list()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        let mut updated = draft.into_customer(id.to_string(), slot.created_date.clone());
        updated.status = slot.status;
        *slot = updated.clone();

        self.save(&records)?;
        Ok(Some(updated))
    }

    /// Removes a record. Returns whether anything was deleted.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        if removed {
            self.save(&records)?;
        }
        Ok(removed)
    }

    fn save(&self, records: &[Customer]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn validate(draft: &CustomerDraft) -> Result<(), StoreError> {
    if draft.owner_name.trim().is_empty() {
        return Err(StoreError::MissingField("owner_name"));
    }
    if draft.pet_name.trim().is_empty() {
        return Err(StoreError::MissingField("pet_name"));
    }
    Ok(())
}

/// Next sequential id: one past the highest existing numeric suffix, so
/// deleting a record never causes id reuse within the surviving set.
fn next_id(records: &[Customer]) -> String {
    let max = records
        .iter()
        .filter_map(|r| r.id.strip_prefix('C'))
        .filter_map(|n| n.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format_id(max + 1)
}
