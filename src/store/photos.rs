//! Local photo attachment store
//!
//! Photos are held exclusively in local device storage as a namespaced
//! JSON file (`photos.json`), payloads base64-encoded inline. Uploads are
//! capped per owning record in both count and raw size; after upload only
//! the description may change. Deleting a customer record deletes its
//! photos in bulk.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::data::Photo;

/// Maximum number of photos per owning customer record
pub const MAX_PHOTOS_PER_CUSTOMER: usize = 10;

/// Maximum raw (decoded) size of a single photo in bytes
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Errors from photo store operations
#[derive(Debug, Error)]
pub enum PhotoError {
    /// Underlying file I/O failed
    #[error("Photo store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but is not valid JSON
    #[error("Photo store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The upload exceeds the per-photo size cap
    #[error("Photo is {size} bytes, over the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The owning record already holds the maximum number of photos
    #[error("Customer {customer_id} already has {limit} photos")]
    TooMany { customer_id: String, limit: usize },
}

/// Flat-file store for photo attachments.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    path: PathBuf,
}

impl PhotoStore {
    /// Creates a store at the default location
    /// (`~/.local/share/pawdesk/photos.json` on Linux).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "pawdesk")?;
        let path = project_dirs.data_dir().join("photos.json");
        Some(Self { path })
    }

    /// Creates a store backed by a specific file.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Stores a new photo for a customer, enforcing the count and size
    /// caps. The raw bytes are base64-encoded for storage.
    pub fn add(
        &self,
        customer_id: &str,
        filename: &str,
        bytes: &[u8],
        description: Option<String>,
    ) -> Result<Photo, PhotoError> {
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(PhotoError::TooLarge {
                size: bytes.len(),
                limit: MAX_PHOTO_BYTES,
            });
        }

        let mut photos = self.load()?;
        let count = photos
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .count();
        if count >= MAX_PHOTOS_PER_CUSTOMER {
            return Err(PhotoError::TooMany {
                customer_id: customer_id.to_string(),
                limit: MAX_PHOTOS_PER_CUSTOMER,
            });
        }

        let photo = Photo {
            id: Uuid::new_v4(),
            customer_id: customer_id.to_string(),
            filename: filename.to_string(),
            data: BASE64.encode(bytes),
            size_bytes: bytes.len(),
            uploaded_at: Utc::now(),
            description,
        };

        photos.push(photo.clone());
        self.save(&photos)?;
        Ok(photo)
    }

    /// Returns all photos belonging to a customer, in upload order.
    pub fn list_for(&self, customer_id: &str) -> Result<Vec<Photo>, PhotoError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| p.customer_id == customer_id)
            .collect())
    }

    /// Looks up one photo by id.
    pub fn get(&self, photo_id: &Uuid) -> Result<Option<Photo>, PhotoError> {
        Ok(self.load()?.into_iter().find(|p| p.id == *photo_id))
    }

    /// Updates a photo's description, the only mutable field.
    /// Returns `None` for an unknown photo id.
    pub fn update_description(
        &self,
        photo_id: &Uuid,
        description: Option<String>,
    ) -> Result<Option<Photo>, PhotoError> {
        let mut photos = self.load()?;
        let Some(slot) = photos.iter_mut().find(|p| p.id == *photo_id) else {
            return Ok(None);
        };
        slot.description = description;
        let updated = slot.clone();
        self.save(&photos)?;
        Ok(Some(updated))
    }

    /// Deletes one photo. Returns whether anything was removed.
    pub fn delete(&self, photo_id: &Uuid) -> Result<bool, PhotoError> {
        let mut photos = self.load()?;
        let before = photos.len();
        photos.retain(|p| p.id != *photo_id);
        let removed = photos.len() != before;
        if removed {
            self.save(&photos)?;
        }
        Ok(removed)
    }

    /// Deletes every photo owned by a customer record (used when the
    /// record itself is deleted). Returns how many were removed.
    pub fn delete_for_customer(&self, customer_id: &str) -> Result<usize, PhotoError> {
        let mut photos = self.load()?;
        let before = photos.len();
        photos.retain(|p| p.customer_id != customer_id);
        let removed = before - photos.len();
        if removed > 0 {
            self.save(&photos)?;
        }
        Ok(removed)
    }

    /// Decodes a stored photo's payload back into raw bytes.
    pub fn decode(photo: &Photo) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&photo.data)
    }

    fn load(&self) -> Result<Vec<Photo>, PhotoError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, photos: &[Photo]) -> Result<(), PhotoError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(photos)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
