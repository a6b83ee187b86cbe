//! Core data models for Pawdesk
//!
//! This module contains the data types used throughout the application
//! for representing customers, their pets, and photo attachments.

pub mod rows;
pub mod sheets;

pub use rows::parse_grid;
pub use sheets::{SheetsClient, SheetsError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One customer/pet entry.
///
/// The `id` is positionally derived from row order in the source sheet
/// (`row N → C00N`) and is NOT a stable durable key: if the upstream sheet
/// is reordered, identifiers are silently reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Sequence-derived identifier, formatted `C%03d`
    pub id: String,
    /// Owner's name (required for a row to be kept)
    pub owner_name: String,
    /// Phonetic reading of the owner's name
    pub owner_reading: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Postal address
    pub address: String,
    /// Pet's name (required for a row to be kept)
    pub pet_name: String,
    /// Pet category, defaults to `Other` for unrecognized values
    pub pet_category: PetCategory,
    /// Pet age in years; unparsable values default to zero
    pub age: u32,
    /// Pet weight in kilograms; unparsable values default to zero
    pub weight: f64,
    /// Free-text notes
    pub notes: String,
    /// Creation date (ISO date-only string)
    pub created_date: String,
    /// Date of the last visit, if any
    pub last_visit: Option<String>,
    /// Whether the customer is currently active
    pub status: CustomerStatus,
}

/// Fixed set of pet categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetCategory {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

impl PetCategory {
    /// Parses a category cell value; anything unrecognized maps to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dog" => PetCategory::Dog,
            "cat" => PetCategory::Cat,
            "bird" => PetCategory::Bird,
            "rabbit" => PetCategory::Rabbit,
            _ => PetCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PetCategory::Dog => "dog",
            PetCategory::Cat => "cat",
            PetCategory::Bird => "bird",
            PetCategory::Rabbit => "rabbit",
            PetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for PetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incoming customer data without an identifier.
///
/// Used by the record store on create/update and by the intake endpoint;
/// the store assigns the id and stamps the creation date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub owner_name: String,
    #[serde(default)]
    pub owner_reading: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub pet_name: String,
    #[serde(default)]
    pub pet_category: PetCategory,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub last_visit: Option<String>,
}

impl Default for PetCategory {
    fn default() -> Self {
        PetCategory::Other
    }
}

impl CustomerDraft {
    /// Turns the draft into a full record with the given id.
    pub fn into_customer(self, id: String, created_date: String) -> Customer {
        Customer {
            id,
            owner_name: self.owner_name,
            owner_reading: self.owner_reading,
            email: self.email,
            phone: self.phone,
            address: self.address,
            pet_name: self.pet_name,
            pet_category: self.pet_category,
            age: self.age,
            weight: self.weight,
            notes: self.notes,
            created_date,
            last_visit: self.last_visit,
            status: CustomerStatus::Active,
        }
    }
}

/// A locally stored photo attachment.
///
/// Photos live exclusively in local device storage; there is no
/// server-side copy. Only the description is ever mutated after upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique photo identifier
    pub id: Uuid,
    /// Identifier of the owning customer record
    pub customer_id: String,
    /// Original filename of the upload
    pub filename: String,
    /// Base64-encoded image payload
    pub data: String,
    /// Size of the raw (decoded) image in bytes
    pub size_bytes: usize,
    /// When the photo was uploaded
    pub uploaded_at: DateTime<Utc>,
    /// Optional free-text description
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> Customer {
        Customer {
            id: "C001".to_string(),
            owner_name: "Yamada Taro".to_string(),
            owner_reading: "yamada tarou".to_string(),
            email: "taro@example.com".to_string(),
            phone: "090-1234-5678".to_string(),
            address: "1-2-3 Shibuya".to_string(),
            pet_name: "Pochi".to_string(),
            pet_category: PetCategory::Dog,
            age: 3,
            weight: 8.5,
            notes: "Friendly".to_string(),
            created_date: "2026-01-15".to_string(),
            last_visit: Some("2026-02-01".to_string()),
            status: CustomerStatus::Active,
        }
    }

    #[test]
    fn test_pet_category_parse_known_values() {
        assert_eq!(PetCategory::parse("dog"), PetCategory::Dog);
        assert_eq!(PetCategory::parse("Cat"), PetCategory::Cat);
        assert_eq!(PetCategory::parse(" bird "), PetCategory::Bird);
        assert_eq!(PetCategory::parse("RABBIT"), PetCategory::Rabbit);
    }

    #[test]
    fn test_pet_category_parse_unknown_defaults_to_other() {
        assert_eq!(PetCategory::parse("hamster"), PetCategory::Other);
        assert_eq!(PetCategory::parse(""), PetCategory::Other);
    }

    #[test]
    fn test_customer_serialization_roundtrip() {
        let customer = sample_customer();

        let json = serde_json::to_string(&customer).expect("Failed to serialize Customer");
        let deserialized: Customer =
            serde_json::from_str(&json).expect("Failed to deserialize Customer");

        assert_eq!(deserialized, customer);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&CustomerStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
    }

    #[test]
    fn test_draft_into_customer_defaults_to_active() {
        let draft = CustomerDraft {
            owner_name: "Sato Hanako".to_string(),
            pet_name: "Mike".to_string(),
            pet_category: PetCategory::Cat,
            ..Default::default()
        };

        let customer = draft.into_customer("C002".to_string(), "2026-03-01".to_string());

        assert_eq!(customer.id, "C002");
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.created_date, "2026-03-01");
        assert_eq!(customer.age, 0);
        assert!((customer.weight - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_photo_serialization_roundtrip() {
        let photo = Photo {
            id: Uuid::new_v4(),
            customer_id: "C001".to_string(),
            filename: "pochi.jpg".to_string(),
            data: "aGVsbG8=".to_string(),
            size_bytes: 5,
            uploaded_at: Utc::now(),
            description: Some("At the park".to_string()),
        };

        let json = serde_json::to_string(&photo).expect("Failed to serialize Photo");
        let deserialized: Photo = serde_json::from_str(&json).expect("Failed to deserialize Photo");

        assert_eq!(deserialized, photo);
    }
}
