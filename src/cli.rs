//! Command-line interface parsing for Pawdesk
//!
//! Defines the clap command tree plus the small pure helpers behind it:
//! parsing status/category filter arguments, matching records against
//! list filters, and applying `edit` field flags to a record.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::data::{Customer, CustomerStatus, PetCategory};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified status is not recognized
    #[error("Invalid status: '{0}'. Valid statuses: active, inactive")]
    InvalidStatus(String),

    /// The specified pet category is not recognized
    #[error("Invalid category: '{0}'. Valid categories: dog, cat, bird, rabbit, other")]
    InvalidCategory(String),

    /// `edit` was invoked without any field flags
    #[error("No fields to edit; pass at least one field flag (e.g. --notes)")]
    NoEditFields,
}

/// Pawdesk - manage pet day-care customer records
#[derive(Parser, Debug)]
#[command(name = "pawdesk")]
#[command(about = "Pet day-care customer records, synced from a shared spreadsheet")]
#[command(version)]
pub struct Cli {
    /// Path to config file (default: $XDG_CONFIG_HOME/pawdesk/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List customer records, optionally filtered
    List {
        /// Only records with this status (active, inactive)
        #[arg(long)]
        status: Option<String>,
        /// Only records with this pet category (dog, cat, bird, rabbit, other)
        #[arg(long)]
        category: Option<String>,
        /// Substring match against owner name, pet name, and email
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one record in full, including its photo attachments
    Show {
        /// Customer id, e.g. C001
        id: String,
    },
    /// Edit a record's fields and write the change through
    Edit {
        /// Customer id, e.g. C001
        id: String,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a record from the local cache (and its photos)
    Delete {
        /// Customer id, e.g. C001
        id: String,
    },
    /// Fetch the latest records from the remote sheet into the cache
    Sync,
    /// Run the REST API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Forward one form submission to the backend (values in form order)
    Relay {
        /// Submission values: timestamp owner reading email phone address
        /// pet-name category age weight notes
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Manage photo attachments
    Photo {
        #[command(subcommand)]
        command: PhotoCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PhotoCommand {
    /// Attach an image file to a customer record
    Add {
        /// Owning customer id, e.g. C001
        customer_id: String,
        /// Path to the image file
        path: PathBuf,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List a customer's photos
    List {
        /// Owning customer id, e.g. C001
        customer_id: String,
    },
    /// Write a photo's decoded image bytes back out to a file
    Export {
        /// Photo id (uuid)
        photo_id: String,
        /// Output file (default: the stored filename, in the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Set a photo's description (the only mutable field)
    Describe {
        /// Photo id (uuid)
        photo_id: String,
        /// New description; empty string clears it
        description: String,
    },
    /// Remove one photo
    Rm {
        /// Photo id (uuid)
        photo_id: String,
    },
}

/// Field flags shared by the `edit` subcommand
#[derive(Args, Debug, Default)]
pub struct EditFields {
    #[arg(long)]
    pub owner_name: Option<String>,
    #[arg(long)]
    pub owner_reading: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub pet_name: Option<String>,
    /// dog, cat, bird, rabbit, other
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
    /// ISO date, e.g. 2026-02-01
    #[arg(long)]
    pub last_visit: Option<String>,
    /// active or inactive
    #[arg(long)]
    pub status: Option<String>,
}

impl EditFields {
    /// Applies the given flags to a record in place.
    ///
    /// Errors when no flag was passed at all or when status/category
    /// values don't parse.
    pub fn apply(&self, customer: &mut Customer) -> Result<(), CliError> {
        if self.is_empty() {
            return Err(CliError::NoEditFields);
        }

        if let Some(v) = &self.owner_name {
            customer.owner_name = v.clone();
        }
        if let Some(v) = &self.owner_reading {
            customer.owner_reading = v.clone();
        }
        if let Some(v) = &self.email {
            customer.email = v.clone();
        }
        if let Some(v) = &self.phone {
            customer.phone = v.clone();
        }
        if let Some(v) = &self.address {
            customer.address = v.clone();
        }
        if let Some(v) = &self.pet_name {
            customer.pet_name = v.clone();
        }
        if let Some(v) = &self.category {
            customer.pet_category = parse_category_arg(v)?;
        }
        if let Some(v) = self.age {
            customer.age = v;
        }
        if let Some(v) = self.weight {
            customer.weight = v;
        }
        if let Some(v) = &self.notes {
            customer.notes = v.clone();
        }
        if let Some(v) = &self.last_visit {
            customer.last_visit = if v.is_empty() { None } else { Some(v.clone()) };
        }
        if let Some(v) = &self.status {
            customer.status = parse_status_arg(v)?;
        }

        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.owner_name.is_none()
            && self.owner_reading.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.pet_name.is_none()
            && self.category.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.notes.is_none()
            && self.last_visit.is_none()
            && self.status.is_none()
    }
}

/// Record filter built from `list` arguments
#[derive(Debug, Default)]
pub struct ListFilter {
    pub status: Option<CustomerStatus>,
    pub category: Option<PetCategory>,
    pub query: Option<String>,
}

impl ListFilter {
    /// Builds a filter from raw CLI strings, validating enum values.
    pub fn from_args(
        status: Option<&str>,
        category: Option<&str>,
        query: Option<&str>,
    ) -> Result<Self, CliError> {
        Ok(Self {
            status: status.map(parse_status_arg).transpose()?,
            category: category.map(parse_category_arg).transpose()?,
            query: query.map(|q| q.to_lowercase()),
        })
    }

    /// Whether a record passes every configured filter.
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(status) = self.status {
            if customer.status != status {
                return false;
            }
        }
        if let Some(category) = self.category {
            if customer.pet_category != category {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let haystack = format!(
                "{} {} {}",
                customer.owner_name, customer.pet_name, customer.email
            )
            .to_lowercase();
            if !haystack.contains(query) {
                return false;
            }
        }
        true
    }
}

/// Parses a status argument into a CustomerStatus.
pub fn parse_status_arg(s: &str) -> Result<CustomerStatus, CliError> {
    match s.trim().to_lowercase().as_str() {
        "active" => Ok(CustomerStatus::Active),
        "inactive" => Ok(CustomerStatus::Inactive),
        other => Err(CliError::InvalidStatus(other.to_string())),
    }
}

/// Parses a category argument into a PetCategory.
///
/// Unlike sheet-cell parsing (which defaults to `Other`), an explicit
/// CLI argument must name a valid category.
pub fn parse_category_arg(s: &str) -> Result<PetCategory, CliError> {
    match s.trim().to_lowercase().as_str() {
        "dog" => Ok(PetCategory::Dog),
        "cat" => Ok(PetCategory::Cat),
        "bird" => Ok(PetCategory::Bird),
        "rabbit" => Ok(PetCategory::Rabbit),
        "other" => Ok(PetCategory::Other),
        invalid => Err(CliError::InvalidCategory(invalid.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer() -> Customer {
        Customer {
            id: "C001".to_string(),
            owner_name: "Yamada Taro".to_string(),
            owner_reading: String::new(),
            email: "taro@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
            pet_name: "Pochi".to_string(),
            pet_category: PetCategory::Dog,
            age: 3,
            weight: 8.5,
            notes: String::new(),
            created_date: "2026-01-15".to_string(),
            last_visit: None,
            status: CustomerStatus::Active,
        }
    }

    #[test]
    fn test_parse_status_arg_valid() {
        assert_eq!(parse_status_arg("active").unwrap(), CustomerStatus::Active);
        assert_eq!(parse_status_arg("INACTIVE").unwrap(), CustomerStatus::Inactive);
    }

    #[test]
    fn test_parse_status_arg_invalid() {
        let err = parse_status_arg("archived").unwrap_err();
        assert!(err.to_string().contains("Invalid status"));
    }

    #[test]
    fn test_parse_category_arg_valid() {
        assert_eq!(parse_category_arg("dog").unwrap(), PetCategory::Dog);
        assert_eq!(parse_category_arg(" Rabbit ").unwrap(), PetCategory::Rabbit);
        assert_eq!(parse_category_arg("other").unwrap(), PetCategory::Other);
    }

    #[test]
    fn test_parse_category_arg_invalid() {
        // Explicit CLI arguments must be valid, no silent Other fallback.
        assert!(parse_category_arg("hamster").is_err());
    }

    #[test]
    fn test_list_filter_status() {
        let filter = ListFilter::from_args(Some("inactive"), None, None).unwrap();
        let mut customer = sample_customer();
        assert!(!filter.matches(&customer));

        customer.status = CustomerStatus::Inactive;
        assert!(filter.matches(&customer));
    }

    #[test]
    fn test_list_filter_category() {
        let filter = ListFilter::from_args(None, Some("cat"), None).unwrap();
        assert!(!filter.matches(&sample_customer()));

        let filter = ListFilter::from_args(None, Some("dog"), None).unwrap();
        assert!(filter.matches(&sample_customer()));
    }

    #[test]
    fn test_list_filter_query_is_case_insensitive() {
        let filter = ListFilter::from_args(None, None, Some("POCHI")).unwrap();
        assert!(filter.matches(&sample_customer()));

        let filter = ListFilter::from_args(None, None, Some("taro@")).unwrap();
        assert!(filter.matches(&sample_customer()));

        let filter = ListFilter::from_args(None, None, Some("hachiko")).unwrap();
        assert!(!filter.matches(&sample_customer()));
    }

    #[test]
    fn test_list_filter_combines_conditions() {
        let filter = ListFilter::from_args(Some("active"), Some("dog"), Some("pochi")).unwrap();
        assert!(filter.matches(&sample_customer()));

        let filter = ListFilter::from_args(Some("inactive"), Some("dog"), Some("pochi")).unwrap();
        assert!(!filter.matches(&sample_customer()));
    }

    #[test]
    fn test_edit_fields_apply() {
        let mut customer = sample_customer();
        let fields = EditFields {
            notes: Some("Allergic to chicken".to_string()),
            weight: Some(9.2),
            status: Some("inactive".to_string()),
            ..Default::default()
        };

        fields.apply(&mut customer).unwrap();

        assert_eq!(customer.notes, "Allergic to chicken");
        assert!((customer.weight - 9.2).abs() < f64::EPSILON);
        assert_eq!(customer.status, CustomerStatus::Inactive);
        // Untouched fields keep their values.
        assert_eq!(customer.owner_name, "Yamada Taro");
    }

    #[test]
    fn test_edit_fields_empty_is_error() {
        let mut customer = sample_customer();
        let result = EditFields::default().apply(&mut customer);
        assert!(matches!(result, Err(CliError::NoEditFields)));
    }

    #[test]
    fn test_edit_fields_invalid_status_is_error() {
        let mut customer = sample_customer();
        let fields = EditFields {
            status: Some("frozen".to_string()),
            ..Default::default()
        };
        assert!(fields.apply(&mut customer).is_err());
    }

    #[test]
    fn test_edit_fields_empty_last_visit_clears() {
        let mut customer = sample_customer();
        customer.last_visit = Some("2026-02-01".to_string());

        let fields = EditFields {
            last_visit: Some(String::new()),
            ..Default::default()
        };
        fields.apply(&mut customer).unwrap();

        assert!(customer.last_visit.is_none());
    }

    #[test]
    fn test_cli_parse_list_with_filters() {
        let cli = Cli::parse_from([
            "pawdesk", "list", "--status", "active", "--category", "dog", "--query", "pochi",
        ]);
        match cli.command {
            Command::List {
                status,
                category,
                query,
            } => {
                assert_eq!(status.as_deref(), Some("active"));
                assert_eq!(category.as_deref(), Some("dog"));
                assert_eq!(query.as_deref(), Some("pochi"));
            }
            other => panic!("Expected List, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_edit_flags() {
        let cli = Cli::parse_from(["pawdesk", "edit", "C001", "--notes", "hello", "--age", "4"]);
        match cli.command {
            Command::Edit { id, fields } => {
                assert_eq!(id, "C001");
                assert_eq!(fields.notes.as_deref(), Some("hello"));
                assert_eq!(fields.age, Some(4));
            }
            other => panic!("Expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_relay_requires_values() {
        assert!(Cli::try_parse_from(["pawdesk", "relay"]).is_err());

        let cli = Cli::parse_from(["pawdesk", "relay", "ts", "Owner", "", "", "", "", "Pochi"]);
        match cli.command {
            Command::Relay { values } => assert_eq!(values.len(), 7),
            other => panic!("Expected Relay, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_photo_add() {
        let cli = Cli::parse_from([
            "pawdesk", "photo", "add", "C001", "/tmp/pochi.jpg", "--description", "At the park",
        ]);
        match cli.command {
            Command::Photo {
                command: PhotoCommand::Add {
                    customer_id,
                    path,
                    description,
                },
            } => {
                assert_eq!(customer_id, "C001");
                assert_eq!(path, PathBuf::from("/tmp/pochi.jpg"));
                assert_eq!(description.as_deref(), Some("At the park"));
            }
            other => panic!("Expected Photo Add, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_photo_export() {
        let cli = Cli::parse_from([
            "pawdesk",
            "photo",
            "export",
            "3e0f2b1a-0000-0000-0000-000000000000",
            "--output",
            "/tmp/out.jpg",
        ]);
        match cli.command {
            Command::Photo {
                command: PhotoCommand::Export { photo_id, output },
            } => {
                assert_eq!(photo_id, "3e0f2b1a-0000-0000-0000-000000000000");
                assert_eq!(output, Some(PathBuf::from("/tmp/out.jpg")));
            }
            other => panic!("Expected Photo Export, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_global_config_flag() {
        let cli = Cli::parse_from(["pawdesk", "sync", "--config", "/tmp/pawdesk.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pawdesk.json")));
        assert!(matches!(cli.command, Command::Sync));
    }
}
