//! Pawdesk - pet day-care customer records
//!
//! A command-line tool that fetches customer/pet records from a shared
//! spreadsheet with cache fallback, manages local photo attachments, and
//! can run the file-backed REST API the intake-form relay posts to.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use pawdesk::cache::CacheManager;
use pawdesk::cli::{Cli, Command, EditFields, ListFilter, PhotoCommand};
use pawdesk::config::Config;
use pawdesk::data::{Customer, Photo};
use pawdesk::relay::forward_submission;
use pawdesk::retry::RateLimiter;
use pawdesk::server;
use pawdesk::store::{PhotoStore, RecordStore};
use pawdesk::sync::RecordService;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pawdesk=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::List {
            status,
            category,
            query,
        } => {
            let filter =
                ListFilter::from_args(status.as_deref(), category.as_deref(), query.as_deref())?;
            run_list(&config, &filter).await?;
        }
        Command::Show { id } => run_show(&config, &id).await?,
        Command::Edit { id, fields } => run_edit(&config, &id, &fields).await?,
        Command::Delete { id } => run_delete(&config, &id).await?,
        Command::Sync => run_sync(&config).await?,
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            let store = RecordStore::new().ok_or("cannot determine data directory")?;
            server::run(&config, store).await?;
        }
        Command::Relay { values } => {
            let client = reqwest::Client::new();
            let created = forward_submission(
                &client,
                &config.server.backend_url,
                &config.server.api_token,
                &values,
            )
            .await?;
            println!("Relayed submission; created record {}", created.id);
        }
        Command::Photo { command } => run_photo(command)?,
    }

    Ok(())
}

/// Builds the reconciler with the shared rate limiter injected.
fn record_service(config: &Config) -> Result<RecordService, Box<dyn std::error::Error>> {
    let cache = CacheManager::new().ok_or("cannot determine cache directory")?;
    let limiter = Arc::new(RateLimiter::new());
    Ok(RecordService::new(config.sheets_client(), cache, limiter))
}

fn photo_store() -> Result<PhotoStore, Box<dyn std::error::Error>> {
    Ok(PhotoStore::new().ok_or("cannot determine data directory")?)
}

async fn run_list(config: &Config, filter: &ListFilter) -> Result<(), Box<dyn std::error::Error>> {
    let service = record_service(config)?;
    let records = service.fetch_records().await;
    let matched: Vec<&Customer> = records.iter().filter(|r| filter.matches(r)).collect();

    if matched.is_empty() {
        println!("No records.");
        return Ok(());
    }

    println!(
        "{:<6} {:<20} {:<14} {:<8} {:<8}",
        "ID", "OWNER", "PET", "KIND", "STATUS"
    );
    for record in &matched {
        println!(
            "{:<6} {:<20} {:<14} {:<8} {:<8}",
            record.id, record.owner_name, record.pet_name, record.pet_category, record.status
        );
    }
    println!("{} record(s)", matched.len());
    Ok(())
}

async fn run_show(config: &Config, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let service = record_service(config)?;
    let Some(record) = service.get_record(id).await else {
        println!("No record with id {}", id);
        return Ok(());
    };

    print_record(&record);

    let photos = photo_store()?.list_for(id)?;
    if photos.is_empty() {
        println!("Photos:      none");
    } else {
        println!("Photos:");
        for photo in &photos {
            print_photo_line(photo);
        }
    }
    Ok(())
}

async fn run_edit(
    config: &Config,
    id: &str,
    fields: &EditFields,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = record_service(config)?;
    let Some(mut record) = service.get_record(id).await else {
        return Err(format!("No record with id {}", id).into());
    };

    fields.apply(&mut record)?;
    service.update_record(&record).await?;
    println!("Updated {}", record.id);
    Ok(())
}

async fn run_delete(config: &Config, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let service = record_service(config)?;
    let removed = service.delete_record(id)?;
    if !removed {
        println!("No record with id {}", id);
        return Ok(());
    }

    let photos_removed = photo_store()?.delete_for_customer(id)?;
    println!("Deleted {} ({} photo(s) removed)", id, photos_removed);
    println!("Note: the remote sheet row is kept; removal is local only.");
    Ok(())
}

async fn run_sync(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if !config.has_sheet() {
        println!("No sheet configured; showing cached records only.");
    }
    let service = record_service(config)?;
    let records = service.fetch_records().await;
    println!("{} record(s) available", records.len());
    Ok(())
}

fn run_photo(command: PhotoCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = photo_store()?;
    match command {
        PhotoCommand::Add {
            customer_id,
            path,
            description,
        } => {
            let bytes = std::fs::read(&path)?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());
            let photo = store.add(&customer_id, &filename, &bytes, description)?;
            println!("Added photo {} ({} bytes)", photo.id, photo.size_bytes);
        }
        PhotoCommand::List { customer_id } => {
            let photos = store.list_for(&customer_id)?;
            if photos.is_empty() {
                println!("No photos for {}", customer_id);
            } else {
                for photo in &photos {
                    print_photo_line(photo);
                }
            }
        }
        PhotoCommand::Export { photo_id, output } => {
            let id = Uuid::parse_str(&photo_id)?;
            let Some(photo) = store.get(&id)? else {
                println!("No photo with id {}", photo_id);
                return Ok(());
            };
            let bytes = PhotoStore::decode(&photo)?;
            let target = output.unwrap_or_else(|| PathBuf::from(&photo.filename));
            std::fs::write(&target, bytes)?;
            println!("Wrote {} bytes to {}", photo.size_bytes, target.display());
        }
        PhotoCommand::Describe {
            photo_id,
            description,
        } => {
            let id = Uuid::parse_str(&photo_id)?;
            let description = if description.is_empty() {
                None
            } else {
                Some(description)
            };
            match store.update_description(&id, description)? {
                Some(photo) => println!("Updated description of {}", photo.id),
                None => println!("No photo with id {}", photo_id),
            }
        }
        PhotoCommand::Rm { photo_id } => {
            let id = Uuid::parse_str(&photo_id)?;
            if store.delete(&id)? {
                println!("Removed photo {}", photo_id);
            } else {
                println!("No photo with id {}", photo_id);
            }
        }
    }
    Ok(())
}

fn print_record(record: &Customer) {
    println!("ID:          {}", record.id);
    println!("Owner:       {} ({})", record.owner_name, record.owner_reading);
    println!("Email:       {}", record.email);
    println!("Phone:       {}", record.phone);
    println!("Address:     {}", record.address);
    println!("Pet:         {} ({})", record.pet_name, record.pet_category);
    println!("Age:         {}", record.age);
    println!("Weight:      {} kg", record.weight);
    println!("Status:      {}", record.status);
    println!("Created:     {}", record.created_date);
    println!(
        "Last visit:  {}",
        record.last_visit.as_deref().unwrap_or("-")
    );
    if !record.notes.is_empty() {
        println!("Notes:       {}", record.notes);
    }
}

fn print_photo_line(photo: &Photo) {
    println!(
        "  {}  {}  {} bytes  {}",
        photo.id,
        photo.filename,
        photo.size_bytes,
        photo.description.as_deref().unwrap_or("-")
    );
}
