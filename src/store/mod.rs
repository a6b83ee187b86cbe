//! Local persistent stores
//!
//! The record store is the canonical flat-file backend the REST API
//! serves; the photo store holds per-customer attachments in local
//! device storage. Both persist as single JSON files under the XDG
//! data directory.

pub mod photos;
pub mod records;

pub use photos::{PhotoError, PhotoStore};
pub use records::{RecordStore, StoreError};
