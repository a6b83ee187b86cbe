//! Pawdesk library
//!
//! Exposes the record-management modules for the binary and for
//! integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod relay;
pub mod retry;
pub mod server;
pub mod store;
pub mod sync;
