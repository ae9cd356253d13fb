//! Core types and shared functionality for sorte.
//!
//! This crate provides:
//! - Persistent key-value store with a SQLite backend
//! - Two-tier page cache (durable tier plus a TTL-bounded overflow tier)
//! - Unified error types
//! - Configuration structures
//! - Lottery ticket generation

pub mod cache;
pub mod config;
pub mod error;
pub mod lottery;
pub mod store;

pub use cache::{PageCache, PageContent};
pub use config::AppConfig;
pub use error::Error;
pub use lottery::Lottery;
pub use store::FileStore;
