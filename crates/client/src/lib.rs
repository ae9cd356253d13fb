//! Client code for sorte.
//!
//! This crate provides the HTTP fetch pipeline and the cache-first download
//! orchestration over the sorte-core page cache.

pub mod download;
pub mod fetch;

pub use download::Downloader;
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
