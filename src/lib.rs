//! # shoptag-listings
//!
//! Batch product-listing generator — upload a folder of product photos to the
//! ShopTag.ai keyword API and collect the generated title, description, and
//! keywords for each image into a single CSV file.
//!
//! ## Quick Start
//!
//! The flow is scan → tag → write:
//!
//! ```rust,no_run
//! use shoptag_listings::config::Config;
//! use shoptag_listings::pipeline::{build_service, collect_images, process_images};
//! use shoptag_listings::table::write_listings;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Request options (endpoint, language, keyword count)
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     let service = build_service(&config, "my-api-token")?;
//!     let images = collect_images(Path::new("./products"))?;
//!
//!     let report = process_images(&images, &service).await;
//!     for failure in &report.failures {
//!         eprintln!("Skipped {}: {}", failure.file_name, failure.error);
//!     }
//!
//!     write_listings(Path::new("listings.csv"), &report.rows)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```text
//! File Name,Title,Description,Keywords
//! shoe.jpg,Running Shoe,Comfortable running shoe,"shoe, running, sport"
//! ```
//!
//! ## Modules
//!
//! - [`config`] — API options and config file loading/saving
//! - [`pipeline`] — Directory scanning and the sequential tagging loop
//! - [`table`] — CSV output
//! - [`tagging`] — Tagging service trait, ShopTag client, and response decoding

pub mod config;
pub mod pipeline;
pub mod table;
pub mod tagging;
