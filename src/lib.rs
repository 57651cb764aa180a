//! # Zenkly
//!
//! Zenkly is a command-line client for bulk administration of a Zendesk
//! account. It moves configuration objects between the account and local
//! files, so large collections can be edited, versioned and replayed instead
//! of being changed one at a time in the web UI.
//!
//! ## Features
//!
//! - **Export**: macros, triggers, automations and views to JSON or CSV
//! - **Bulk writes**: create or update every object in an exported file,
//!   with a per-object success/failure report
//! - **Help center**: back up categories, sections and articles, and map
//!   article ids between two backups
//! - **Themes**: import a theme archive and wait for the asynchronous job
//! - **Pacing**: one request per second across the whole process, with
//!   retry of 429/503 responses
//! - **Security**: passwords are never logged, credentials are only sent to
//!   the account's own host
//!
//! ## Architecture
//!
//! - [`config`] - Credential profiles in a TOML file with environment overrides
//! - [`error`] - Error taxonomy with message sanitization
//! - [`rate_limit`] - Process-wide request pacing
//! - [`client`] - Authenticated HTTP client and response classification
//! - [`paginator`] - Cursor pagination and progress reporting
//! - [`bulk`] - Batch create/update with partial-failure reporting
//! - [`export`] - JSON and flattened CSV serialization
//! - [`guide`] - Help center backup and article mapping
//! - [`theme`] - Theme import job submission and polling
//! - [`models`] - Resource descriptions and typed API payloads
//! - [`cli`] / [`commands`] - Argument parsing and command handlers
//!
//! ## Configuration
//!
//! Profiles live in `config.toml` under the platform config directory:
//!
//! ```toml
//! [default]
//! subdomain = "acme"
//! email = "agent@acme.com"
//! password = "..."
//! ```
//!
//! `ZENKLY_SUBDOMAIN`, `ZENKLY_EMAIL` and `ZENKLY_PASSWORD` override the
//! selected profile's values. `RUST_LOG` overrides the log filter
//! (e.g. `zenkly=debug`).
//!
//! ## Example
//!
//! ```ignore
//! use zenkly::client::ZendeskClient;
//! use zenkly::config::ProfileStore;
//! use zenkly::export::{ExportFormat, Exporter};
//! use zenkly::models::{ListFilter, Resource};
//! use zenkly::paginator::Silent;
//!
//! async fn example() -> Result<(), zenkly::error::ZenklyError> {
//!     let credentials = ProfileStore::default_location().load("default")?;
//!     let client = ZendeskClient::new(&credentials)?;
//!
//!     // Every active trigger, flattened to CSV
//!     let filter = ListFilter::new().with_active_only(true);
//!     let path = Exporter::new(&client)
//!         .export(
//!             Resource::Triggers,
//!             &filter,
//!             ExportFormat::Csv,
//!             ".".as_ref(),
//!             "triggers",
//!             &Silent,
//!         )
//!         .await?;
//!     println!("wrote {}", path.display());
//!
//!     Ok(())
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod bulk;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod guide;
pub mod models;
pub mod paginator;
pub mod rate_limit;
pub mod theme;
