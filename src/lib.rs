//! # Docparser client for Rust
//!
//! Rust client for the [Docparser](https://docparser.com) document parsing
//! API. List parsers, upload documents (local file, base64, or URL fetch),
//! and retrieve parsed results -- all with idiomatic async Rust.
//!
//! Every method maps 1:1 to a remote endpoint: the client shapes the payload,
//! issues a single authenticated request, and returns the decoded response or
//! a typed [`DocparserError`]. There are no retries, no background work, and
//! no state beyond the credentials and an in-memory parser-label lookup table.
//!
//! ## Quick start
//!
//! ```no_run
//! use docparser::Client;
//!
//! #[tokio::main]
//! async fn main() -> docparser::Result<()> {
//!     // Verifies the key against the service before returning.
//!     let client = Client::login("your_api_key").await?;
//!
//!     for parser in client.list_parsers().await? {
//!         println!("{} ({})", parser.label, parser.id);
//!     }
//!
//!     let document_id = client
//!         .upload_by_path("~/invoices/march.pdf", "invoice-parser", None)
//!         .await?;
//!
//!     let result = client
//!         .get_one_result("invoice-parser", &document_id, false)
//!         .await?;
//!     println!("{result:#}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Builder pattern
//!
//! ```no_run
//! use docparser::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> docparser::Result<()> {
//! // Reads DOCPARSER_API_KEY from the environment when no key is given.
//! let client = ClientBuilder::new()
//!     .base_url("https://custom.example.com/v1")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod errors;
mod models;

pub use client::{Client, ClientBuilder};
pub use errors::{DocparserError, Result};
pub use models::{ListMode, Parser, ResultsQuery, SortBy, SortOrder};
