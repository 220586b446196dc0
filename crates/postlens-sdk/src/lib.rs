//! # Postlens SDK
//!
//! Rust client for the Postlens extraction and analysis services.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use postlens_sdk::{PostlensClient, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PostlensClient::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!
//!     let file = SelectedFile::from_path("post.png").await?;
//!     let extraction = client.extract(&file).await?;
//!     let analysis = client.analyze(&extraction.extracted_text).await?;
//!     println!("{} ({})", analysis.summary, analysis.sentiment);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{PostlensClient, PostlensClientBuilder};
pub use error::{PostlensError, Result};
pub use models::*;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
