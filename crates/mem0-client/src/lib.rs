//! Async client for the Mem0 platform API.
//!
//! ```no_run
//! # async fn demo() -> Result<(), mem0_client::ClientError> {
//! use mem0_client::{ClientOptions, MemoryClient};
//! use mem0_client::types::{MemoryOptions, SearchOptions};
//!
//! let client = MemoryClient::new(ClientOptions::new("m0-...")).await?;
//! let options = MemoryOptions { user_id: "alice".into(), ..Default::default() };
//! client.add("I love pizza", &options).await?;
//! let hits = client.search("food", &SearchOptions::from(options)).await?;
//! # let _ = hits;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::MemoryClient;
pub use config::{ClientOptions, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use mem0_types as types;
