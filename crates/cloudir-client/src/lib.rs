//! # cloudir directory API client
//!
//! Thin HTTP plumbing shared by every resource and data source of the
//! cloudir provider.
//!
//! - [`DirectoryClient::do_request`] sends method + path + body and returns
//!   the raw response bytes or a classified [`ClientError`].
//! - [`ClientError::is_not_found`] separates "object already gone" from
//!   real failures.
//! - [`compose_id`] / [`split_id`] build and parse composite ids such as
//!   `"group:user"`.
//!
//! ## Example
//!
//! ```ignore
//! use cloudir_client::{ClientConfig, DirectoryClient};
//!
//! let client = DirectoryClient::new(ClientConfig::from_env()?)?;
//! let groups: Vec<serde_json::Value> = client.list_all("/api/v2/usergroups", None).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ids;

pub use client::{DirectoryClient, PAGE_LIMIT};
pub use config::ClientConfig;
pub use error::{is_not_found_message, ClientError, ClientResult};
pub use ids::{compose_id, path_segment, split_id};

pub use reqwest::Method;
