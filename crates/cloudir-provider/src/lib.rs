//! # cloudir provider
//!
//! Resources and data sources that map declarative configuration onto the
//! cloudir directory API.
//!
//! ## Resources
//!
//! Users, user/system/policy groups, group memberships and associations,
//! device policies, password policies, MDM configuration, authentication
//! policies and bindings, applications, commands, RADIUS servers, IP lists
//! and the organization MFA settings.
//!
//! ## Example
//!
//! ```ignore
//! use cloudir_provider::{Provider, ProviderSettings};
//! use serde_json::json;
//!
//! let mut provider = Provider::new();
//! provider.configure(&ProviderSettings::default())?;
//!
//! let config = json!({"name": "engineering"});
//! let state = provider
//!     .apply("cloudir_user_group", None, config.as_object())
//!     .await?;
//! ```

pub mod data;
pub mod data_sources;
pub mod error;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod traits;

pub use data::{ResourceData, ID_ATTRIBUTE};
pub use error::{ProviderError, ProviderResult};
pub use plan::{plan_change, FieldChange, PlanAction, PlannedChange, SENSITIVE_PLACEHOLDER};
pub use provider::{Provider, ProviderSettings, State};
pub use schema::{Attribute, AttributeType, ProviderSchema, Schema};
pub use traits::{DataSource, Resource};
