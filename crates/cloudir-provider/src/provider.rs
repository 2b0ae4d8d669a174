//! Provider registry and lifecycle entry points
//!
//! The [`Provider`] owns the resource and data-source catalogue and, once
//! configured, the shared [`DirectoryClient`]. Callers work with plain
//! JSON attribute maps; the provider turns them into [`ResourceData`],
//! validates, plans and dispatches to the right resource implementation.

use cloudir_client::config::{ENV_API_KEY, ENV_API_URL, ENV_ORG_ID, ENV_TIMEOUT_SECS};
use cloudir_client::{ClientConfig, DirectoryClient};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::env::VarError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::data::ResourceData;
use crate::data_sources;
use crate::error::{ProviderError, ProviderResult};
use crate::plan::{plan_change, PlanAction, PlannedChange};
use crate::resources;
use crate::schema::{Attribute, ProviderSchema, Schema};
use crate::traits::{DataSource, Resource};

/// Attribute map as stored in state.
pub type State = Map<String, Value>;

/// Explicit provider block. Unset fields fall back to the environment.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("org_id", &self.org_id)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderSettings {
    fn explicit(&self, key: &str) -> Option<String> {
        let value = match key {
            ENV_API_KEY => self.api_key.clone(),
            ENV_ORG_ID => self.org_id.clone(),
            ENV_API_URL => self.api_url.clone(),
            ENV_TIMEOUT_SECS => self.timeout_secs.map(|s| s.to_string()),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// The cloudir provider.
pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
    client: Option<Arc<DirectoryClient>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .field("configured", &self.client.is_some())
            .finish()
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    /// Create an unconfigured provider with the full catalogue.
    #[must_use]
    pub fn new() -> Self {
        let resources = resources::all()
            .into_iter()
            .map(|r| (r.type_name(), r))
            .collect();
        let data_sources = data_sources::all()
            .into_iter()
            .map(|d| (d.type_name(), d))
            .collect();

        Self {
            resources,
            data_sources,
            client: None,
        }
    }

    /// Create a provider around an existing client (for testing).
    #[must_use]
    pub fn with_client(client: DirectoryClient) -> Self {
        let mut provider = Self::new();
        provider.client = Some(Arc::new(client));
        provider
    }

    // ── Configuration ─────────────────────────────────────────────────

    /// Schema of the provider block.
    #[must_use]
    pub fn provider_schema() -> Schema {
        Schema::new()
            .with_attribute(
                Attribute::optional_string("api_key")
                    .sensitive()
                    .with_description(format!("Falls back to {ENV_API_KEY}.")),
            )
            .with_attribute(
                Attribute::optional_string("org_id")
                    .with_description(format!("Falls back to {ENV_ORG_ID}.")),
            )
            .with_attribute(
                Attribute::optional_string("api_url")
                    .with_description(format!("Falls back to {ENV_API_URL}.")),
            )
            .with_attribute(
                Attribute::optional_int("timeout_secs")
                    .with_description(format!("Falls back to {ENV_TIMEOUT_SECS}.")),
            )
    }

    /// Configure from the provider block and the process environment.
    pub fn configure(&mut self, settings: &ProviderSettings) -> ProviderResult<()> {
        self.configure_with_reader(settings, |key| std::env::var(key))
    }

    /// Configure from the provider block, with `reader` standing in for the
    /// environment.
    pub fn configure_with_reader<F>(
        &mut self,
        settings: &ProviderSettings,
        reader: F,
    ) -> ProviderResult<()>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let config = ClientConfig::from_reader(|key| match settings.explicit(key) {
            Some(value) => Ok(value),
            None => reader(key),
        })
        .map_err(|e| ProviderError::InvalidConfiguration {
            message: e.to_string(),
        })?;

        let client = DirectoryClient::new(config).map_err(|e| ProviderError::InvalidConfiguration {
            message: e.to_string(),
        })?;

        info!(
            api_url = %client.api_url(),
            org_id = ?client.org_id(),
            "Provider configured"
        );
        self.client = Some(Arc::new(client));
        Ok(())
    }

    /// Whether `configure` succeeded.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> ProviderResult<&DirectoryClient> {
        self.client.as_deref().ok_or(ProviderError::NotConfigured)
    }

    // ── Catalogue ─────────────────────────────────────────────────────

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Registered data source type names, sorted.
    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    fn resource(&self, type_name: &str) -> ProviderResult<&Arc<dyn Resource>> {
        self.resources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    fn data_source(&self, type_name: &str) -> ProviderResult<&Arc<dyn DataSource>> {
        self.data_sources
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownDataSource(type_name.to_string()))
    }

    /// All schemas.
    #[must_use]
    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: Self::provider_schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, r)| (name.to_string(), r.schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.to_string(), d.schema()))
                .collect(),
        }
    }

    // ── Resource lifecycle ────────────────────────────────────────────

    /// Check a resource configuration against its schema.
    pub fn validate(&self, type_name: &str, config: &State) -> ProviderResult<()> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();
        check(type_name, &schema, config)?;
        resource.check_config(&ResourceData::from_config(&schema, config))
    }

    /// Check a data source configuration against its schema.
    pub fn validate_data_source(&self, type_name: &str, config: &State) -> ProviderResult<()> {
        let schema = self.data_source(type_name)?.schema();
        check(type_name, &schema, config)
    }

    /// Plan one instance. Does not call the API.
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&State>,
        config: Option<&State>,
    ) -> ProviderResult<PlannedChange> {
        let resource = self.resource(type_name)?;
        let schema = resource.schema();
        if let Some(config) = config {
            check(type_name, &schema, config)?;
            resource.check_config(&ResourceData::from_config(&schema, config))?;
        }
        let prior = prior.map(ResourceData::from_state);
        Ok(plan_change(&schema, prior.as_ref(), config))
    }

    /// Execute the plan for one instance.
    ///
    /// Returns the new state, or `None` when the instance no longer exists.
    #[instrument(skip(self, prior, config))]
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<&State>,
        config: Option<&State>,
    ) -> ProviderResult<Option<State>> {
        let resource = self.resource(type_name)?;
        let planned = self.plan(type_name, prior, config)?;
        debug!(action = %planned.action, "Applying planned change");

        let schema = resource.schema();
        let prior_data = prior.map(ResourceData::from_state);
        let empty = State::new();
        let config = config.unwrap_or(&empty);

        match planned.action {
            PlanAction::NoOp => Ok(prior_data
                .filter(|p| p.id().is_some())
                .map(|p| p.to_state())),
            PlanAction::Create => {
                let mut data = ResourceData::from_config(&schema, config);
                resource.create(self.client()?, &mut data).await?;
                Ok(Some(data.to_state()))
            }
            PlanAction::Update => {
                let prior_data = prior_data.unwrap_or_default();
                let id = prior_data.require_id(type_name)?.to_string();
                let mut data = ResourceData::from_config(&schema, config)
                    .with_prior(prior_data.attributes().clone());
                data.set_id(id);
                resource.update(self.client()?, &mut data).await?;
                Ok(Some(data.to_state()))
            }
            PlanAction::Replace => {
                let client = self.client()?;
                let mut old = prior_data.unwrap_or_default();
                resource.delete(client, &mut old).await?;

                let mut data = ResourceData::from_config(&schema, config);
                resource.create(client, &mut data).await?;
                Ok(Some(data.to_state()))
            }
            PlanAction::Delete => {
                let mut old = prior_data.unwrap_or_default();
                resource.delete(self.client()?, &mut old).await?;
                Ok(None)
            }
        }
    }

    /// Re-read one instance. `None` means the object is gone.
    #[instrument(skip(self, state))]
    pub async fn refresh(&self, type_name: &str, state: &State) -> ProviderResult<Option<State>> {
        let resource = self.resource(type_name)?;
        let mut data = ResourceData::from_state(state);
        if data.id().is_none() {
            return Ok(None);
        }

        resource.read(self.client()?, &mut data).await?;
        Ok(data.id().is_some().then(|| data.to_state()))
    }

    /// Bring an existing object under management.
    #[instrument(skip(self))]
    pub async fn import(&self, type_name: &str, id: &str) -> ProviderResult<State> {
        let resource = self.resource(type_name)?;
        let data = resource.import(self.client()?, id).await?;
        info!(resource = type_name, id = %id, "Imported object");
        Ok(data.to_state())
    }

    /// Look up a data source.
    #[instrument(skip(self, config))]
    pub async fn read_data_source(&self, type_name: &str, config: &State) -> ProviderResult<State> {
        let source = self.data_source(type_name)?;
        let schema = source.schema();
        check(type_name, &schema, config)?;

        let mut data = ResourceData::from_config(&schema, config);
        source.read(self.client()?, &mut data).await?;
        Ok(data.to_state())
    }
}

fn check(type_name: &str, schema: &Schema, config: &State) -> ProviderResult<()> {
    let problems = schema.validate_config(config);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ProviderError::Validation {
            type_name: type_name.to_string(),
            problems,
        })
    }
}
