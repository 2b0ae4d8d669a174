//! Group association edges: `cloudir_user_group_association`,
//! `cloudir_system_group_association`
//!
//! Identifier: `<group id>:<object type>:<object id>`.

use async_trait::async_trait;
use cloudir_client::{compose_id, path_segment, split_id, DirectoryClient};
use tracing::{info, instrument, warn};

use super::graph::{edge_exists, modify_edge, EdgeOp};
use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::{Attribute, Schema};
use crate::traits::Resource;

const USER_GROUP_TARGETS: &[&str] = &[
    "active_directory",
    "application",
    "g_suite",
    "ldap_server",
    "office_365",
    "radius_server",
    "system",
    "system_group",
];

const SYSTEM_GROUP_TARGETS: &[&str] = &["command", "policy", "policy_group", "user", "user_group"];

/// Association between a group and another directory object.
#[derive(Debug, Clone)]
pub struct AssociationResource {
    type_name: &'static str,
    group_collection: &'static str,
    allowed_types: &'static [&'static str],
}

impl AssociationResource {
    #[must_use]
    pub fn user_group() -> Self {
        Self {
            type_name: "cloudir_user_group_association",
            group_collection: "/api/v2/usergroups",
            allowed_types: USER_GROUP_TARGETS,
        }
    }

    #[must_use]
    pub fn system_group() -> Self {
        Self {
            type_name: "cloudir_system_group_association",
            group_collection: "/api/v2/systemgroups",
            allowed_types: SYSTEM_GROUP_TARGETS,
        }
    }

    fn associations_path(&self, group_id: &str) -> ProviderResult<String> {
        Ok(format!(
            "{}/{}/associations",
            self.group_collection,
            path_segment(group_id)?
        ))
    }

    fn check_object_type(&self, object_type: &str) -> ProviderResult<()> {
        if self.allowed_types.contains(&object_type) {
            Ok(())
        } else {
            Err(ProviderError::invalid_attribute(
                "object_type",
                format!(
                    "'{object_type}' cannot be associated; expected one of {}",
                    self.allowed_types.join(", ")
                ),
            ))
        }
    }
}

#[async_trait]
impl Resource for AssociationResource {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(Attribute::required_string("group_id").force_new())
            .with_attribute(
                Attribute::required_string("object_type")
                    .force_new()
                    .with_description(format!("One of: {}", self.allowed_types.join(", "))),
            )
            .with_attribute(Attribute::required_string("object_id").force_new())
    }

    fn check_config(&self, data: &ResourceData) -> ProviderResult<()> {
        match data.get_str("object_type") {
            Some(object_type) => self.check_object_type(object_type),
            None => Ok(()),
        }
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn create(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let group_id = data.get_string("group_id")?;
        let object_type = data.get_string("object_type")?;
        let object_id = data.get_string("object_id")?;
        self.check_object_type(&object_type)?;

        modify_edge(
            client,
            &self.associations_path(&group_id)?,
            EdgeOp::Add,
            &object_type,
            &object_id,
        )
        .await?;

        info!(group_id = %group_id, object_type = %object_type, object_id = %object_id, "Created association");
        data.set_id(compose_id(&[&group_id, &object_type, &object_id]));
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let parts = split_id(data.require_id(self.type_name)?, 3)?;
        let (group_id, object_type, object_id) = (&parts[0], &parts[1], &parts[2]);

        let exists = match edge_exists(
            client,
            &self.associations_path(group_id)?,
            Some(object_type),
            object_type,
            object_id,
        )
        .await
        {
            Ok(exists) => exists,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };

        if exists {
            data.set("group_id", group_id.clone());
            data.set("object_type", object_type.clone());
            data.set("object_id", object_id.clone());
        } else {
            warn!(group_id = %group_id, object_id = %object_id, "Association no longer exists");
            data.clear_id();
        }
        Ok(())
    }

    /// Every attribute forces replacement.
    async fn update(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.read(client, data).await
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn delete(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let parts = split_id(data.require_id(self.type_name)?, 3)?;
        let (group_id, object_type, object_id) = (&parts[0], &parts[1], &parts[2]);

        match modify_edge(
            client,
            &self.associations_path(group_id)?,
            EdgeOp::Remove,
            object_type,
            object_id,
        )
        .await
        {
            Ok(()) => info!(group_id = %group_id, object_id = %object_id, "Removed association"),
            Err(e) if e.is_not_found() => {
                warn!(group_id = %group_id, object_id = %object_id, "Association already removed");
            }
            Err(e) => return Err(e),
        }

        data.clear_id();
        Ok(())
    }
}
