//! Group membership edges: `cloudir_user_group_membership`,
//! `cloudir_system_group_membership`
//!
//! Identifier: `<group id>:<member id>`.

use async_trait::async_trait;
use cloudir_client::{compose_id, path_segment, split_id, DirectoryClient};
use tracing::{info, instrument, warn};

use super::graph::{edge_exists, modify_edge, EdgeOp};
use crate::data::ResourceData;
use crate::error::ProviderResult;
use crate::schema::{Attribute, Schema};
use crate::traits::Resource;

/// Membership of one member in one group.
#[derive(Debug, Clone)]
pub struct MembershipResource {
    type_name: &'static str,
    group_collection: &'static str,
    member_attribute: &'static str,
    member_type: &'static str,
}

impl MembershipResource {
    /// User in a user group.
    #[must_use]
    pub fn user_group() -> Self {
        Self {
            type_name: "cloudir_user_group_membership",
            group_collection: "/api/v2/usergroups",
            member_attribute: "user_id",
            member_type: "user",
        }
    }

    /// Device in a system group.
    #[must_use]
    pub fn system_group() -> Self {
        Self {
            type_name: "cloudir_system_group_membership",
            group_collection: "/api/v2/systemgroups",
            member_attribute: "system_id",
            member_type: "system",
        }
    }

    fn members_path(&self, group_id: &str) -> ProviderResult<String> {
        Ok(format!(
            "{}/{}/members",
            self.group_collection,
            path_segment(group_id)?
        ))
    }
}

#[async_trait]
impl Resource for MembershipResource {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(Attribute::required_string("group_id").force_new())
            .with_attribute(Attribute::required_string(self.member_attribute).force_new())
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn create(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let group_id = data.get_string("group_id")?;
        let member_id = data.get_string(self.member_attribute)?;

        modify_edge(
            client,
            &self.members_path(&group_id)?,
            EdgeOp::Add,
            self.member_type,
            &member_id,
        )
        .await?;

        info!(group_id = %group_id, member_id = %member_id, "Added group member");
        data.set_id(compose_id(&[&group_id, &member_id]));
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let parts = split_id(data.require_id(self.type_name)?, 2)?;
        let (group_id, member_id) = (&parts[0], &parts[1]);

        let exists = match edge_exists(
            client,
            &self.members_path(group_id)?,
            None,
            self.member_type,
            member_id,
        )
        .await
        {
            Ok(exists) => exists,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };

        if exists {
            data.set("group_id", group_id.clone());
            data.set(self.member_attribute, member_id.clone());
        } else {
            warn!(group_id = %group_id, member_id = %member_id, "Membership no longer exists");
            data.clear_id();
        }
        Ok(())
    }

    /// Every attribute forces replacement, so there is nothing to send.
    async fn update(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        self.read(client, data).await
    }

    #[instrument(skip(self, client, data), fields(resource = self.type_name))]
    async fn delete(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let parts = split_id(data.require_id(self.type_name)?, 2)?;
        let (group_id, member_id) = (&parts[0], &parts[1]);

        match modify_edge(
            client,
            &self.members_path(group_id)?,
            EdgeOp::Remove,
            self.member_type,
            member_id,
        )
        .await
        {
            Ok(()) => info!(group_id = %group_id, member_id = %member_id, "Removed group member"),
            Err(e) if e.is_not_found() => {
                warn!(group_id = %group_id, member_id = %member_id, "Membership already removed");
            }
            Err(e) => return Err(e),
        }

        data.clear_id();
        Ok(())
    }
}
