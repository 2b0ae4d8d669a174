//! Managed resource types
//!
//! Most resources are a flat JSON object living at `<collection>/<id>`.
//! Those implement [`RestObject`] and are served by the generic
//! [`RestResource`]. Memberships, associations and the MFA singleton have
//! their own [`Resource`] implementations.

use async_trait::async_trait;
use cloudir_client::{path_segment, DirectoryClient, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::Schema;
use crate::traits::Resource;

pub mod application;
pub mod association;
pub mod auth_policy;
pub mod command;
mod graph;
pub mod groups;
pub mod ip_list;
pub mod mdm;
pub mod membership;
pub mod mfa_settings;
pub mod password_policy;
pub mod policy;
pub mod radius;
pub mod user;

/// JSON shape of an object managed through a plain REST collection.
pub trait RestObject: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Resource type name.
    const TYPE_NAME: &'static str;

    /// Collection path, e.g. `/api/v2/usergroups`.
    const COLLECTION_PATH: &'static str;

    /// Method used for updates.
    const UPDATE_METHOD: Method = Method::PUT;

    /// Attribute schema.
    fn schema() -> Schema;

    /// Build the create request body from configuration.
    fn from_data(data: &ResourceData) -> ProviderResult<Self>;

    /// Build the update request body. Defaults to the create body.
    fn for_update(data: &ResourceData) -> ProviderResult<Self> {
        Self::from_data(data)
    }

    /// Copy response fields into `data`.
    fn write_to(&self, data: &mut ResourceData);

    /// Identifier carried by a response.
    fn id(&self) -> Option<&str>;
}

/// Path of one object inside a collection.
pub(crate) fn object_path(collection: &str, id: &str) -> ProviderResult<String> {
    Ok(format!("{collection}/{}", path_segment(id)?))
}

/// Generic CRUD over a [`RestObject`] collection.
pub struct RestResource<T> {
    _object: PhantomData<fn() -> T>,
}

impl<T> RestResource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _object: PhantomData,
        }
    }
}

impl<T> Default for RestResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: RestObject> Resource for RestResource<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        T::schema()
    }

    fn check_config(&self, data: &ResourceData) -> ProviderResult<()> {
        T::from_data(data).map(|_| ())
    }

    #[instrument(skip(self, client, data), fields(resource = T::TYPE_NAME))]
    async fn create(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let body = T::from_data(data)?;
        let created: T = client.post_json(T::COLLECTION_PATH, &body).await?;

        let id = created
            .id()
            .ok_or_else(|| ProviderError::MissingId {
                type_name: T::TYPE_NAME.to_string(),
            })?
            .to_string();

        created.write_to(data);
        info!(resource = T::TYPE_NAME, id = %id, "Created object");
        data.set_id(id);
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(resource = T::TYPE_NAME))]
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.require_id(T::TYPE_NAME)?.to_string();

        match client.get_json::<T>(&object_path(T::COLLECTION_PATH, &id)?).await {
            Ok(object) => {
                object.write_to(data);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(resource = T::TYPE_NAME, id = %id, "Object no longer exists");
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, client, data), fields(resource = T::TYPE_NAME))]
    async fn update(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.require_id(T::TYPE_NAME)?.to_string();
        let body = T::for_update(data)?;

        let updated: T = client
            .send_json(T::UPDATE_METHOD, &object_path(T::COLLECTION_PATH, &id)?, &body)
            .await?;

        updated.write_to(data);
        info!(resource = T::TYPE_NAME, id = %id, "Updated object");
        Ok(())
    }

    #[instrument(skip(self, client, data), fields(resource = T::TYPE_NAME))]
    async fn delete(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let id = data.require_id(T::TYPE_NAME)?.to_string();

        match client.delete(&object_path(T::COLLECTION_PATH, &id)?).await {
            Ok(()) => info!(resource = T::TYPE_NAME, id = %id, "Deleted object"),
            Err(e) if e.is_not_found() => {
                warn!(resource = T::TYPE_NAME, id = %id, "Object already deleted");
            }
            Err(e) => return Err(e.into()),
        }

        data.clear_id();
        Ok(())
    }
}

/// Every resource type the provider serves.
#[must_use]
pub fn all() -> Vec<Arc<dyn Resource>> {
    vec![
        Arc::new(RestResource::<user::User>::new()),
        Arc::new(RestResource::<groups::UserGroup>::new()),
        Arc::new(RestResource::<groups::SystemGroup>::new()),
        Arc::new(RestResource::<groups::PolicyGroup>::new()),
        Arc::new(membership::MembershipResource::user_group()),
        Arc::new(membership::MembershipResource::system_group()),
        Arc::new(association::AssociationResource::user_group()),
        Arc::new(association::AssociationResource::system_group()),
        Arc::new(RestResource::<policy::Policy>::new()),
        Arc::new(RestResource::<password_policy::PasswordPolicy>::new()),
        Arc::new(RestResource::<mdm::MdmConfiguration>::new()),
        Arc::new(RestResource::<auth_policy::AuthPolicy>::new()),
        Arc::new(RestResource::<auth_policy::AuthPolicyBinding>::new()),
        Arc::new(RestResource::<application::Application>::new()),
        Arc::new(RestResource::<command::Command>::new()),
        Arc::new(RestResource::<radius::RadiusServer>::new()),
        Arc::new(RestResource::<ip_list::IpList>::new()),
        Arc::new(mfa_settings::MfaSettingsResource),
    ]
}
