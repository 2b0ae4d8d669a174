//! Resource and data-source traits
//!
//! Every managed object type implements [`Resource`]; every read-only lookup
//! implements [`DataSource`]. Operations receive the shared client and the
//! instance's [`ResourceData`] and write results back into it.

use async_trait::async_trait;
use cloudir_client::DirectoryClient;

use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::schema::Schema;

/// A managed object type with create/read/update/delete lifecycle.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name used in configuration (e.g. `cloudir_user`).
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Value checks the schema cannot express (allowed values, attributes
    /// that depend on each other). Runs during planning, before any request.
    fn check_config(&self, _data: &ResourceData) -> ProviderResult<()> {
        Ok(())
    }

    /// Create the object and set the id on `data`.
    async fn create(&self, client: &DirectoryClient, data: &mut ResourceData)
        -> ProviderResult<()>;

    /// Refresh `data` from the API.
    ///
    /// When the object no longer exists the id is cleared and `Ok` is
    /// returned.
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()>;

    /// Push changed attributes to the API.
    async fn update(&self, client: &DirectoryClient, data: &mut ResourceData)
        -> ProviderResult<()>;

    /// Delete the object and clear the id.
    ///
    /// An object that is already gone counts as deleted.
    async fn delete(&self, client: &DirectoryClient, data: &mut ResourceData)
        -> ProviderResult<()>;

    /// Bring an existing object under management.
    ///
    /// The default sets the id and reads; it fails when the object does not
    /// exist.
    async fn import(&self, client: &DirectoryClient, id: &str) -> ProviderResult<ResourceData> {
        let mut data = ResourceData::with_id(id);
        self.read(client, &mut data).await?;

        if data.id().is_none() {
            return Err(ProviderError::ImportNotFound {
                type_name: self.type_name().to_string(),
                id: id.to_string(),
            });
        }
        Ok(data)
    }
}

/// A read-only lookup of one existing object.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name used in configuration.
    fn type_name(&self) -> &'static str;

    /// Attribute schema; lookup attributes are required, the rest computed.
    fn schema(&self) -> Schema;

    /// Find the object described by `data` and fill in its attributes and id.
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()>;
}
