//! Read-only data sources
//!
//! Each data source finds exactly one object by a unique attribute using
//! the collection's `filter` query parameter.

use async_trait::async_trait;
use cloudir_client::DirectoryClient;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::data::ResourceData;
use crate::error::{ProviderError, ProviderResult};
use crate::resources::application::Application;
use crate::resources::auth_policy::AuthPolicy;
use crate::resources::groups::{SystemGroup, UserGroup};
use crate::resources::policy::Policy;
use crate::resources::user::User;
use crate::resources::RestObject;
use crate::schema::Schema;
use crate::traits::DataSource;

pub mod system;

use system::System;

/// Filter dialect of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSyntax {
    /// `field:$eq:value`
    V1,
    /// `field:eq:value`
    V2,
}

impl FilterSyntax {
    /// Build an equality filter.
    #[must_use]
    pub fn equals(&self, field: &str, value: &str) -> String {
        match self {
            FilterSyntax::V1 => format!("{field}:$eq:{value}"),
            FilterSyntax::V2 => format!("{field}:eq:{value}"),
        }
    }
}

/// An object type that can be looked up by one unique attribute.
pub trait Lookup: DeserializeOwned + Send + Sync + 'static {
    /// Data source type name.
    const TYPE_NAME: &'static str;

    /// Collection to search.
    const COLLECTION_PATH: &'static str;

    /// Configuration attribute holding the lookup value.
    const LOOKUP_ATTRIBUTE: &'static str;

    /// API field the filter applies to.
    const API_FIELD: &'static str;

    const FILTER_SYNTAX: FilterSyntax;

    fn schema() -> Schema;

    /// Value of the lookup field on a returned object.
    fn lookup_value(&self) -> &str;

    fn write_to(&self, data: &mut ResourceData);

    fn id(&self) -> Option<&str>;
}

/// Generic lookup data source over a [`Lookup`] type.
pub struct LookupDataSource<T> {
    _object: PhantomData<fn() -> T>,
}

impl<T> LookupDataSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _object: PhantomData,
        }
    }
}

impl<T> Default for LookupDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Lookup> DataSource for LookupDataSource<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        T::schema()
    }

    #[instrument(skip(self, client, data), fields(data_source = T::TYPE_NAME))]
    async fn read(&self, client: &DirectoryClient, data: &mut ResourceData) -> ProviderResult<()> {
        let value = data.get_string(T::LOOKUP_ATTRIBUTE)?;
        let filter = T::FILTER_SYNTAX.equals(T::API_FIELD, &value);

        let found: Vec<T> = client.list_all(T::COLLECTION_PATH, Some(&filter)).await?;
        // The API filter may be a prefix or case-insensitive match.
        let mut matches: Vec<T> = found
            .into_iter()
            .filter(|object| object.lookup_value() == value)
            .collect();

        debug!(filter = %filter, matches = matches.len(), "Lookup finished");

        match matches.len() {
            0 => Err(ProviderError::NoMatch {
                type_name: T::TYPE_NAME.to_string(),
                attribute: T::LOOKUP_ATTRIBUTE.to_string(),
                value,
            }),
            1 => {
                let object = matches.remove(0);
                let id = object
                    .id()
                    .ok_or_else(|| ProviderError::MissingId {
                        type_name: T::TYPE_NAME.to_string(),
                    })?
                    .to_string();
                object.write_to(data);
                data.set_id(id);
                Ok(())
            }
            count => Err(ProviderError::AmbiguousMatch {
                type_name: T::TYPE_NAME.to_string(),
                attribute: T::LOOKUP_ATTRIBUTE.to_string(),
                value,
                count,
            }),
        }
    }
}

// ── Lookup implementations for managed object types ───────────────────

impl Lookup for User {
    const TYPE_NAME: &'static str = <User as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <User as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "username";
    const API_FIELD: &'static str = "username";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V1;

    fn schema() -> Schema {
        <User as RestObject>::schema().as_lookup("username")
    }

    fn lookup_value(&self) -> &str {
        &self.username
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

impl Lookup for UserGroup {
    const TYPE_NAME: &'static str = <UserGroup as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <UserGroup as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "name";
    const API_FIELD: &'static str = "name";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V2;

    fn schema() -> Schema {
        <UserGroup as RestObject>::schema().as_lookup("name")
    }

    fn lookup_value(&self) -> &str {
        &self.name
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

impl Lookup for SystemGroup {
    const TYPE_NAME: &'static str = <SystemGroup as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <SystemGroup as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "name";
    const API_FIELD: &'static str = "name";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V2;

    fn schema() -> Schema {
        <SystemGroup as RestObject>::schema().as_lookup("name")
    }

    fn lookup_value(&self) -> &str {
        &self.name
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

impl Lookup for Policy {
    const TYPE_NAME: &'static str = <Policy as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <Policy as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "name";
    const API_FIELD: &'static str = "name";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V2;

    fn schema() -> Schema {
        <Policy as RestObject>::schema().as_lookup("name")
    }

    fn lookup_value(&self) -> &str {
        &self.name
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

impl Lookup for AuthPolicy {
    const TYPE_NAME: &'static str = <AuthPolicy as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <AuthPolicy as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "name";
    const API_FIELD: &'static str = "name";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V2;

    fn schema() -> Schema {
        <AuthPolicy as RestObject>::schema().as_lookup("name")
    }

    fn lookup_value(&self) -> &str {
        &self.name
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

impl Lookup for Application {
    const TYPE_NAME: &'static str = <Application as RestObject>::TYPE_NAME;
    const COLLECTION_PATH: &'static str = <Application as RestObject>::COLLECTION_PATH;
    const LOOKUP_ATTRIBUTE: &'static str = "display_label";
    const API_FIELD: &'static str = "displayLabel";
    const FILTER_SYNTAX: FilterSyntax = FilterSyntax::V1;

    fn schema() -> Schema {
        <Application as RestObject>::schema().as_lookup("display_label")
    }

    fn lookup_value(&self) -> &str {
        &self.display_label
    }

    fn write_to(&self, data: &mut ResourceData) {
        RestObject::write_to(self, data);
    }

    fn id(&self) -> Option<&str> {
        RestObject::id(self)
    }
}

/// Every data source the provider serves.
#[must_use]
pub fn all() -> Vec<Arc<dyn DataSource>> {
    vec![
        Arc::new(LookupDataSource::<User>::new()),
        Arc::new(LookupDataSource::<UserGroup>::new()),
        Arc::new(LookupDataSource::<SystemGroup>::new()),
        Arc::new(LookupDataSource::<Policy>::new()),
        Arc::new(LookupDataSource::<AuthPolicy>::new()),
        Arc::new(LookupDataSource::<Application>::new()),
        Arc::new(LookupDataSource::<System>::new()),
    ]
}
