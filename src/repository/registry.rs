//! Startup-time schema registration.
//!
//! Each record schema is registered exactly once, by name, against an
//! explicit constructor table; building the table then instantiates one
//! repository per configured collection. Resolving a configured
//! `document_schema` that was never registered is a configuration error.

use crate::config::{DocumentOptions, StoreConfig};
use crate::domain::errors::StrataError;
use crate::domain::{DocumentModel, Result};
use crate::repository::document::DocumentRepository;
use crate::store::backend::ContainerBackend;
use crate::store::StoreClient;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type BuiltRepository = Box<dyn Any + Send + Sync>;
type Constructor =
    Box<dyn Fn(&StoreClient, &StoreConfig, &DocumentOptions) -> Result<BuiltRepository> + Send + Sync>;

/// Registration table mapping schema names to repository constructors.
///
/// # Example
///
/// ```no_run
/// use strata::config::load_config;
/// use strata::repository::SchemaRegistry;
/// use strata::store::StoreClient;
/// # use serde::{Deserialize, Serialize};
/// # use strata::domain::DocumentModel;
/// # #[derive(Serialize, Deserialize)]
/// # struct Profile { id: String, tenant: String }
/// # impl DocumentModel for Profile {
/// #     const SCHEMA_NAME: &'static str = "profile";
/// #     const PARTITION_KEY_FIELD: &'static str = "tenant";
/// #     fn id(&self) -> &str { &self.id }
/// # }
///
/// # fn example() -> strata::domain::Result<()> {
/// let config = load_config("strata.toml")?;
/// let client = StoreClient::connect(config)?;
///
/// let mut registry = SchemaRegistry::new();
/// registry.register::<Profile>()?;
///
/// let repositories = registry.build(&client)?;
/// let profiles = repositories
///     .get::<Profile>("profiles")
///     .expect("collection configured");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SchemaRegistry {
    constructors: HashMap<String, Constructor>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// Register a schema type under its [`DocumentModel::SCHEMA_NAME`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the name is already registered.
    pub fn register<T: DocumentModel>(&mut self) -> Result<()> {
        if self.constructors.contains_key(T::SCHEMA_NAME) {
            return Err(StrataError::Configuration(format!(
                "Schema '{}' is already registered",
                T::SCHEMA_NAME
            )));
        }

        self.constructors.insert(
            T::SCHEMA_NAME.to_string(),
            Box::new(|client, config, options| {
                let backend: Arc<dyn ContainerBackend> =
                    Arc::new(client.container_backend(options));
                let repository = DocumentRepository::<T>::new(backend, config, options)?;
                Ok(Box::new(Arc::new(repository)) as BuiltRepository)
            }),
        );

        Ok(())
    }

    /// Instantiate one repository per configured collection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a configured `document_schema` has
    /// no registered constructor, or when repository construction fails.
    pub fn build(&self, client: &StoreClient) -> Result<RepositorySet> {
        let config = client.config();
        let mut repositories = HashMap::new();

        for options in &config.documents {
            let constructor = self.constructors.get(&options.document_schema).ok_or_else(|| {
                StrataError::Configuration(format!(
                    "Collection '{}' references schema '{}', which was never registered",
                    options.name, options.document_schema
                ))
            })?;
            repositories.insert(options.name.clone(), constructor(client, config, options)?);
        }

        Ok(RepositorySet { repositories })
    }
}

/// Built repositories, keyed by collection name.
pub struct RepositorySet {
    repositories: HashMap<String, BuiltRepository>,
}

impl RepositorySet {
    /// Retrieve the repository for a collection, typed to its schema.
    ///
    /// Returns `None` when the collection is not configured or was built for
    /// a different schema type.
    pub fn get<T: DocumentModel>(&self, collection: &str) -> Option<Arc<DocumentRepository<T>>> {
        self.repositories
            .get(collection)?
            .downcast_ref::<Arc<DocumentRepository<T>>>()
            .cloned()
    }

    /// Number of built repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Names of the collections with a built repository.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }
}
