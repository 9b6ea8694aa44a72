use domain::DomainError;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, warn};

pub const USERS_COLLECTION: &str = "users";

/// Connection handle. Cloning is cheap; the driver pools connections internally.
#[derive(Clone)]
pub struct Database {
    client: Client,
    name: String,
}

impl Database {
    pub async fn connect(uri: &str, name: &str) -> Result<Self, DomainError> {
        let options = ClientOptions::parse(uri)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let client =
            Client::with_options(options).map_err(|e| DomainError::Storage(e.to_string()))?;

        info!(database = name, "mongo client created");

        Ok(Database {
            client,
            name: name.to_string(),
        })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.client.database(&self.name).collection::<T>(name)
    }

    /// Creates the nickname and email indexes. Existing indexes are left alone,
    /// and a failure here does not prevent serving requests.
    pub async fn ensure_user_indexes(&self) {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "nickname": 1 }).build(),
            IndexModel::builder().keys(doc! { "email": 1 }).build(),
        ];

        match self
            .collection::<mongodb::bson::Document>(USERS_COLLECTION)
            .create_indexes(indexes, None)
            .await
        {
            Ok(result) => info!(indexes = ?result.index_names, "user indexes ready"),
            Err(e) => warn!(error = %e, "failed to create user indexes"),
        }
    }
}
