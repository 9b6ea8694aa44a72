use anyhow::Context;
use config::{Config, StorageBackend};
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::{info, warn};

/// User Application - wires adapters into the service once at startup
pub struct UserApp {
    pub user_service: UserService,
}

impl UserApp {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Infrastructure layer - storage setup
        let user_repository: Arc<dyn UserRepository> = match config.storage {
            StorageBackend::Mongo => {
                let mongo = config
                    .mongo
                    .as_ref()
                    .context("mongo storage selected without mongo settings")?;
                let database = Database::connect(&mongo.uri, &mongo.database)
                    .await
                    .context("failed to create mongo client")?;
                database.ensure_user_indexes().await;
                Arc::new(MongoUserRepository::new(&database))
            }
            StorageBackend::Memory => {
                warn!("using in-memory storage, records are lost on restart");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        let notifier: Arc<dyn UserNotifier> = match &config.sns {
            Some(sns) => {
                info!(topic = %sns.topic, region = %sns.region, "publishing user updates to sns");
                Arc::new(SnsUserNotifier::new(&sns.topic, &sns.region, sns.endpoint.as_deref()).await)
            }
            None => {
                warn!("SNS_TOPIC not set, user updates are only logged");
                Arc::new(LogUserNotifier)
            }
        };

        Ok(Self::from_parts(
            user_repository,
            notifier,
            PasswordHasher::new(config.bcrypt_cost),
        ))
    }

    pub fn from_parts(
        user_repository: Arc<dyn UserRepository>,
        notifier: Arc<dyn UserNotifier>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_service: UserService::new(user_repository, notifier, hasher),
        }
    }
}
