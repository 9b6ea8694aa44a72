use async_trait::async_trait;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;
use domain::{DomainError, User, UserNotifier};
use tracing::{error, info};

/// Publishes updated users as JSON to an SNS topic.
pub struct SnsUserNotifier {
    client: Client,
    topic: String,
}

impl SnsUserNotifier {
    /// `endpoint` overrides the regional endpoint, e.g. for a local emulator.
    pub async fn new(topic: &str, region: &str, endpoint: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            topic: topic.to_string(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl UserNotifier for SnsUserNotifier {
    async fn publish(&self, user: &User) -> Result<(), DomainError> {
        let message =
            serde_json::to_string(user).map_err(|e| DomainError::Notify(e.to_string()))?;

        self.client
            .publish()
            .topic_arn(&self.topic)
            .message(&message)
            .send()
            .await
            .map_err(|e| {
                let description = DisplayErrorContext(&e).to_string();
                error!(topic = %self.topic, error = %description, "failed to publish user update");
                DomainError::Notify(description)
            })?;

        info!(topic = %self.topic, message = %message, "notifying updated user");
        Ok(())
    }
}
