use async_trait::async_trait;
use domain::{DomainError, User, UserNotifier};
use tracing::info;

/// Stand-in when no topic is configured: the event only reaches the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUserNotifier;

#[async_trait]
impl UserNotifier for LogUserNotifier {
    async fn publish(&self, user: &User) -> Result<(), DomainError> {
        let message =
            serde_json::to_string(user).map_err(|e| DomainError::Notify(e.to_string()))?;
        info!(message = %message, "no topic configured, user update logged only");
        Ok(())
    }
}
