use crate::entities::User;
use crate::errors::DomainError;
use async_trait::async_trait;

/// Outbound port for user-changed events.
#[async_trait]
pub trait UserNotifier: Send + Sync {
    /// Emits the full record, hash included. Failures are returned, not retried.
    async fn publish(&self, user: &User) -> Result<(), DomainError>;
}
