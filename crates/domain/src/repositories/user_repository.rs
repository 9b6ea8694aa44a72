use crate::entities::{Filter, User};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Repository trait - defines what we need from persistence layer.
/// This is a PORT in hexagonal architecture; nickname is the lookup key,
/// the identifier is owned by the store and never rewritten.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored record, password hash included.
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Records matching every populated predicate, password cleared.
    /// Returns an empty vector when nothing matches.
    async fn find_all_by_filter(&self, filter: &Filter) -> Result<Vec<User>, DomainError>;

    /// First record with this exact nickname, if any.
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError>;

    /// Inserts one record. The caller assigns the id and hashes the password.
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Overwrites the textual fields and password hash of the record matching
    /// `nickname`. Returns the number of matched records.
    async fn update_by_nickname(&self, nickname: &str, user: &User) -> Result<u64, DomainError>;

    /// Removes the record matching `nickname`. Missing records are not an error.
    async fn delete(&self, nickname: &str) -> Result<(), DomainError>;
}
