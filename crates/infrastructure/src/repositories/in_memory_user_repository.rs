use async_trait::async_trait;
use domain::{DomainError, Filter, User, UserRepository};
use tokio::sync::RwLock;

/// Process-local store with the same matching rules as the Mongo adapter.
/// Insertion order is preserved.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_all_by_filter(&self, filter: &Filter) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .map(User::redacted)
            .collect())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.nickname == nickname).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        if user.id.is_none() {
            return Err(DomainError::Storage(
                "user id must be assigned before insert".to_string(),
            ));
        }
        self.users.write().await.push(user.clone());
        Ok(user.clone())
    }

    async fn update_by_nickname(&self, nickname: &str, user: &User) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;
        let Some(stored) = users.iter_mut().find(|stored| stored.nickname == nickname) else {
            return Ok(0);
        };

        stored.email = user.email.clone();
        stored.country = user.country.clone();
        stored.nickname = user.nickname.clone();
        stored.last_name = user.last_name.clone();
        stored.first_name = user.first_name.clone();
        stored.password = user.password.clone();
        Ok(1)
    }

    async fn delete(&self, nickname: &str) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if let Some(position) = users.iter().position(|user| user.nickname == nickname) {
            users.remove(position);
        }
        Ok(())
    }
}
