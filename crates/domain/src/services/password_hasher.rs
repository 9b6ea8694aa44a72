use crate::errors::DomainError;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Salted one-way hashing of submitted passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// bcrypt is CPU bound, so the work runs on the blocking pool.
    pub async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let cost = self.cost;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Hashing(e.to_string()))?
            .map_err(|e| DomainError::Hashing(e.to_string()))
    }

    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Hashing(e.to_string()))?
            .map_err(|e| DomainError::Hashing(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(MIN_COST)
    }
}
