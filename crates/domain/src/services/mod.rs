pub mod password_hasher;
pub mod user_service;

pub use password_hasher::PasswordHasher;
pub use user_service::{UpdateOutcome, UserService};
