pub mod in_memory_user_repository;
pub mod mongo_user_repository;

pub use in_memory_user_repository::InMemoryUserRepository;
pub use mongo_user_repository::MongoUserRepository;
