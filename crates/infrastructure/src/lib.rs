pub mod database;
pub mod notifications;
pub mod repositories;

pub use database::*;
pub use notifications::*;
pub use repositories::*;
