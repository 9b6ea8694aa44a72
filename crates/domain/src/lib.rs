pub mod entities;
pub mod errors;
pub mod notifications;
pub mod repositories;
pub mod services;

pub use entities::*;
pub use errors::*;
pub use notifications::*;
pub use repositories::*;
pub use services::*;
