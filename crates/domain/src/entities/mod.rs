pub mod filter;
pub mod user;
pub mod validation;

pub use filter::*;
pub use user::*;
pub use validation::*;
