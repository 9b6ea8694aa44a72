use application::UserApp;
use std::sync::Arc;

pub mod handlers;
pub mod openapi;
pub mod query;
pub mod response;
pub mod routes;

pub use openapi::ApiDoc;
pub use response::{ErrorBody, ResponseDescriptor};
pub use routes::router;

#[derive(Clone)]
pub struct AppState {
    pub user_app: Arc<UserApp>,
}

impl AppState {
    pub fn new(user_app: Arc<UserApp>) -> Self {
        Self { user_app }
    }
}
