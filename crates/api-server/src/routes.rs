use crate::handlers::{create_user, delete_user, get_user, health_check, list_users, update_user};
use crate::openapi::{openapi_json, OPENAPI_PATH};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const BASE_PATH: &str = "/v1";

/// Full HTTP surface: user routes under `/v1`, `/health` and the OpenAPI document.
pub fn router(state: AppState) -> Router {
    let users = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:nickname",
            get(get_user).put(update_user).delete(delete_user),
        );

    Router::new()
        .nest(BASE_PATH, users)
        .route("/health", get(health_check))
        .route(OPENAPI_PATH, get(openapi_json))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
