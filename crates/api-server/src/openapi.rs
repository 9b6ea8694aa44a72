use crate::handlers;
use crate::response::ErrorBody;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use domain::User;
use utoipa::OpenApi;

/// Where the generated document is served.
pub const OPENAPI_PATH: &str = "/swagger/doc.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        description = "CRUD over user records; updates are published to subscribers."
    ),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::health_check,
    ),
    components(schemas(User, ErrorBody)),
    tags(
        (name = "users", description = "User records"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json(ApiDoc::openapi()))
}
