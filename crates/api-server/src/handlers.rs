use crate::query::decode_filter;
use crate::response::{ErrorBody, ResponseDescriptor};
use crate::AppState;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, RawQuery, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use domain::{DomainError, User};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::convert::Infallible;
use tracing::{error, info};

/// Characters escaped when a nickname is placed in the Location header.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Request fields attached to every failure log line.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers: parts.headers.clone(),
        })
    }
}

/// Logs the failure once with request context and converts it to a response.
fn failure(ctx: &RequestContext, err: DomainError) -> ResponseDescriptor {
    if err.is_client_error() {
        info!(path = %ctx.path, method = %ctx.method, headers = ?ctx.headers, error = %err, "request rejected");
    } else {
        error!(path = %ctx.path, method = %ctx.method, headers = ?ctx.headers, error = %err, "request failed");
    }
    ResponseDescriptor::from(&err)
}

fn decode_user(body: &[u8]) -> Result<User, DomainError> {
    Ok(serde_json::from_slice(body)?)
}

fn location_for(nickname: &str) -> HeaderValue {
    let location = format!("v1/users/{}", utf8_percent_encode(nickname, PATH_SEGMENT));
    // Percent-encoding leaves only visible ASCII
    HeaderValue::from_str(&location).unwrap_or_else(|_| HeaderValue::from_static("v1/users"))
}

// Handler functions
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(
        ("email" = Option<String>, Query, description = "Exact email"),
        ("country" = Option<String>, Query, description = "Exact country"),
        ("nickname" = Option<String>, Query, description = "Exact nickname"),
        ("lastName" = Option<String>, Query, description = "Exact last name"),
        ("firstName" = Option<String>, Query, description = "Exact first name"),
    ),
    responses(
        (status = 200, description = "Matching users, passwords omitted", body = [User]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
    RawQuery(query): RawQuery,
) -> ResponseDescriptor {
    let (filter, problems) = decode_filter(query.as_deref());
    if !problems.is_empty() {
        error!(
            path = %ctx.path,
            method = %ctx.method,
            headers = ?ctx.headers,
            parameters = ?query,
            problems = ?problems,
            "Error in GET parameters"
        );
    }

    match state.user_app.user_service.list_users(&filter).await {
        Ok(users) => ResponseDescriptor::json(StatusCode::OK, &users),
        Err(e) => failure(&ctx, e),
    }
}

#[utoipa::path(
    get,
    path = "/v1/users/{nickname}",
    tag = "users",
    params(("nickname" = String, Path, description = "User nickname")),
    responses(
        (status = 200, description = "Stored user", body = User),
        (status = 404, description = "No user with this nickname", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(nickname): Path<String>,
) -> ResponseDescriptor {
    match state.user_app.user_service.get_user(&nickname).await {
        Ok(user) => ResponseDescriptor::json(StatusCode::OK, &user),
        Err(e) => failure(&ctx, e),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = User,
    responses(
        (status = 201, description = "User created",
            headers(("Location" = String, description = "Relative path of the new user"))),
        (status = 400, description = "Validation failures, one per line", body = ErrorBody),
        (status = 409, description = "Nickname already taken", body = ErrorBody),
        (status = 500, description = "Malformed body or storage failure", body = ErrorBody),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> ResponseDescriptor {
    let user = match decode_user(&body) {
        Ok(user) => user,
        Err(e) => return failure(&ctx, e),
    };

    match state.user_app.user_service.create_user(user).await {
        Ok(created) => ResponseDescriptor::empty(StatusCode::CREATED)
            .with_header(header::LOCATION, location_for(&created.nickname)),
        Err(e) => failure(&ctx, e),
    }
}

#[utoipa::path(
    put,
    path = "/v1/users/{nickname}",
    tag = "users",
    params(("nickname" = String, Path, description = "User nickname")),
    request_body = User,
    responses(
        (status = 204, description = "Update applied; subscribers notified when a user matched"),
        (status = 500, description = "Malformed body, storage or notification failure", body = ErrorBody),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(nickname): Path<String>,
    body: Bytes,
) -> ResponseDescriptor {
    let user = match decode_user(&body) {
        Ok(user) => user,
        Err(e) => return failure(&ctx, e),
    };

    match state.user_app.user_service.update_user(&nickname, user).await {
        Ok(_) => ResponseDescriptor::empty(StatusCode::NO_CONTENT),
        Err(e) => failure(&ctx, e),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/users/{nickname}",
    tag = "users",
    params(("nickname" = String, Path, description = "User nickname")),
    responses(
        (status = 204, description = "User removed or never existed"),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(nickname): Path<String>,
) -> ResponseDescriptor {
    match state.user_app.user_service.delete_user(&nickname).await {
        Ok(()) => ResponseDescriptor::empty(StatusCode::NO_CONTENT),
        Err(e) => failure(&ctx, e),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}
