use axum::body::Body;
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Uniform error payload: `{"description": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub description: String,
}

/// Status, optional JSON body and extra headers produced by one handler call.
#[derive(Debug)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl ResponseDescriptor {
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self {
                status,
                body: Some(body),
                headers: HeaderMap::new(),
            },
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }

    pub fn error(status: StatusCode, description: impl Into<String>) -> Self {
        Self::json(
            status,
            &ErrorBody {
                description: description.into(),
            },
        )
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Description carried by an error body, if this is one.
    pub fn description(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("description"))
            .and_then(Value::as_str)
    }
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        // Malformed bodies are reported as server errors
        DomainError::Storage(_)
        | DomainError::Notify(_)
        | DomainError::Decode(_)
        | DomainError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<&DomainError> for ResponseDescriptor {
    fn from(error: &DomainError) -> Self {
        ResponseDescriptor::error(status_for(error), error.to_string())
    }
}

impl IntoResponse for ResponseDescriptor {
    fn into_response(self) -> Response {
        let body = match &self.body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        let mut response = (self.status, body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.extend(self.headers);
        response
    }
}
