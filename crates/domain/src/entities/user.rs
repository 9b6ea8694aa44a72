use crate::entities::validation::{ValidationErrors, ValidationRule};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Core User entity - represents the business domain.
///
/// The identifier is assigned by the service at creation and never crosses
/// the HTTP boundary in either direction. Missing JSON keys decode to empty
/// strings so that validation, not decoding, reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip)]
    pub id: Option<Uuid>, // None for users that have not been persisted
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        country: impl Into<String>,
        nickname: impl Into<String>,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            email: email.into(),
            country: country.into(),
            nickname: nickname.into(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            password: password.into(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy without the password, as served by listings.
    pub fn redacted(mut self) -> Self {
        self.password.clear();
        self
    }

    /// Checks every field in declaration order and reports all failures.
    /// A field reports at most one violation: `required` wins over `email`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.email.is_empty() {
            errors.push("email", ValidationRule::Required);
        } else if !EmailAddress::is_valid(&self.email) {
            errors.push("email", ValidationRule::Email);
        }

        let required = [
            ("country", &self.country),
            ("nickname", &self.nickname),
            ("lastName", &self.last_name),
            ("firstName", &self.first_name),
            ("password", &self.password),
        ];
        for (field, value) in required {
            if value.is_empty() {
                errors.push(field, ValidationRule::Required);
            }
        }

        errors.into_result()
    }
}
