use crate::database::{Database, USERS_COLLECTION};
use async_trait::async_trait;
use domain::{DomainError, Filter, User, UserRepository};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

// Database model - separate from domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: Bson,
    #[serde(default)]
    email: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    password: String,
}

// Ids written by this service are UUID strings; anything else is kept in the
// store but not surfaced.
impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        let id = match &document.id {
            Bson::String(raw) => Uuid::parse_str(raw).ok(),
            _ => None,
        };

        User {
            id,
            email: document.email,
            country: document.country,
            nickname: document.nickname,
            last_name: document.last_name,
            first_name: document.first_name,
            password: document.password,
        }
    }
}

impl TryFrom<&User> for UserDocument {
    type Error = DomainError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        let id = user.id.ok_or_else(|| {
            DomainError::Storage("user id must be assigned before insert".to_string())
        })?;

        Ok(UserDocument {
            id: Bson::String(id.to_string()),
            email: user.email.clone(),
            country: user.country.clone(),
            nickname: user.nickname.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
            password: user.password.clone(),
        })
    }
}

/// Equality conjunction over the populated filter fields.
pub fn filter_document(filter: &Filter) -> Document {
    let mut document = Document::new();
    for (field, value) in filter.predicates() {
        document.insert(field.as_str(), value);
    }
    document
}

/// `$set` over every mutable field. `_id` is never part of it.
pub fn update_document(user: &User) -> Document {
    doc! {
        "$set": {
            "email": user.email.as_str(),
            "country": user.country.as_str(),
            "nickname": user.nickname.as_str(),
            "lastName": user.last_name.as_str(),
            "firstName": user.first_name.as_str(),
            "password": user.password.as_str(),
        }
    }
}

fn storage_error(e: MongoError) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn is_decode_error(e: &MongoError) -> bool {
    matches!(*e.kind, ErrorKind::BsonDeserialization(_))
}

pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }

    /// Decodes every document the query yields. Documents that fail to decode
    /// are logged and skipped; transport failures abort the query.
    async fn find_documents(&self, filter: Document) -> Result<Vec<User>, DomainError> {
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(storage_error)?;

        let mut users = Vec::new();
        loop {
            match cursor.try_next().await {
                Ok(Some(document)) => users.push(User::from(document)),
                Ok(None) => break,
                Err(e) if is_decode_error(&e) => {
                    warn!(error = %e, "skipping undecodable user document");
                }
                Err(e) => return Err(storage_error(e)),
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        self.find_documents(Document::new()).await
    }

    async fn find_all_by_filter(&self, filter: &Filter) -> Result<Vec<User>, DomainError> {
        let users = self.find_documents(filter_document(filter)).await?;
        Ok(users.into_iter().map(User::redacted).collect())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
        let document = self
            .collection
            .find_one(doc! { "nickname": nickname }, None)
            .await
            .map_err(storage_error)?;

        Ok(document.map(User::from))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let document = UserDocument::try_from(user)?;

        self.collection
            .insert_one(&document, None)
            .await
            .map_err(storage_error)?;

        Ok(user.clone())
    }

    async fn update_by_nickname(&self, nickname: &str, user: &User) -> Result<u64, DomainError> {
        let result = self
            .collection
            .update_one(doc! { "nickname": nickname }, update_document(user), None)
            .await
            .map_err(storage_error)?;

        Ok(result.matched_count)
    }

    async fn delete(&self, nickname: &str) -> Result<(), DomainError> {
        self.collection
            .delete_one(doc! { "nickname": nickname }, None)
            .await
            .map_err(storage_error)?;

        Ok(())
    }
}
