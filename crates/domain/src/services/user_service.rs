use crate::entities::{Filter, User};
use crate::errors::DomainError;
use crate::notifications::UserNotifier;
use crate::repositories::UserRepository;
use crate::services::PasswordHasher;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// What an update did. Callers answer 204 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub notified: bool,
}

/// Rules for the five user operations, expressed over the storage and
/// notification ports.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    notifier: Arc<dyn UserNotifier>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        notifier: Arc<dyn UserNotifier>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            notifier,
            hasher,
        }
    }

    /// List users matching the filter, passwords stripped
    pub async fn list_users(&self, filter: &Filter) -> Result<Vec<User>, DomainError> {
        let users = self.user_repository.find_all_by_filter(filter).await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// Get user by nickname. The stored hash is returned as is.
    pub async fn get_user(&self, nickname: &str) -> Result<User, DomainError> {
        match self.user_repository.find_by_nickname(nickname).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::NotFound {
                nickname: nickname.to_string(),
            }),
        }
    }

    /// Create a new user with business validation.
    ///
    /// The nickname check and the insert are two separate store calls, so two
    /// concurrent creates with the same nickname can both succeed.
    pub async fn create_user(&self, mut user: User) -> Result<User, DomainError> {
        user.validate()?;

        if self
            .user_repository
            .find_by_nickname(&user.nickname)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict {
                nickname: user.nickname,
            });
        }

        user.password = self.hasher.hash(&user.password).await?;
        user.id = Some(Uuid::new_v4());

        let saved = self.user_repository.save(&user).await?;
        info!(nickname = %saved.nickname, "user created");
        Ok(saved)
    }

    /// Overwrite the user stored under `nickname` and notify when something matched.
    /// No validation or existence check happens before the write.
    pub async fn update_user(
        &self,
        nickname: &str,
        mut user: User,
    ) -> Result<UpdateOutcome, DomainError> {
        user.password = self.hasher.hash(&user.password).await?;

        let matched = self
            .user_repository
            .update_by_nickname(nickname, &user)
            .await?;

        if matched == 0 {
            debug!(nickname, "update matched no user");
            return Ok(UpdateOutcome {
                matched,
                notified: false,
            });
        }

        self.notifier.publish(&user).await?;
        info!(nickname, "user updated");

        Ok(UpdateOutcome {
            matched,
            notified: true,
        })
    }

    /// Delete user. Deleting an unknown nickname succeeds.
    pub async fn delete_user(&self, nickname: &str) -> Result<(), DomainError> {
        self.user_repository.delete(nickname).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRepository {
        users: Mutex<Vec<User>>,
        fail_lookups: bool,
        fail_writes: bool,
    }

    impl FakeRepository {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: Mutex::new(users),
                ..Default::default()
            }
        }

        fn stored(&self) -> Vec<User> {
            self.users.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserRepository for FakeRepository {
        async fn find_all(&self) -> Result<Vec<User>, DomainError> {
            Ok(self.stored())
        }

        async fn find_all_by_filter(&self, filter: &Filter) -> Result<Vec<User>, DomainError> {
            if self.fail_lookups {
                return Err(DomainError::Storage("error on mongo".to_string()));
            }
            Ok(self
                .stored()
                .into_iter()
                .filter(|u| filter.matches(u))
                .map(User::redacted)
                .collect())
        }

        async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, DomainError> {
            if self.fail_lookups {
                return Err(DomainError::Storage("error on mongo".to_string()));
            }
            Ok(self.stored().into_iter().find(|u| u.nickname == nickname))
        }

        async fn save(&self, user: &User) -> Result<User, DomainError> {
            if self.fail_writes {
                return Err(DomainError::Storage("insert failed".to_string()));
            }
            self.users.lock().unwrap().push(user.clone());
            Ok(user.clone())
        }

        async fn update_by_nickname(&self, nickname: &str, user: &User) -> Result<u64, DomainError> {
            if self.fail_writes {
                return Err(DomainError::Storage("update failed".to_string()));
            }
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.nickname == nickname) {
                Some(stored) => {
                    let id = stored.id;
                    *stored = User { id, ..user.clone() };
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete(&self, nickname: &str) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::Storage("delete failed".to_string()));
            }
            let mut users = self.users.lock().unwrap();
            if let Some(pos) = users.iter().position(|u| u.nickname == nickname) {
                users.remove(pos);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        published: Mutex<Vec<User>>,
        fail: bool,
    }

    #[async_trait]
    impl UserNotifier for RecordingNotifier {
        async fn publish(&self, user: &User) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::Notify("topic does not exist".to_string()));
            }
            self.published.lock().unwrap().push(user.clone());
            Ok(())
        }
    }

    fn user(nickname: &str) -> User {
        User::new(
            "test@test.com",
            "UK",
            nickname,
            "lastName",
            "firstName",
            "password",
        )
    }

    fn service(
        repository: Arc<FakeRepository>,
        notifier: Arc<RecordingNotifier>,
    ) -> UserService {
        UserService::new(repository, notifier, PasswordHasher::default())
    }

    #[tokio::test]
    async fn create_hashes_password_and_assigns_id() {
        let repository = Arc::new(FakeRepository::default());
        let svc = service(repository.clone(), Arc::new(RecordingNotifier::default()));

        let created = svc.create_user(user("n1")).await.unwrap();

        assert!(created.id.is_some());
        assert_ne!(created.password, "password");
        let hasher = PasswordHasher::default();
        assert!(hasher.verify("password", &created.password).await.unwrap());
        assert_eq!(repository.stored().len(), 1);
    }

    #[tokio::test]
    async fn create_then_get_round_trips_profile_fields() {
        let svc = service(
            Arc::new(FakeRepository::default()),
            Arc::new(RecordingNotifier::default()),
        );

        svc.create_user(user("n1")).await.unwrap();
        let fetched = svc.get_user("n1").await.unwrap();

        assert_eq!(fetched.email, "test@test.com");
        assert_eq!(fetched.country, "UK");
        assert_eq!(fetched.first_name, "firstName");
        assert_eq!(fetched.last_name, "lastName");
        assert!(!fetched.password.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_existing_nickname_without_inserting() {
        let repository = Arc::new(FakeRepository::with_users(vec![user("n1")]));
        let svc = service(repository.clone(), Arc::new(RecordingNotifier::default()));

        let err = svc.create_user(user("n1")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { ref nickname } if nickname == "n1"));
        assert_eq!(err.to_string(), "user with nick name n1 already exist!");
        assert_eq!(repository.stored().len(), 1);
    }

    #[tokio::test]
    async fn create_validates_before_touching_storage() {
        let repository = Arc::new(FakeRepository {
            fail_lookups: true,
            ..Default::default()
        });
        let svc = service(repository, Arc::new(RecordingNotifier::default()));

        let err = svc.create_user(User::default()).await.unwrap_err();

        match err {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 6),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_stops_on_lookup_failure() {
        let repository = Arc::new(FakeRepository {
            fail_lookups: true,
            ..Default::default()
        });
        let svc = service(repository.clone(), Arc::new(RecordingNotifier::default()));

        let err = svc.create_user(user("n1")).await.unwrap_err();

        assert!(matches!(err, DomainError::Storage(_)));
        assert!(repository.stored().is_empty());
    }

    #[tokio::test]
    async fn create_surfaces_save_failure() {
        let repository = Arc::new(FakeRepository {
            fail_writes: true,
            ..Default::default()
        });
        let svc = service(repository.clone(), Arc::new(RecordingNotifier::default()));

        let err = svc.create_user(user("n1")).await.unwrap_err();

        assert!(matches!(err, DomainError::Storage(ref msg) if msg == "insert failed"));
        assert!(repository.stored().is_empty());
    }

    #[tokio::test]
    async fn get_unknown_nickname_is_not_found() {
        let svc = service(
            Arc::new(FakeRepository::default()),
            Arc::new(RecordingNotifier::default()),
        );

        let err = svc.get_user("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "user with nickname ghost not found!");
    }

    #[tokio::test]
    async fn update_without_match_does_not_notify() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(Arc::new(FakeRepository::default()), notifier.clone());

        let outcome = svc.update_user("ghost", user("ghost")).await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 0,
                notified: false
            }
        );
        assert!(notifier.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_match_notifies_once_with_hashed_record() {
        let stored = user("n1").with_id(Uuid::new_v4());
        let original_id = stored.id;
        let repository = Arc::new(FakeRepository::with_users(vec![stored]));
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(repository.clone(), notifier.clone());

        let mut changes = user("n1");
        changes.country = "BR".to_string();
        let outcome = svc.update_user("n1", changes).await.unwrap();

        assert!(outcome.notified);
        let published = notifier.published.lock().unwrap().clone();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].country, "BR");
        assert_ne!(published[0].password, "password");

        let after = repository.stored();
        assert_eq!(after[0].id, original_id);
        assert_eq!(after[0].country, "BR");
    }

    #[tokio::test]
    async fn update_surfaces_notify_failure() {
        let repository = Arc::new(FakeRepository::with_users(vec![user("n1")]));
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let svc = service(repository, notifier);

        let err = svc.update_user("n1", user("n1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Notify(_)));
    }

    #[tokio::test]
    async fn update_storage_failure_does_not_notify() {
        let repository = Arc::new(FakeRepository {
            users: Mutex::new(vec![user("n1")]),
            fail_writes: true,
            ..Default::default()
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(repository, notifier.clone());

        let err = svc.update_user("n1", user("n1")).await.unwrap_err();

        assert!(matches!(err, DomainError::Storage(ref msg) if msg == "update failed"));
        assert!(notifier.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repository = Arc::new(FakeRepository::with_users(vec![user("n1")]));
        let svc = service(repository.clone(), Arc::new(RecordingNotifier::default()));

        svc.delete_user("n1").await.unwrap();
        svc.delete_user("n1").await.unwrap();
        svc.delete_user("never-existed").await.unwrap();

        assert!(repository.stored().is_empty());
    }

    #[tokio::test]
    async fn list_strips_passwords() {
        let repository = Arc::new(FakeRepository::with_users(vec![user("n1"), user("n2")]));
        let svc = service(repository, Arc::new(RecordingNotifier::default()));

        let users = svc.list_users(&Filter::new()).await.unwrap();

        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.password.is_empty()));
    }
}
