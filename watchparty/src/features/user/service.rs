use chrono::{NaiveDateTime, Utc};
use salvo::async_trait;
use tracing::info;
use validator::Validate;

use crate::core::dtos::user::update_profile_dto::{ProfileDto, UpdateProfileDto};
use crate::core::entities::models::{NewUser, ProfileChangeset};
use crate::core::types::errors::user_error::UserError;
use crate::core::types::identity::Identity;
use crate::core::types::responses::user_response::UserResponse;
use crate::features::user::repository::{UserRepository, UserRepositoryImpl};

#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the caller's record, creating it from the token identity the
    /// first time and stamping the login time on every call.
    async fn get_me(&self, caller: &Identity) -> Result<UserResponse, UserError>;

    async fn update_profile(
        &self,
        data: UpdateProfileDto,
        caller: &Identity,
    ) -> Result<(), UserError>;
}

pub type DefaultUserService = UserServiceImpl<UserRepositoryImpl>;

#[derive(Debug, Clone)]
pub struct UserServiceImpl<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> UserServiceImpl<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }
}

fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// The stored profile is replaced as a whole, so anything not in `profile`
/// is cleared.
pub fn profile_changeset(profile: ProfileDto, now: NaiveDateTime) -> ProfileChangeset {
    let preferences = profile.preferences.unwrap_or_default();

    ProfileChangeset {
        display_name: trimmed(profile.display_name),
        bio: trimmed(profile.bio),
        theme: preferences.theme.map(|theme| theme.as_str().to_string()),
        notifications: preferences.notifications,
        updated_at: now,
    }
}

#[async_trait]
impl<R: UserRepository + Send + Sync> UserService for UserServiceImpl<R> {
    async fn get_me(&self, caller: &Identity) -> Result<UserResponse, UserError> {
        let now = Utc::now().naive_utc();

        let user = self
            .user_repository
            .upsert_user(NewUser {
                id: &caller.id,
                email: &caller.email,
                created_at: now,
                updated_at: now,
                last_login_at: Some(now),
            })
            .await?;

        Ok(user.into())
    }

    async fn update_profile(
        &self,
        data: UpdateProfileDto,
        caller: &Identity,
    ) -> Result<(), UserError> {
        data.validate()?;

        let Some(profile) = data.profile else {
            return Err(UserError::Validation("Invalid profile data".to_string()));
        };

        let changes = profile_changeset(profile, Utc::now().naive_utc());
        self.user_repository
            .update_profile(&caller.id, changes)
            .await?;

        info!("Profile of {} updated", caller.id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dtos::user::update_profile_dto::{PreferencesDto, Theme};
    use crate::core::entities::models::User;
    use chrono::DateTime;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: format!("{id}@example.com"),
        }
    }

    fn at(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn profile(display_name: &str, bio: Option<&str>, theme: Option<Theme>) -> UpdateProfileDto {
        UpdateProfileDto {
            profile: Some(ProfileDto {
                display_name: Some(display_name.to_string()),
                bio: bio.map(str::to_string),
                preferences: Some(PreferencesDto {
                    theme,
                    notifications: None,
                }),
            }),
        }
    }

    #[derive(Clone, Default)]
    struct InMemoryUserRepository {
        users: Arc<Mutex<Vec<User>>>,
    }

    impl InMemoryUserRepository {
        fn snapshot(&self, user_id: &str) -> Option<User> {
            self.users.lock().iter().find(|u| u.id == user_id).cloned()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn upsert_user(&self, user: NewUser<'_>) -> Result<User, UserError> {
            let mut users = self.users.lock();

            if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
                existing.email = user.email.to_string();
                existing.last_login_at = user.last_login_at;
                return Ok(existing.clone());
            }

            let created = User {
                id: user.id.to_string(),
                email: user.email.to_string(),
                display_name: None,
                bio: None,
                theme: None,
                notifications: None,
                created_at: user.created_at,
                updated_at: user.updated_at,
                last_login_at: user.last_login_at,
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn update_profile(
            &self,
            user_id: &str,
            changes: ProfileChangeset,
        ) -> Result<User, UserError> {
            let mut users = self.users.lock();
            let user = users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| UserError::UserNotFound(user_id.to_string()))?;

            user.display_name = changes.display_name;
            user.bio = changes.bio;
            user.theme = changes.theme;
            user.notifications = changes.notifications;
            user.updated_at = changes.updated_at;
            Ok(user.clone())
        }
    }

    fn service(repo: &InMemoryUserRepository) -> UserServiceImpl<InMemoryUserRepository> {
        UserServiceImpl::new(repo.clone())
    }

    #[tokio::test]
    async fn test_get_me_creates_the_record_on_first_call() {
        let repo = InMemoryUserRepository::default();
        let alice = identity("alice");

        let me = service(&repo).get_me(&alice).await.unwrap();

        assert_eq!(me.id, "alice");
        assert_eq!(me.email, "alice@example.com");
        assert_eq!(me.profile, None);
        assert!(me.last_login_at.is_some());
        assert!(repo.snapshot("alice").is_some());
    }

    #[tokio::test]
    async fn test_get_me_keeps_creation_time_and_profile() {
        let repo = InMemoryUserRepository::default();
        let alice = identity("alice");
        let service = service(&repo);

        service.get_me(&alice).await.unwrap();
        repo.users.lock()[0].created_at = at(1_000);
        service
            .update_profile(profile("Alice", None, Some(Theme::Dark)), &alice)
            .await
            .unwrap();

        let me = service.get_me(&alice).await.unwrap();

        assert_eq!(me.created_at, "1970-01-01T00:16:40.000Z");
        let profile = me.profile.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(
            profile.preferences.and_then(|p| p.theme).as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_update_without_profile_is_rejected() {
        let repo = InMemoryUserRepository::default();
        let alice = identity("alice");
        service(&repo).get_me(&alice).await.unwrap();

        let result = service(&repo)
            .update_profile(UpdateProfileDto { profile: None }, &alice)
            .await;

        assert_eq!(
            result,
            Err(UserError::Validation("Invalid profile data".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_for_unknown_user_is_not_found() {
        let repo = InMemoryUserRepository::default();

        let result = service(&repo)
            .update_profile(profile("Ghost", None, None), &identity("ghost"))
            .await;

        assert_eq!(result, Err(UserError::UserNotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_update_replaces_the_whole_profile() {
        let repo = InMemoryUserRepository::default();
        let alice = identity("alice");
        let service = service(&repo);
        service.get_me(&alice).await.unwrap();

        service
            .update_profile(
                profile("Alice", Some("Horror fan"), Some(Theme::Light)),
                &alice,
            )
            .await
            .unwrap();
        service
            .update_profile(profile("  Al  ", None, None), &alice)
            .await
            .unwrap();

        let stored = repo.snapshot("alice").unwrap();
        assert_eq!(stored.display_name.as_deref(), Some("Al"));
        assert_eq!(stored.bio, None);
        assert_eq!(stored.theme, None);
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_display_name() {
        let repo = InMemoryUserRepository::default();
        let alice = identity("alice");
        service(&repo).get_me(&alice).await.unwrap();

        let result = service(&repo)
            .update_profile(profile(&"x".repeat(101), None, None), &alice)
            .await;

        assert!(matches!(result, Err(UserError::Validation(msg)) if msg.contains("profile.display_name")));
        assert_eq!(repo.snapshot("alice").unwrap().display_name, None);
    }

    #[test]
    fn test_blank_text_clears_the_field() {
        let changes = profile_changeset(
            ProfileDto {
                display_name: Some("   ".to_string()),
                bio: Some("".to_string()),
                preferences: None,
            },
            at(0),
        );

        assert_eq!(changes.display_name, None);
        assert_eq!(changes.bio, None);
        assert_eq!(changes.notifications, None);
    }
}
