use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    insert_into, pg::Pg, query_builder::QueryFragment, query_dsl::LoadQuery, update,
};
use salvo::async_trait;

use crate::core::{
    database::{
        db::{DbPool, DbPooledConnection},
        schema::users,
    },
    entities::models::{NewUser, ProfileChangeset, User},
    types::errors::{general::GeneralError, user_error::UserError},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user on first sight; afterwards refreshes the email and
    /// the last login time and leaves the profile alone.
    async fn upsert_user(&self, user: NewUser<'_>) -> Result<User, UserError>;

    async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChangeset,
    ) -> Result<User, UserError>;
}

#[derive(Debug, Clone)]
pub struct UserRepositoryImpl {
    pool: DbPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<DbPooledConnection, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

trait UserStatement<'a>:
    RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, User> + QueryFragment<Pg>
{
}

impl<'a, T> UserStatement<'a> for T where
    T: RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, User> + QueryFragment<Pg>
{
}

fn upsert_statement<'a>(user: &'a NewUser<'a>) -> impl UserStatement<'a> + 'a {
    insert_into(users::table)
        .values(user)
        .on_conflict(users::id)
        .do_update()
        .set((
            users::email.eq(user.email),
            users::last_login_at.eq(user.last_login_at),
        ))
        .returning(User::as_select())
}

fn profile_statement<'a>(
    user_id: &'a str,
    changes: &'a ProfileChangeset,
) -> impl UserStatement<'a> + 'a {
    update(users::table.find(user_id))
        .set(changes)
        .returning(User::as_select())
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn upsert_user(&self, user: NewUser<'_>) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        upsert_statement(&user)
            .get_result::<User>(&mut conn)
            .map_err(|err| UserError::UnexpectedError(err.to_string()))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: ProfileChangeset,
    ) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        profile_statement(user_id, &changes)
            .get_result::<User>(&mut conn)
            .optional()
            .map_err(|err| UserError::UnexpectedError(err.to_string()))?
            .ok_or_else(|| UserError::UserNotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDateTime};
    use diesel::debug_query;

    fn at_epoch() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    #[test]
    fn test_upsert_keeps_profile_columns_out_of_the_conflict_update() {
        let user = NewUser {
            id: "alice",
            email: "alice@example.com",
            created_at: at_epoch(),
            updated_at: at_epoch(),
            last_login_at: Some(at_epoch()),
        };
        let statement = upsert_statement(&user);
        let sql = debug_query::<Pg, _>(&statement).to_string();

        assert!(sql.starts_with(r#"INSERT INTO "users""#), "{sql}");
        let (_, on_conflict) = sql.split_once(r#"ON CONFLICT ("id") DO UPDATE SET"#).unwrap();
        let (on_conflict, _) = on_conflict.split_once("RETURNING").unwrap();
        assert!(on_conflict.contains(r#""email" = $"#), "{sql}");
        assert!(on_conflict.contains(r#""lastLoginAt" = $"#), "{sql}");
        assert!(!on_conflict.contains("displayName"), "{sql}");
        assert!(!on_conflict.contains(r#""createdAt""#), "{sql}");
    }

    #[test]
    fn test_profile_update_writes_absent_fields_as_null() {
        let changes = ProfileChangeset {
            display_name: Some("Alice".to_string()),
            bio: None,
            theme: None,
            notifications: None,
            updated_at: at_epoch(),
        };
        let statement = profile_statement("alice", &changes);
        let sql = debug_query::<Pg, _>(&statement).to_string();

        assert!(sql.starts_with(r#"UPDATE "users" SET"#), "{sql}");
        assert!(sql.contains(r#""displayName" = $"#), "{sql}");
        assert!(sql.contains(r#""bio" = $"#), "{sql}");
        assert!(sql.contains(r#""theme" = $"#), "{sql}");
        assert!(sql.contains(r#""notifications" = $"#), "{sql}");
        assert!(sql.contains(r#""users"."id" = $"#), "{sql}");
        assert!(sql.contains("None"), "{sql}");
    }
}
