use chrono::NaiveDateTime;
use diesel::{
    BoolExpressionMethods, ExpressionMethods, NullableExpressionMethods, OptionalExtension,
    PgConnection, PgTextExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper,
    dsl::delete,
    insert_into,
    pg::Pg,
    query_builder::QueryFragment,
    query_dsl::LoadQuery,
    update,
};
use salvo::async_trait;
use tracing::warn;

use crate::core::{
    database::{
        db::{DbPool, DbPooledConnection},
        schema::rooms,
    },
    entities::models::{NewRoom, Room, RoomChangeset, RoomQuery},
    types::errors::{general::GeneralError, room_error::RoomError},
};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, room: NewRoom<'_>) -> Result<Room, RoomError>;

    async fn get_room_by_id(&self, room_id: &str) -> Result<Room, RoomError>;

    async fn find_all(&self, query: &RoomQuery) -> Result<Vec<Room>, RoomError>;

    async fn count(&self, query: &RoomQuery) -> Result<i64, RoomError>;

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Room>, RoomError>;

    async fn update_room(&self, room_id: &str, changes: RoomChangeset)
    -> Result<Room, RoomError>;

    async fn delete_room_by_id(&self, room_id: &str) -> Result<(), RoomError>;

    /// Adds one participant unless the room is at capacity. `None` when no
    /// row qualified (missing or full).
    async fn increment_participants(
        &self,
        room_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Room>, RoomError>;

    /// Removes one participant unless the count is already zero. `None` when
    /// no row qualified (missing or empty).
    async fn decrement_participants(
        &self,
        room_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Room>, RoomError>;
}

#[derive(Debug, Clone)]
pub struct RoomRepositoryImpl {
    pool: DbPool,
}

impl RoomRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<DbPooledConnection, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

/// Escapes LIKE wildcards so the search text is matched literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn filtered(query: &RoomQuery) -> rooms::BoxedQuery<'_, Pg> {
    let mut statement = rooms::table.into_boxed();

    statement = match query.viewer_id.as_deref() {
        Some(viewer_id) => statement.filter(
            rooms::is_public
                .eq(true)
                .or(rooms::owner_id.eq(viewer_id)),
        ),
        None => statement.filter(rooms::is_public.eq(true)),
    };

    if let Some(search) = query.search.as_deref() {
        let pattern = format!("%{}%", escape_like(search));
        statement = statement.filter(
            rooms::name
                .ilike(pattern.clone())
                .or(rooms::description.ilike(pattern)),
        );
    }

    if let Some(is_public) = query.is_public {
        statement = statement.filter(rooms::is_public.eq(is_public));
    }

    if let Some(owner_id) = query.owner_id.as_deref() {
        statement = statement.filter(rooms::owner_id.eq(owner_id));
    }

    statement
}

/// A single-row `UPDATE ... RETURNING` on the participant counter.
trait ParticipantUpdate<'a>:
    RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, Room> + QueryFragment<Pg>
{
}

impl<'a, T> ParticipantUpdate<'a> for T where
    T: RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, Room> + QueryFragment<Pg>
{
}

/// Capacity check and increment in one statement, so concurrent joins can
/// neither be lost nor overshoot the limit.
fn increment_statement<'a>(
    room_id: &'a str,
    updated_at: NaiveDateTime,
) -> impl ParticipantUpdate<'a> + 'a {
    update(rooms::table)
        .filter(rooms::id.eq(room_id))
        .filter(
            rooms::max_participants.is_null().or(rooms::current_participants
                .nullable()
                .lt(rooms::max_participants)),
        )
        .set((
            rooms::current_participants.eq(rooms::current_participants + 1),
            rooms::updated_at.eq(updated_at),
        ))
        .returning(Room::as_select())
}

fn decrement_statement<'a>(
    room_id: &'a str,
    updated_at: NaiveDateTime,
) -> impl ParticipantUpdate<'a> + 'a {
    update(rooms::table)
        .filter(rooms::id.eq(room_id))
        .filter(rooms::current_participants.gt(0))
        .set((
            rooms::current_participants.eq(rooms::current_participants - 1),
            rooms::updated_at.eq(updated_at),
        ))
        .returning(Room::as_select())
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create_room(&self, room: NewRoom<'_>) -> Result<Room, RoomError> {
        let mut conn = self.get_conn()?;

        let new_room = insert_into(rooms::table)
            .values(&room)
            .returning(Room::as_select())
            .get_result(&mut conn)
            .map_err(|err| RoomError::UnexpectedError(err.to_string()))?;

        Ok(new_room)
    }

    async fn get_room_by_id(&self, room_id: &str) -> Result<Room, RoomError> {
        let mut conn = self.get_conn()?;

        rooms::table
            .find(room_id)
            .select(Room::as_select())
            .first::<Room>(&mut conn)
            .optional()
            .map_err(|err| RoomError::UnexpectedError(err.to_string()))?
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    async fn find_all(&self, query: &RoomQuery) -> Result<Vec<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        let rooms = filtered(query)
            .select(Room::as_select())
            .order(rooms::created_at.desc())
            .offset(query.skip)
            .limit(query.limit)
            .load::<Room>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to find rooms".to_string()))?;

        Ok(rooms)
    }

    async fn count(&self, query: &RoomQuery) -> Result<i64, RoomError> {
        let mut conn = self.get_conn()?;

        filtered(query)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to count rooms".to_string()))
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        let rooms = rooms::table
            .filter(rooms::owner_id.eq(owner_id))
            .select(Room::as_select())
            .order(rooms::created_at.desc())
            .load::<Room>(&mut conn)
            .map_err(|_| RoomError::UnexpectedError("Failed to find owned rooms".to_string()))?;

        Ok(rooms)
    }

    async fn update_room(
        &self,
        room_id: &str,
        changes: RoomChangeset,
    ) -> Result<Room, RoomError> {
        let mut conn = self.get_conn()?;

        update(rooms::table.find(room_id))
            .set(&changes)
            .returning(Room::as_select())
            .get_result::<Room>(&mut conn)
            .optional()
            .map_err(|err| RoomError::UnexpectedError(err.to_string()))?
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    async fn delete_room_by_id(&self, room_id: &str) -> Result<(), RoomError> {
        let mut conn = self.get_conn()?;

        let deleted_rows = delete(rooms::table.find(room_id))
            .execute(&mut conn)
            .map_err(|err| {
                warn!("Failed to delete room {}: {:?}", room_id, err);
                RoomError::UnexpectedError("Failed to delete room".to_string())
            })?;

        if deleted_rows == 0 {
            return Err(RoomError::RoomNotFound(room_id.to_string()));
        }

        Ok(())
    }

    async fn increment_participants(
        &self,
        room_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        increment_statement(room_id, updated_at)
            .get_result::<Room>(&mut conn)
            .optional()
            .map_err(|err| RoomError::UnexpectedError(err.to_string()))
    }

    async fn decrement_participants(
        &self,
        room_id: &str,
        updated_at: NaiveDateTime,
    ) -> Result<Option<Room>, RoomError> {
        let mut conn = self.get_conn()?;

        decrement_statement(room_id, updated_at)
            .get_result::<Room>(&mut conn)
            .optional()
            .map_err(|err| RoomError::UnexpectedError(err.to_string()))
    }
}
