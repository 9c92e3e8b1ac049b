use chrono::{NaiveDateTime, Utc};
use salvo::async_trait;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::core::dtos::common::room_filter_dto::RoomFilterDto;
use crate::core::dtos::room::create_room_dto::CreateRoomDto;
use crate::core::dtos::room::update_room_dto::UpdateRoomDto;
use crate::core::entities::models::{NewRoom, Room, RoomChangeset, RoomQuery, RoomSettings};
use crate::core::types::errors::room_error::RoomError;
use crate::core::types::identity::Identity;
use crate::core::types::responses::list_room_response::ListRoomResponse;
use crate::core::types::responses::room_response::RoomResponse;
use crate::core::utils::id_utils::{generate_room_id, is_valid_room_id};
use crate::features::room::repository::{RoomRepository, RoomRepositoryImpl};

#[async_trait]
pub trait RoomService: Send + Sync {
    async fn create_room(
        &self,
        data: CreateRoomDto,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError>;

    async fn get_room_by_id(
        &self,
        room_id: &str,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError>;

    async fn update_room(
        &self,
        data: UpdateRoomDto,
        room_id: &str,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError>;

    async fn delete_room(&self, room_id: &str, caller: &Identity) -> Result<(), RoomError>;

    async fn join_room(&self, room_id: &str, caller: &Identity) -> Result<RoomResponse, RoomError>;

    /// Gives one participant slot back. The count never drops below zero:
    /// leaving a room that is already empty succeeds and changes nothing.
    /// Fails only for a malformed id or a missing room.
    async fn leave_room(&self, room_id: &str, caller: &Identity) -> Result<(), RoomError>;

    async fn get_rooms(
        &self,
        filter: RoomFilterDto,
        caller: Option<&Identity>,
    ) -> Result<ListRoomResponse, RoomError>;

    async fn get_rooms_by_owner(
        &self,
        user_id: &str,
        caller: &Identity,
    ) -> Result<Vec<RoomResponse>, RoomError>;
}

pub type DefaultRoomService = RoomServiceImpl<RoomRepositoryImpl>;

#[derive(Debug, Clone)]
pub struct RoomServiceImpl<R: RoomRepository> {
    room_repository: R,
}

impl<R: RoomRepository> RoomServiceImpl<R> {
    pub fn new(room_repository: R) -> Self {
        Self { room_repository }
    }
}

fn ensure_room_id(room_id: &str) -> Result<(), RoomError> {
    if is_valid_room_id(room_id) {
        Ok(())
    } else {
        Err(RoomError::InvalidRoomId(room_id.to_string()))
    }
}

fn ensure_owner(room: &Room, caller: &Identity, action: &str) -> Result<(), RoomError> {
    if room.is_owned_by(&caller.id) {
        Ok(())
    } else {
        Err(RoomError::Forbidden(format!(
            "Only room owner can {action} the room"
        )))
    }
}

/// Turns an owner edit into a column patch. Only the fields present in
/// `data` are carried over; settings flags fall back to the room's current
/// values one by one.
pub fn build_changeset(
    data: UpdateRoomDto,
    current: &Room,
    now: NaiveDateTime,
) -> Result<RoomChangeset, RoomError> {
    data.validate()?;

    let name = match data.name {
        Some(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(RoomError::Validation(
                    "Room name cannot be empty".to_string(),
                ));
            }
            Some(name.to_string())
        }
        None => None,
    };

    let settings = data
        .settings
        .map(|settings| settings.merge_onto(current.settings()));

    Ok(RoomChangeset {
        name,
        description: data.description.map(|d| d.trim().to_string()),
        is_public: data.is_public,
        max_participants: data.max_participants,
        video_url: data.video_url.map(|v| v.trim().to_string()),
        allow_guests: settings.map(|s| s.allow_guests),
        require_approval: settings.map(|s| s.require_approval),
        auto_start: settings.map(|s| s.auto_start),
        updated_at: Some(now),
    })
}

#[async_trait]
impl<R: RoomRepository + Send + Sync> RoomService for RoomServiceImpl<R> {
    async fn create_room(
        &self,
        data: CreateRoomDto,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError> {
        data.validate()?;

        let name = data.name.trim();
        if name.is_empty() {
            return Err(RoomError::Validation("Room name is required".to_string()));
        }

        let now = Utc::now().naive_utc();
        let room_id = generate_room_id();
        let settings = data
            .settings
            .unwrap_or_default()
            .merge_onto(RoomSettings::default());

        let new_room = NewRoom {
            id: &room_id,
            name,
            description: data.description.as_deref().map(str::trim),
            owner_id: &caller.id,
            is_public: data.is_public.unwrap_or(true),
            max_participants: data.max_participants,
            // The owner occupies the first slot.
            current_participants: 1,
            video_url: data.video_url.as_deref().map(str::trim),
            allow_guests: settings.allow_guests,
            require_approval: settings.require_approval,
            auto_start: settings.auto_start,
            created_at: now,
            updated_at: now,
        };

        let room = self.room_repository.create_room(new_room).await?;

        info!("Room {} created by {}", room.id, room.owner_id);

        Ok(room.into())
    }

    async fn get_room_by_id(
        &self,
        room_id: &str,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError> {
        ensure_room_id(room_id)?;

        let room = self.room_repository.get_room_by_id(room_id).await?;

        if !room.is_visible_to(&caller.id) {
            return Err(RoomError::Forbidden("Access denied".to_string()));
        }

        Ok(room.into())
    }

    async fn update_room(
        &self,
        data: UpdateRoomDto,
        room_id: &str,
        caller: &Identity,
    ) -> Result<RoomResponse, RoomError> {
        ensure_room_id(room_id)?;

        let room = self.room_repository.get_room_by_id(room_id).await?;

        ensure_owner(&room, caller, "update")?;

        let changes = build_changeset(data, &room, Utc::now().naive_utc())?;

        let updated_room = self.room_repository.update_room(room_id, changes).await?;

        Ok(updated_room.into())
    }

    async fn delete_room(&self, room_id: &str, caller: &Identity) -> Result<(), RoomError> {
        ensure_room_id(room_id)?;

        let room = self.room_repository.get_room_by_id(room_id).await?;

        ensure_owner(&room, caller, "delete")?;

        self.room_repository.delete_room_by_id(room_id).await?;

        info!("Room {} deleted by {}", room_id, caller.id);

        Ok(())
    }

    async fn join_room(&self, room_id: &str, caller: &Identity) -> Result<RoomResponse, RoomError> {
        ensure_room_id(room_id)?;

        let room = self.room_repository.get_room_by_id(room_id).await?;

        if !room.is_visible_to(&caller.id) {
            return Err(RoomError::Forbidden(
                "Access denied. This is a private room.".to_string(),
            ));
        }

        if room.is_full() {
            return Err(RoomError::RoomFull(room_id.to_string()));
        }

        let now = Utc::now().naive_utc();

        match self
            .room_repository
            .increment_participants(room_id, now)
            .await?
        {
            Some(room) => {
                debug!(
                    "{} joined room {} ({} participants)",
                    caller.id, room.id, room.current_participants
                );
                Ok(room.into())
            }
            None => {
                // Either deleted or filled up since the read above.
                self.room_repository.get_room_by_id(room_id).await?;
                Err(RoomError::RoomFull(room_id.to_string()))
            }
        }
    }

    async fn leave_room(&self, room_id: &str, caller: &Identity) -> Result<(), RoomError> {
        ensure_room_id(room_id)?;

        let now = Utc::now().naive_utc();

        match self
            .room_repository
            .decrement_participants(room_id, now)
            .await?
        {
            Some(room) => {
                debug!(
                    "{} left room {} ({} participants)",
                    caller.id, room.id, room.current_participants
                );
            }
            None => {
                self.room_repository.get_room_by_id(room_id).await?;
                warn!(
                    "{} left room {} which has no participants, count kept at 0",
                    caller.id, room_id
                );
            }
        }

        Ok(())
    }

    async fn get_rooms(
        &self,
        filter: RoomFilterDto,
        caller: Option<&Identity>,
    ) -> Result<ListRoomResponse, RoomError> {
        let page = filter.page();
        let limit = filter.limit();
        let skip = filter.skip();

        let query = RoomQuery {
            viewer_id: caller.map(|c| c.id.clone()),
            search: filter.search().map(str::to_string),
            is_public: filter.is_public,
            owner_id: filter.owner_id.clone(),
            skip,
            limit,
        };

        let total = self.room_repository.count(&query).await?;
        let rooms = self.room_repository.find_all(&query).await?;

        Ok(ListRoomResponse {
            rooms: rooms.into_iter().map(RoomResponse::from).collect(),
            total,
            page,
            limit,
            has_more: skip.saturating_add(limit) < total,
        })
    }

    async fn get_rooms_by_owner(
        &self,
        user_id: &str,
        caller: &Identity,
    ) -> Result<Vec<RoomResponse>, RoomError> {
        if caller.id != user_id {
            return Err(RoomError::Forbidden("Access denied".to_string()));
        }

        let rooms = self.room_repository.find_by_owner(user_id).await?;

        Ok(rooms.into_iter().map(RoomResponse::from).collect())
    }
}
