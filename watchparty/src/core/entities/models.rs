use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::database::schema::{rooms, users};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub is_public: bool,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub video_url: Option<String>,
    pub allow_guests: bool,
    pub require_approval: bool,
    pub auto_start: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Room {
    pub fn settings(&self) -> RoomSettings {
        RoomSettings {
            allow_guests: self.allow_guests,
            require_approval: self.require_approval,
            auto_start: self.auto_start,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Private rooms are only reachable by their owner.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }

    pub fn is_full(&self) -> bool {
        matches!(self.max_participants, Some(max) if self.current_participants >= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSettings {
    pub allow_guests: bool,
    pub require_approval: bool,
    pub auto_start: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            allow_guests: true,
            require_approval: false,
            auto_start: true,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = rooms)]
pub struct NewRoom<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub owner_id: &'a str,
    pub is_public: bool,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub video_url: Option<&'a str>,
    pub allow_guests: bool,
    pub require_approval: bool,
    pub auto_start: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Column-level patch for an existing room. `None` leaves the column as is.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = rooms)]
pub struct RoomChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub max_participants: Option<i32>,
    pub video_url: Option<String>,
    pub allow_guests: Option<bool>,
    pub require_approval: Option<bool>,
    pub auto_start: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Listing criteria handed to the store. Built by the room service from the
/// caller and the request filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomQuery {
    /// Authenticated caller; their private rooms are included.
    pub viewer_id: Option<String>,
    pub search: Option<String>,
    pub is_public: Option<bool>,
    pub owner_id: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

/// Whole-profile replacement. `None` clears the column.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub struct ProfileChangeset {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub updated_at: NaiveDateTime,
}
