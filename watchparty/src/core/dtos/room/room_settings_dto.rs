use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use crate::core::entities::models::RoomSettings;

/// Partial room settings. Every flag is optional on its own.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettingsDto {
    pub allow_guests: Option<bool>,
    pub require_approval: Option<bool>,
    pub auto_start: Option<bool>,
}

impl RoomSettingsDto {
    /// Fills each missing flag from `base`.
    pub fn merge_onto(self, base: RoomSettings) -> RoomSettings {
        RoomSettings {
            allow_guests: self.allow_guests.unwrap_or(base.allow_guests),
            require_approval: self.require_approval.unwrap_or(base.require_approval),
            auto_start: self.auto_start.unwrap_or(base.auto_start),
        }
    }
}
