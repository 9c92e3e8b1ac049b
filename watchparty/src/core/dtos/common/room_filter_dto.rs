use salvo::oapi::ToParameters;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

pub const MAX_PAGE_LIMIT: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToParameters)]
#[serde(rename_all = "camelCase")]
#[salvo(parameters(default_parameter_in = Query, rename_all = "camelCase"))]
pub struct RoomFilterDto {
    /// Case-insensitive text matched against room name and description.
    pub search: Option<String>,

    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,

    pub is_public: Option<bool>,

    pub owner_id: Option<String>,
}

impl Default for RoomFilterDto {
    fn default() -> Self {
        Self {
            search: None,
            page: default_page(),
            limit: default_limit(),
            is_public: None,
            owner_id: None,
        }
    }
}

impl RoomFilterDto {
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Saturates instead of overflowing, so an absurd page is simply empty.
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Blank search text counts as no search.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
