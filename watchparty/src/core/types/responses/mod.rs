pub mod confirmation_response;
pub mod failed_response;
pub mod list_room_response;
pub mod room_response;
pub mod user_response;
