pub mod create_room_dto;
pub mod room_settings_dto;
pub mod update_room_dto;
