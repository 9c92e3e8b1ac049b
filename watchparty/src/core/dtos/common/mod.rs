pub mod room_filter_dto;
