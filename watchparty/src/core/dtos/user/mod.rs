pub mod update_profile_dto;
