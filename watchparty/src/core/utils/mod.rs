pub mod id_utils;
pub mod jwt_utils;
