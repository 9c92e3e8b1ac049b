pub mod common;
pub mod room;
pub mod user;
