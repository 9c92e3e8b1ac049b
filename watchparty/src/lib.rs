pub mod core;
pub mod features;
