//! Application services - channel operations and background tasks

pub mod message_service;
pub mod status;

pub use status::{Presence, StatusRotator};
