//! Domain entities - Core chat objects

pub mod command;
pub mod message;
pub mod user;

pub use command::{Command, CommandRegistry};
pub use message::{Embed, Message, OutgoingMessage};
pub use user::User;
