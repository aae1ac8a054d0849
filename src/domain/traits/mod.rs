//! Domain traits - Abstractions for infrastructure implementations

pub mod messageable;

pub use messageable::{MessageHandle, Messageable};
