//! Message handling - parsing and dispatch of incoming messages

pub mod context;
pub mod dispatcher;
pub mod parser;

pub use context::Context;
pub use dispatcher::{DispatchOptions, DispatchOutcome, Dispatcher};
pub use parser::{MessageParser, Parsed};
