//! Conversation state shared across pipeline runs.

pub mod history;
pub mod summary;

pub use history::MessageLog;
pub use summary::{SummaryMemory, update_summary};
