//! Data models shared by the classifier, the memory stores and the
//! confirmation queue.

pub mod block;
pub mod confirmation;
pub mod label;
pub mod memory;

pub use block::{ScreenplayBlock, Spacing};
pub use confirmation::{BatchId, CorrelationId, PendingConfirmation, Resolution};
pub use label::ScreenplayLabel;
pub use memory::{normalize_character_name, ContextMemory, MAX_RECENT_CLASSIFICATIONS};
