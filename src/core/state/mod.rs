//! Resume state
//!
//! [`resolve_checkpoint`] derives the resume position from prior run history.
//! [`HistoryStore`] keeps that history locally when no scheduler provides it.

pub mod resolver;
pub mod store;

pub use resolver::{resolve_checkpoint, CHECKPOINT_FIELD};
pub use store::{read_history_document, HistoryStore, DEFAULT_HISTORY_PATH};
