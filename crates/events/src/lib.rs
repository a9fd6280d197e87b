//! Domain events emitted from order operations.

pub mod event;

pub use event::{Event, RecordedEvent};
