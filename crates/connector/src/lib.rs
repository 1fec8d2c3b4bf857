//! Event sources feeding snapshots to the reminder engine.
//!
//! The engine never manages storage. It pulls a full snapshot at the start of
//! every tick from one of these sources:
//! - [`SharedSnapshot`]: in-memory, replaced wholesale by the host
//! - [`FileSource`]: JSON file re-read on every pull
//! - [`HttpSource`]: the event store's list endpoint

pub mod file;
pub mod http;
pub mod memory;
pub mod source;

pub use file::FileSource;
pub use http::HttpSource;
pub use memory::SharedSnapshot;
pub use source::{EventSource, SourceError};
