//! Hotel reservation engine: quotes, atomic booking commits, and
//! time-windowed cancellation refunds, serialized per room.
//!
//! The request-handling layer (HTTP, wire protocols) lives outside this
//! crate; an embedding server constructs an [`Engine`] and drives it
//! directly.

pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod wal;

pub use config::EngineConfig;
pub use engine::{Engine, EngineError};
