//! Trace container and JSON trace-event output.
//!
//! The container is the format-neutral form of a converted session: devices
//! (JSON `pid`s) with their resources (JSON `tid`s), plus a flat list of
//! complete events. It is filled by [`crate::convert`] and consumed by
//! [`json::to_json`].
//!
//! # Module Organization
//!
//! - [`models`]: Device, resource, event and container types
//! - [`json`]: Serialization to the JSON trace-event format
//! - [`constants`]: Well-known plane names, device ids and limits

pub mod constants;
pub mod json;
pub mod models;

// Re-export commonly used types
pub use json::to_json;
pub use models::*;
