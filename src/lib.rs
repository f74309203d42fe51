//! xspace2json library - shared modules for the `xspace2json` binary and its tests.
//!
//! This library loads profiler sessions serialized as `XSpace` protobufs and
//! converts them into the JSON trace-event format understood by
//! chrome://tracing and ui.perfetto.dev.
//!
//! # Modules
//!
//! - [`protos`] - Rust types generated from `proto/xplane.proto`
//! - [`xspace`] - Loading and summarizing `XSpace` session files
//! - [`convert`] - `XSpace` to [`trace::TraceContainer`] conversion
//! - [`trace`] - Trace container and its JSON serialization
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xspace2json::{convert, trace, xspace};
//!
//! let space = xspace::load_xspace(Path::new("./session.xplane.pb"))
//!     .expect("Failed to load session");
//! eprintln!("{}", xspace::SessionSummary::of(&space));
//!
//! let container = convert::xspace_to_trace_container(&space);
//! let json = trace::to_json(&container, false).expect("Failed to serialize trace");
//! println!("{json}");
//! ```

/// Generated `tensorflow.profiler` protobuf types.
pub mod protos {
    include!(concat!(env!("OUT_DIR"), "/protos/mod.rs"));
}

pub mod convert;
pub mod trace;
pub mod utils;
pub mod xspace;

// Re-export for convenience
pub use convert::xspace_to_trace_container;
pub use trace::{to_json, TraceContainer};
pub use xspace::{load_xspace, LoadError, SessionSummary};
