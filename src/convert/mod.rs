//! Trace format conversion utilities
//!
//! This module converts decoded `XSpace` sessions into the format-neutral
//! [`crate::trace::TraceContainer`], which the JSON writer then serializes.

mod xplane_to_trace;

pub use xplane_to_trace::{
    assign_device_ids, assign_resource_ids, line_display_name, line_resource_id, plane_device_id,
    stat_value_string, xspace_to_trace_container,
};
