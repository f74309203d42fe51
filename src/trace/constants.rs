//! Shared constants for XPlane to trace conversion.

/// Name of the plane holding host (CPU) threads.
pub const HOST_THREADS_PLANE_NAME: &str = "/host:CPU";

/// Device id of the first accelerator plane. Plane ids are offset from it.
pub const FIRST_DEVICE_ID: u32 = 1;

/// Highest device id an accelerator plane is expected to use.
pub const LAST_DEVICE_ID: u32 = 500;

/// Device id reserved for the host threads plane.
pub const HOST_THREADS_DEVICE_ID: u32 = LAST_DEVICE_ID + 1;

/// Default upper bound on converted events, beyond which trace viewers
/// become unusable.
pub const MAX_TRACE_EVENTS: usize = 1_000_000;

/// Stat whose value replaces the event name when present.
pub const STEP_NAME_STAT: &str = "step_name";

/// Argument key holding the full event name when a display name is used.
pub const LONG_NAME_ARG: &str = "long_name";

/// Rendering of `bytes_value` stats.
pub const OPAQUE_BYTES: &str = "<opaque bytes>";
