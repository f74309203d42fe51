//! Utility functions for working with XPlane time units.
//!
//! XLines carry their start time in nanoseconds while XEvents carry offsets
//! and durations in picoseconds. The JSON trace format expects microseconds.

/// Convert a nanosecond timestamp to picoseconds.
///
/// Saturates instead of overflowing for timestamps far in the future.
///
/// # Examples
///
/// ```
/// use xspace2json::utils::ns_to_ps;
///
/// assert_eq!(ns_to_ps(1_500), 1_500_000);
/// ```
#[inline(always)]
pub const fn ns_to_ps(ns: i64) -> i64 {
    ns.saturating_mul(1000)
}

/// Convert picoseconds to (fractional) microseconds.
///
/// # Examples
///
/// ```
/// use xspace2json::utils::ps_to_us;
///
/// assert_eq!(ps_to_us(2_500_000), 2.5);
/// ```
#[inline(always)]
pub fn ps_to_us(ps: u64) -> f64 {
    ps as f64 / 1_000_000.0
}

/// Clamp a signed protobuf time value to an unsigned one.
///
/// Negative offsets and durations show up in hand-built or truncated
/// sessions; they are treated as zero.
#[inline(always)]
pub const fn non_negative(value: i64) -> u64 {
    if value < 0 {
        0
    } else {
        value as u64
    }
}
