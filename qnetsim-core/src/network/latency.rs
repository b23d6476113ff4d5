//! ## qnetsim-core::network::latency
//! **Propagation delay for channels**
//!
//! All channels share one signal speed. A channel's delay is its length divided by that speed,
//! rounded to the nearest picosecond.

use crate::time::Time;

/// Signal speed in fibre, in metres per picosecond.
pub const LIGHT_SPEED: f64 = 2e-4;

/// Delay in picoseconds for a signal travelling `distance` metres.
///
/// `distance` must be finite and non-negative; channel constructors check this before calling.
#[inline]
pub fn propagation_delay(distance: f64) -> Time {
    (distance / LIGHT_SPEED).round() as Time
}
