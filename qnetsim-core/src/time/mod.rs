//! ## qnetsim-core::time
//! **Virtual clock, scheduler and the timeline that drives a run**
//!
//! ### Expectations:
//! - Integer picosecond clock that never moves backwards
//! - Dispatch order is `(time, insertion sequence)`, independent of heap internals
//! - Callbacks run to completion and cannot re-enter `run()`
//!
//! ### Key Submodules:
//! - `scheduler`: binary-heap event queue, run statistics and trace digest
//! - `timeline`: entity arena, `init()`/`run()` lifecycle, driver-side sends
//! - `context`: the handle a node receives inside its callbacks

mod context;
mod scheduler;
mod timeline;

pub use context::Context;
pub use scheduler::{RunStats, Scheduler};
pub use timeline::{EntityId, Timeline};

/// Simulation time in picoseconds.
pub type Time = u64;

pub const PICOSECOND: Time = 1;
pub const NANOSECOND: Time = 1_000;
pub const MICROSECOND: Time = 1_000_000;
pub const MILLISECOND: Time = 1_000_000_000;
pub const SECOND: Time = 1_000_000_000_000;
