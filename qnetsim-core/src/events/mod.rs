//! ## qnetsim-core::events
//! **Scheduled events and their payloads**
//!
//! An event is a tagged payload plus the index of the node whose hook it fires. Ordering is
//! carried by [`EventKey`]: time first, then the insertion sequence number, which makes equal
//! timestamps FIFO regardless of how the heap breaks ties internally.
//!
//! ### Key Submodules:
//! - `event`: `EventKey`, `Event`, `EventPayload` and the `DispatchRecord` trace entry
//! - `photon`: the opaque quantum payload

mod event;
mod photon;

pub use event::{DispatchRecord, Event, EventKey, EventPayload};
pub use photon::Photon;
