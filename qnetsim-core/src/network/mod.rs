//! ## qnetsim-core::network
//! **Physical channel models (propagation delay, photon loss)**
//!
//! ### Expectations:
//! - Delays are deterministic functions of distance
//! - Loss is a pluggable, monotonic function of attenuation and length
//!
//! ### Key Submodules:
//! - `latency`: propagation delay over fibre
//! - `loss`: loss probability models (`FiberLoss`, `NoLoss`, closures)
//!
//! ### Future:
//! - Frequency-limited quantum channels (minimum spacing between photons)

pub mod latency;
pub mod loss;

pub use latency::{propagation_delay, LIGHT_SPEED};
pub use loss::{FiberLoss, LossModel, NoLoss};
