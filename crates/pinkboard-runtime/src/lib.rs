//! Pinkboard Runtime - Animation frame infrastructure
//!
//! Provides the building blocks the animations are driven by:
//! - `TimeSource` - millisecond timestamps (`SystemClock`, `SteppedClock`)
//! - `FrameScheduler` - "request next frame" host primitive (`FixedRateScheduler`)
//! - `FrameLoop` - schedules the next frame before rendering the current one
//! - `FrameSystem` - trait for animations rendered once per frame

mod clock;
mod scheduler;
mod system;

pub use clock::{SteppedClock, SystemClock, TimeSource};
pub use scheduler::{FixedRateScheduler, FrameHandle, FrameLoop, FrameScheduler};
pub use system::{FrameSystem, FrameTime};
