//! Time subsystem.
//!
//! - [`FrameClock`]: one per window; `tick()` once per presented frame
//! - [`StepPacer`]: turns frame deltas into a whole number of simulation steps

mod clock;
mod pacer;

pub use clock::{FrameClock, FrameTime};
pub use pacer::StepPacer;
