//! Frame system trait

use pinkboard_render::Surface;

/// Timing information handed to every system for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Frame number, starting at 0
    pub index: u64,
    /// Timestamp in milliseconds from the loop's time source
    pub now_ms: f64,
}

/// An animation drawn once per frame onto its own surface
///
/// Systems own their simulation state; the surface is borrowed for the frame.
pub trait FrameSystem {
    /// Advance and draw one frame
    fn frame(&mut self, surface: &mut dyn Surface, time: FrameTime);

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
