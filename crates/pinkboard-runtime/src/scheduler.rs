//! Frame scheduling and the schedule-then-render loop

use crate::clock::TimeSource;
use crate::system::FrameTime;
use log::trace;
use std::time::{Duration, Instant};

/// Opaque id of a requested frame. Nothing cancels frames, so callers may
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host "request next frame" primitive
pub trait FrameScheduler {
    /// Ask for one more frame callback. Repeated requests before the frame
    /// is delivered coalesce into the same handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Wait until the requested frame is due. Returns `None` when nothing
    /// was requested or the host stops delivering frames.
    fn next_frame(&mut self) -> Option<FrameHandle>;
}

/// Delivers requested frames at a fixed rate, optionally up to a limit
pub struct FixedRateScheduler {
    frame_interval: Duration,
    limit: Option<u64>,
    realtime: bool,
    delivered: u64,
    next_id: u64,
    pending: Option<FrameHandle>,
    last_frame: Option<Instant>,
}

impl FixedRateScheduler {
    /// Scheduler that hands out frames as fast as they are consumed
    pub fn new(fps: f64) -> Self {
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(f64::EPSILON)),
            limit: None,
            realtime: false,
            delivered: 0,
            next_id: 0,
            pending: None,
            last_frame: None,
        }
    }

    /// Stop after `frames` deliveries
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Sleep between frames so they are delivered at wall-clock pace
    pub fn realtime(mut self, enabled: bool) -> Self {
        self.realtime = enabled;
        self
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_frame {
            const ACCURACY: Duration = Duration::from_micros(100);
            let target = last + self.frame_interval;
            let now = Instant::now();
            if target > now + ACCURACY {
                std::thread::sleep(target - now - ACCURACY);
            }
            while Instant::now() < target {
                std::thread::yield_now();
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        if let Some(handle) = self.pending {
            return handle;
        }
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(handle);
        handle
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        if self.limit.is_some_and(|limit| self.delivered >= limit) {
            return None;
        }
        let handle = self.pending.take()?;
        if self.realtime {
            self.pace();
        }
        self.delivered += 1;
        Some(handle)
    }
}

/// Drives a frame callback from a scheduler and a time source.
///
/// Each delivered frame first requests its successor and only then reads the
/// clock and renders, so a failing frame has already scheduled the next one.
pub struct FrameLoop<S: FrameScheduler, T: TimeSource> {
    scheduler: S,
    clock: T,
    frames: u64,
}

impl<S: FrameScheduler, T: TimeSource> FrameLoop<S, T> {
    /// Create the loop and request its first frame
    pub fn start(mut scheduler: S, clock: T) -> Self {
        scheduler.request_frame();
        Self {
            scheduler,
            clock,
            frames: 0,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render a single frame if one is delivered. Returns `Ok(false)` once
    /// the scheduler has no more frames.
    pub fn step<F, E>(&mut self, render: F) -> Result<bool, E>
    where
        F: FnOnce(FrameTime) -> Result<(), E>,
    {
        let Some(handle) = self.scheduler.next_frame() else {
            return Ok(false);
        };
        self.scheduler.request_frame();

        let time = FrameTime {
            index: self.frames,
            now_ms: self.clock.now_ms(),
        };
        self.frames += 1;
        trace!("frame {} ({:?}) at {:.3}ms", time.index, handle, time.now_ms);
        render(time)?;
        Ok(true)
    }

    /// Render frames until the scheduler stops; returns the frame count
    pub fn run<F, E>(&mut self, mut render: F) -> Result<u64, E>
    where
        F: FnMut(FrameTime) -> Result<(), E>,
    {
        while self.step(&mut render)? {}
        Ok(self.frames)
    }
}
