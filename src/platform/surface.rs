//! Drawing surfaces
//!
//! The loop thread locks a surface, ticks, hands over the frame, and unlocks.
//! Real hosts wrap their canvas in `Surface`; `HeadlessSurface` keeps the
//! latest frame in memory for tests and the headless binary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::renderer::Frame;

/// Exclusive drawing target for the loop thread
pub trait Surface: Send {
    /// Block until the surface can be drawn on.
    /// Returns false when it is unavailable; the loop skips the iteration.
    fn acquire(&mut self) -> bool;

    /// Draw the frame and release the surface
    fn present(&mut self, frame: &Frame);
}

/// Read side of a `HeadlessSurface`, usable from any thread
#[derive(Debug, Clone, Default)]
pub struct SurfaceMonitor {
    latest: Arc<Mutex<Option<Frame>>>,
    presented: Arc<AtomicU64>,
}

impl SurfaceMonitor {
    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.presented.load(Ordering::Acquire)
    }

    /// Copy of the most recent frame
    pub fn latest(&self) -> Option<Frame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// In-memory surface with an optional simulated refresh interval
#[derive(Debug)]
pub struct HeadlessSurface {
    monitor: SurfaceMonitor,
    refresh: Option<Duration>,
}

impl HeadlessSurface {
    /// `refresh` throttles `acquire` like a display's vsync would
    pub fn new(refresh: Option<Duration>) -> (Self, SurfaceMonitor) {
        let monitor = SurfaceMonitor::default();
        (
            Self {
                monitor: monitor.clone(),
                refresh,
            },
            monitor,
        )
    }
}

impl Surface for HeadlessSurface {
    fn acquire(&mut self) -> bool {
        if let Some(refresh) = self.refresh {
            thread::sleep(refresh);
        }
        true
    }

    fn present(&mut self, frame: &Frame) {
        *self
            .monitor
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());
        self.monitor.presented.fetch_add(1, Ordering::AcqRel);
    }
}
