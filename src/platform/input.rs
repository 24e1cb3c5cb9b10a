//! Host input shared between the input thread and the loop thread
//!
//! The host's input dispatch is the only writer; the loop thread consumes.
//! Pairs of values are packed into one atomic so a reader never sees x from
//! one event and y from another.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use glam::Vec2;

use crate::sim::Viewport;

#[derive(Debug, Default)]
pub struct HostInput {
    /// x bits in the high word, y bits in the low word
    pointer: AtomicU64,
    moved: AtomicBool,
    tapped: AtomicBool,
    /// width in the high word, height in the low word
    layout: AtomicU64,
    resized: AtomicBool,
}

#[inline]
fn pack(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

#[inline]
fn unpack(bits: u64) -> (u32, u32) {
    ((bits >> 32) as u32, bits as u32)
}

impl HostInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest pointer position (absolute, viewport pixels)
    pub fn move_to(&self, x: f32, y: f32) {
        self.pointer
            .store(pack(x.to_bits(), y.to_bits()), Ordering::Release);
        self.moved.store(true, Ordering::Release);
    }

    /// Confirming tap/click
    pub fn tap(&self) {
        self.tapped.store(true, Ordering::Release);
    }

    /// Surface size changed
    pub fn resize(&self, width: u32, height: u32) {
        self.layout.store(pack(width, height), Ordering::Release);
        self.resized.store(true, Ordering::Release);
    }

    /// Position if the pointer moved since the last call
    pub fn take_pointer(&self) -> Option<Vec2> {
        if !self.moved.swap(false, Ordering::AcqRel) {
            return None;
        }
        let (x, y) = unpack(self.pointer.load(Ordering::Acquire));
        Some(Vec2::new(f32::from_bits(x), f32::from_bits(y)))
    }

    /// Whether a tap arrived since the last call
    pub fn take_tap(&self) -> bool {
        self.tapped.swap(false, Ordering::AcqRel)
    }

    /// New surface size if it changed since the last call
    pub fn take_resize(&self) -> Option<Viewport> {
        if !self.resized.swap(false, Ordering::AcqRel) {
            return None;
        }
        let (w, h) = unpack(self.layout.load(Ordering::Acquire));
        Some(Viewport::new(w, h))
    }
}
