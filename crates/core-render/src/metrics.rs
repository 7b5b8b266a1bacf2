//! Render path counters.
//!
//! Records what the engine actually emitted: full versus row-diffed frames and how many rows
//! each path touched. Counters are atomics so a snapshot can be taken through `&self`.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    /// Frames emitted in full (first frame, resize, explicit invalidation).
    pub full_frames: AtomicU64,
    /// Frames emitted as a row diff against the previous frame.
    pub partial_frames: AtomicU64,
    pub rows_repainted: AtomicU64,
    /// Rows left untouched because they matched the previous frame.
    pub rows_skipped: AtomicU64,
    pub last_render_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderPathMetricsSnapshot {
    pub full_frames: u64,
    pub partial_frames: u64,
    pub rows_repainted: u64,
    pub rows_skipped: u64,
    pub last_render_ns: u64,
}

impl RenderPathMetrics {
    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        RenderPathMetricsSnapshot {
            full_frames: self.full_frames.load(Ordering::Relaxed),
            partial_frames: self.partial_frames.load(Ordering::Relaxed),
            rows_repainted: self.rows_repainted.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            last_render_ns: self.last_render_ns.load(Ordering::Relaxed),
        }
    }
}
