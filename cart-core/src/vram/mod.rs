pub mod buffer;
pub mod flusher;
pub mod nmi;
pub mod update;

use buffer::{Shared, VramBuffer};
use flusher::VramFlusher;
use std::sync::Arc;

/// Sizes of the update buffer, in encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VramConfig {
    /// Most bytes that may sit in the buffer at once.
    pub capacity: usize,
    /// Most bytes one vertical blank is allowed to write.
    pub frame_budget: usize,
}

impl Default for VramConfig {
    fn default() -> Self {
        VramConfig {
            capacity: 128,
            frame_budget: 128,
        }
    }
}

/// Creates the two ends of the update buffer: the game loop keeps the
/// [`VramBuffer`] and only appends, the blank handler keeps the
/// [`VramFlusher`] and only drains.
pub fn channel(config: VramConfig) -> (VramBuffer, VramFlusher) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let shared = Arc::new(Shared::new(config));

    (VramBuffer::new(tx, shared.clone()), VramFlusher::new(rx, shared))
}
