use super::VramConfig;
use super::update::{Orientation, VramUpdate};
use crate::error::CartError;
use crossbeam_channel::Sender;
use log::*;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State shared by both ends of the buffer.
///
/// `state` packs the clear generation in the high 32 bits and the bytes
/// buffered in that generation in the low 32 bits, so a clear and a drain
/// can never disagree about which bytes are still owed.
///
/// `drain` is held by the flusher for a whole drain and by `clear` while it
/// bumps the generation. A clear therefore lands between two drains, never
/// between an entry's generation check and its write.
pub(crate) struct Shared {
    state: AtomicU64,
    drain: Mutex<()>,
    installed: AtomicBool,
    dropped: AtomicUsize,
    pub(crate) capacity: usize,
    pub(crate) frame_budget: usize,
}

fn pack(generation: u32, bytes: u32) -> u64 {
    ((generation as u64) << 32) | bytes as u64
}

fn unpack(state: u64) -> (u32, u32) {
    ((state >> 32) as u32, state as u32)
}

impl Shared {
    pub(crate) fn new(config: VramConfig) -> Self {
        Shared {
            state: AtomicU64::new(0),
            drain: Mutex::new(()),
            installed: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
            capacity: config.capacity,
            frame_budget: config.frame_budget,
        }
    }

    /// Excludes `clear` for as long as the guard lives.
    pub(crate) fn lock_drain(&self) -> MutexGuard<'_, ()> {
        // the guarded data is empty, a panicked holder leaves nothing half-written
        self.drain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn generation(&self) -> u32 {
        unpack(self.state.load(Ordering::Acquire)).0
    }

    pub(crate) fn buffered(&self) -> usize {
        unpack(self.state.load(Ordering::Acquire)).1 as usize
    }

    pub(crate) fn installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Claims room for `cost` bytes, returning the generation the entry belongs to.
    fn try_reserve(&self, cost: usize) -> Option<u32> {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                let (generation, bytes) = unpack(state);
                if bytes as usize + cost > self.capacity {
                    None
                } else {
                    Some(pack(generation, bytes + cost as u32))
                }
            })
            .ok()
            .map(|state| unpack(state).0)
    }

    fn reset(&self) -> u32 {
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                Some(pack(unpack(state).0.wrapping_add(1), 0))
            })
            .unwrap_or_else(|state| state);
        unpack(previous).0.wrapping_add(1)
    }

    /// Gives back the room of a drained entry. Entries from a cleared
    /// generation were already forgotten and release nothing.
    pub(crate) fn release(&self, generation: u32, cost: usize) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                let (current, bytes) = unpack(state);
                if current != generation {
                    None
                } else {
                    Some(pack(current, bytes.saturating_sub(cost as u32)))
                }
            })
            .is_ok()
    }
}

pub(crate) struct Queued {
    pub(crate) generation: u32,
    pub(crate) update: VramUpdate,
}

/// Producer end of the update buffer, owned by the game loop.
///
/// Pushes never fail from the caller's point of view: an entry that does not
/// fit is dropped and shows up next frame as a stale tile.
pub struct VramBuffer {
    tx: Sender<Queued>,
    shared: Arc<Shared>,
}

impl VramBuffer {
    pub(crate) fn new(tx: Sender<Queued>, shared: Arc<Shared>) -> Self {
        VramBuffer { tx, shared }
    }

    /// Makes the blank handler drain this buffer. Calling it again is harmless.
    pub fn set_vram_buffer(&self) {
        if !self.shared.installed.swap(true, Ordering::AcqRel) {
            debug!("VRAM buffer installed");
        }
    }

    /// The null installation: the blank handler stops draining, entries stay queued.
    pub fn disable_vram_update(&self) {
        if self.shared.installed.swap(false, Ordering::AcqRel) {
            debug!("VRAM buffer uninstalled");
        }
    }

    pub fn is_installed(&self) -> bool {
        self.shared.installed()
    }

    /// Queues a one-byte write. Returns whether the entry was accepted.
    pub fn push_single(&mut self, address: u16, value: u8) -> bool {
        self.push(VramUpdate::single(address, value))
    }

    /// Queues a run of bytes. Returns whether the entry was accepted; a
    /// dropped run has to be pushed again by the caller.
    pub fn push_sequential(&mut self, address: u16, data: &[u8], orientation: Orientation) -> bool {
        if data.is_empty() || data.len() > u8::MAX as usize {
            debug!(
                "Dropping sequential VRAM write of {} bytes to {:04x}",
                data.len(),
                address
            );
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.push(VramUpdate::sequential(address, data, orientation))
    }

    /// Queues every entry of a pre-built update list.
    pub fn push_list(&mut self, list: &[u8]) -> Result<(), CartError> {
        for update in VramUpdate::decode_list(list)? {
            self.push(update);
        }
        Ok(())
    }

    /// Forgets everything queued so far; none of it will reach video memory
    /// once this returns. Waits for a drain that is already running, which
    /// takes at most one blank's budget.
    pub fn clear(&mut self) {
        let _drain = self.shared.lock_drain();
        let generation = self.shared.reset();
        debug!("VRAM buffer cleared (generation {})", generation);
    }

    pub fn buffered_bytes(&self) -> usize {
        self.shared.buffered()
    }

    pub fn is_empty(&self) -> bool {
        self.buffered_bytes() == 0
    }

    /// Entries thrown away for lack of room since the buffer was created.
    pub fn dropped(&self) -> usize {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    fn push(&mut self, update: VramUpdate) -> bool {
        let cost = update.encoded_len();

        // an entry larger than one blank's budget could never be drained
        let generation = if cost > self.shared.frame_budget {
            None
        } else {
            self.shared.try_reserve(cost)
        };

        let Some(generation) = generation else {
            debug!(
                "VRAM buffer full, dropping {} byte write to {:04x} ({} of {} bytes used)",
                cost,
                update.address,
                self.buffered_bytes(),
                self.shared.capacity
            );
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        trace!("Queued {:?} write of {} bytes to {:04x}", update.mode, update.data.len(), update.address);

        if self.tx.send(Queued { generation, update }).is_err() {
            warn!("VRAM flusher is gone, dropping write");
            self.shared.release(generation, cost);
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        true
    }
}
