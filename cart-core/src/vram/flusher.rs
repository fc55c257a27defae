use super::buffer::{Queued, Shared};
use super::update::{Orientation, VramUpdate, WriteMode};
use crate::video::ppu::Ppu;
use crate::video::registers::PpuCtrl;
use crossbeam_channel::Receiver;
use log::*;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries written to video memory.
    pub entries: usize,
    /// Encoded bytes spent out of the budget.
    pub bytes: usize,
    /// Entries skipped because a clear happened after they were queued.
    pub discarded: usize,
    /// Whether the budget ran out with entries still waiting.
    pub deferred: bool,
}

/// Consumer end of the update buffer, owned by the vertical blank handler.
pub struct VramFlusher {
    rx: Receiver<Queued>,
    shared: Arc<Shared>,
    // entry that did not fit last blank; it stays at the head of the queue
    carry: Option<Queued>,
    frame_count: u8,
}

impl VramFlusher {
    pub(crate) fn new(rx: Receiver<Queued>, shared: Arc<Shared>) -> Self {
        VramFlusher {
            rx,
            shared,
            carry: None,
            frame_count: 0,
        }
    }

    /// Runs once per vertical blank. Drains queued entries in the order they
    /// were pushed until the frame budget is spent; whatever is left waits for
    /// the next blank.
    pub fn flush_during_blank(&mut self, ppu: &mut Ppu) -> FlushReport {
        self.frame_count = self.frame_count.wrapping_add(1);

        if !self.shared.installed() {
            return FlushReport::default();
        }

        let report = self.drain(ppu, Some(self.shared.frame_budget));
        if report.deferred {
            debug!(
                "Blank budget spent after {} entries, {} still queued",
                report.entries,
                self.pending()
            );
        }
        report
    }

    /// Drains everything regardless of budget, for use while rendering is off.
    pub fn flush_vram_update2(&mut self, ppu: &mut Ppu) -> FlushReport {
        if ppu.mask.rendering_enabled() {
            warn!("Unbounded VRAM flush requested with rendering enabled");
        }
        self.drain(ppu, None)
    }

    /// Ticks once per blank, wrapping at 256.
    pub fn get_frame_count(&self) -> u8 {
        self.frame_count
    }

    /// Entries still queued, including any that may since have been cleared.
    pub fn pending(&self) -> usize {
        self.rx.len() + self.carry.is_some() as usize
    }

    fn next(&mut self) -> Option<Queued> {
        self.carry.take().or_else(|| self.rx.try_recv().ok())
    }

    fn drain(&mut self, ppu: &mut Ppu, budget: Option<usize>) -> FlushReport {
        let mut report = FlushReport::default();
        let ctrl = ppu.ctrl;

        // no clear may land between a generation check and the write it allows
        let shared = self.shared.clone();
        let _drain = shared.lock_drain();

        while let Some(queued) = self.next() {
            if queued.generation != self.shared.generation() {
                report.discarded += 1;
                continue;
            }

            let cost = queued.update.encoded_len();
            if budget.is_some_and(|budget| report.bytes + cost > budget) {
                self.carry = Some(queued);
                report.deferred = true;
                break;
            }

            write_update(ppu, &queued.update);
            self.shared.release(queued.generation, cost);

            report.entries += 1;
            report.bytes += cost;
        }

        ppu.ctrl = ctrl;
        report
    }
}

fn write_update(ppu: &mut Ppu, update: &VramUpdate) {
    if update.mode == WriteMode::Sequential(Orientation::Vertical) {
        ppu.ctrl.insert(PpuCtrl::VRAM_INCREMENT_32);
    } else {
        ppu.ctrl.remove(PpuCtrl::VRAM_INCREMENT_32);
    }

    ppu.set_address(update.address);
    for &value in &update.data {
        #[cfg(feature = "verbose_debug")]
        trace!("Flushing {:02x} to {:04x}", value, ppu.address());

        ppu.write_data(value);
    }
}

#[cfg(test)]
mod tests {
    use crate::video::ppu::Ppu;
    use crate::video::registers::Mirroring;
    use crate::vram::update::Orientation;
    use crate::vram::{VramConfig, channel};
    use std::time::Duration;

    fn blank_ppu() -> Ppu {
        let mut ppu = Ppu::new(Mirroring::Horizontal);
        ppu.begin_vblank();
        ppu
    }

    #[test]
    fn flush_writes_in_push_order() {
        let (mut vram, mut flusher) = channel(VramConfig::default());
        let mut ppu = blank_ppu();
        vram.set_vram_buffer();

        vram.push_single(0x2000, 1);
        vram.push_single(0x2000, 2);
        vram.push_sequential(0x2001, &[3, 4], Orientation::Horizontal);
        vram.push_sequential(0x2001, &[5, 6], Orientation::Vertical);

        let report = flusher.flush_during_blank(&mut ppu);

        assert_eq!(report.entries, 4);
        assert!(!report.deferred);
        assert_eq!(ppu.peek(0x2000), 2);
        assert_eq!(ppu.peek(0x2001), 5);
        assert_eq!(ppu.peek(0x2002), 4);
        assert_eq!(ppu.peek(0x2021), 6);
        assert!(vram.is_empty());
        assert_eq!(flusher.pending(), 0);
    }

    #[test]
    fn budget_defers_the_tail() {
        let (mut vram, mut flusher) = channel(VramConfig {
            capacity: 64,
            frame_budget: 8,
        });
        let mut ppu = blank_ppu();
        vram.set_vram_buffer();

        vram.push_single(0x2000, 1);
        vram.push_sequential(0x2001, &[2, 3, 4], Orientation::Horizontal);
        vram.push_single(0x2004, 5);

        let first = flusher.flush_during_blank(&mut ppu);
        assert_eq!(first.entries, 1);
        assert!(first.deferred);
        assert_eq!(ppu.peek(0x2001), 0);
        assert_eq!(vram.buffered_bytes(), 9);

        let second = flusher.flush_during_blank(&mut ppu);
        assert_eq!(second.entries, 1);
        assert_eq!(ppu.peek(0x2003), 4);

        let third = flusher.flush_during_blank(&mut ppu);
        assert_eq!(third.entries, 1);
        assert_eq!(ppu.peek(0x2004), 5);
        assert!(vram.is_empty());
    }

    #[test]
    fn cleared_entries_never_reach_video_memory() {
        let (mut vram, mut flusher) = channel(VramConfig::default());
        let mut ppu = blank_ppu();
        vram.set_vram_buffer();

        vram.push_single(0x2000, 0xAA);
        vram.push_sequential(0x2040, &[0xBB; 4], Orientation::Horizontal);
        vram.clear();
        vram.push_single(0x2001, 0xCC);

        let report = flusher.flush_during_blank(&mut ppu);

        assert_eq!(report.discarded, 2);
        assert_eq!(report.entries, 1);
        assert_eq!(ppu.peek(0x2000), 0);
        assert_eq!(ppu.peek(0x2040), 0);
        assert_eq!(ppu.peek(0x2001), 0xCC);
        assert!(vram.is_empty());
    }

    #[test]
    fn uninstalled_buffer_keeps_its_entries() {
        let (mut vram, mut flusher) = channel(VramConfig::default());
        let mut ppu = blank_ppu();

        vram.push_single(0x2000, 7);
        let report = flusher.flush_during_blank(&mut ppu);
        assert_eq!(report.entries, 0);
        assert_eq!(flusher.get_frame_count(), 1);
        assert_eq!(ppu.peek(0x2000), 0);

        vram.set_vram_buffer();
        flusher.flush_during_blank(&mut ppu);
        assert_eq!(ppu.peek(0x2000), 7);
        assert_eq!(flusher.get_frame_count(), 2);
    }

    #[test]
    fn screen_off_flush_ignores_budget() {
        let (mut vram, mut flusher) = channel(VramConfig {
            capacity: 64,
            frame_budget: 6,
        });
        let mut ppu = Ppu::new(Mirroring::Horizontal);
        ppu.ppu_off();

        for i in 0..5 {
            vram.push_single(0x2000 + i, i as u8 + 1);
        }

        let report = flusher.flush_vram_update2(&mut ppu);
        assert_eq!(report.entries, 5);
        assert_eq!(ppu.peek(0x2004), 5);
        assert_eq!(ppu.corrupted_writes(), 0);
    }

    #[test]
    fn clear_waits_for_a_running_drain() {
        let (mut vram, mut flusher) = channel(VramConfig::default());
        let mut ppu = blank_ppu();
        vram.set_vram_buffer();
        vram.push_single(0x2000, 0xAA);

        // hold the lock the way a drain in progress does
        let shared = flusher.shared.clone();
        let drain = shared.lock_drain();

        std::thread::scope(|scope| {
            let clearing = scope.spawn(|| vram.clear());
            std::thread::sleep(Duration::from_millis(50));

            assert!(!clearing.is_finished());
            assert_eq!(shared.generation(), 0);

            drop(drain);
            clearing.join().unwrap();
        });

        assert_eq!(shared.generation(), 1);
        let report = flusher.flush_during_blank(&mut ppu);
        assert_eq!(report.discarded, 1);
        assert_eq!(ppu.peek(0x2000), 0);
    }

    #[test]
    fn control_register_is_restored() {
        let (mut vram, mut flusher) = channel(VramConfig::default());
        let mut ppu = blank_ppu();
        vram.set_vram_buffer();

        vram.push_sequential(0x2000, &[1, 2], Orientation::Vertical);
        flusher.flush_during_blank(&mut ppu);

        assert_eq!(ppu.ctrl.vram_increment(), 1);
    }
}
