use super::flusher::{FlushReport, VramFlusher};
use crate::video::ppu::Ppu;
use log::*;

/// The vertical blank interrupt: the only code that owns the PPU.
pub struct Nmi {
    pub ppu: Ppu,
    flusher: VramFlusher,
}

impl Nmi {
    pub fn new(ppu: Ppu, flusher: VramFlusher) -> Self {
        Nmi { ppu, flusher }
    }

    /// One blank interval: open the window, drain the buffer, close the window.
    pub fn vblank(&mut self) -> FlushReport {
        self.ppu.begin_vblank();
        let report = self.flusher.flush_during_blank(&mut self.ppu);
        self.ppu.end_vblank();

        if report.entries > 0 || report.discarded > 0 {
            trace!(
                "Blank {}: wrote {} entries ({} bytes), discarded {}",
                self.flusher.get_frame_count(),
                report.entries,
                report.bytes,
                report.discarded
            );
        }

        report
    }

    /// Flush with rendering off, e.g. while a new scene is being drawn.
    pub fn flush_screen_off(&mut self) -> FlushReport {
        let mask = self.ppu.mask;
        self.ppu.ppu_off();
        let report = self.flusher.flush_vram_update2(&mut self.ppu);
        self.ppu.mask = mask;
        report
    }

    pub fn get_frame_count(&self) -> u8 {
        self.flusher.get_frame_count()
    }

    pub fn pending(&self) -> usize {
        self.flusher.pending()
    }
}
