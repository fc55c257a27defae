use crate::event::{BlankEvent, ControlEvent};
use cart_core::vram::flusher::FlushReport;
use cart_core::vram::nmi::Nmi;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use std::time::{Duration, Instant};

/// One NTSC frame.
const FRAME_DURATION: Duration = Duration::from_nanos(16_639_267);

#[derive(Debug, Default)]
pub struct BlankStats {
    pub blanks: usize,
    pub entries: usize,
    pub bytes: usize,
    pub discarded: usize,
    pub deferred: usize,
    pub corrupted_writes: usize,
    pub pending: usize,
}

impl BlankStats {
    fn record(&mut self, report: &FlushReport) {
        self.blanks += 1;
        self.entries += report.entries;
        self.bytes += report.bytes;
        self.discarded += report.discarded;
        self.deferred += report.deferred as usize;
    }
}

/// Plays the part of the vertical blank interrupt: owns the PPU and drains
/// the update buffer once per frame, at a fixed cadence that does not wait
/// for the game loop.
pub struct BlankHandler {
    nmi: Nmi,
    blank_tx: Sender<BlankEvent>,
    control_rx: Receiver<ControlEvent>,
}

impl BlankHandler {
    pub fn new(nmi: Nmi, blank_tx: Sender<BlankEvent>, control_rx: Receiver<ControlEvent>) -> Self {
        Self {
            nmi,
            blank_tx,
            control_rx,
        }
    }

    pub fn run(mut self) -> BlankStats {
        let mut stats = BlankStats::default();

        loop {
            let frame_start = Instant::now();

            match self.control_rx.try_recv() {
                Ok(ControlEvent::Stop) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => (),
            }

            let report = self.nmi.vblank();
            stats.record(&report);

            // a full channel means the game loop is still busy with its frame
            let _ = self.blank_tx.try_send(BlankEvent::Blank {
                frame: self.nmi.get_frame_count(),
                report,
            });

            if let Some(delay) = FRAME_DURATION.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(delay);
            }
        }

        stats.corrupted_writes = self.nmi.ppu.corrupted_writes();
        stats.pending = self.nmi.pending();
        debug!("Blank handler stopped after {} blanks", stats.blanks);
        stats
    }
}
