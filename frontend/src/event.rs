use cart_core::vram::flusher::FlushReport;

#[derive(Debug)]
pub enum BlankEvent {
    /// A vertical blank finished; the game loop may run its next frame.
    Blank { frame: u8, report: FlushReport },
}

#[derive(Debug)]
pub enum ControlEvent {
    Stop,
}
