use super::registers::Buttons;

/// Polled controller state with press-edge detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Joypad {
    held: Buttons,
    status: Buttons,
    previous: Buttons,
    new: Buttons,
}

impl Joypad {
    pub fn new() -> Joypad {
        Joypad::default()
    }

    /// Changes what the controller reports on the next poll.
    pub fn set_key_state(&mut self, key: Buttons, pressed: bool) {
        self.held.set(key, pressed);
    }

    /// Latches the held buttons. Returns the current state.
    pub fn pad_poll(&mut self) -> Buttons {
        self.previous = self.status;
        self.status = self.held;
        self.new = self.status - self.previous;
        self.status
    }

    pub fn pad_state(&self) -> Buttons {
        self.status
    }

    /// Buttons that went down on the last poll.
    pub fn get_pad_new(&self) -> Buttons {
        self.new
    }

    pub fn is_key_pressed(&self, key: Buttons) -> bool {
        self.status.contains(key)
    }
}
