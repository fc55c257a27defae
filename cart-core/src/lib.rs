pub mod error;
pub mod game;
pub mod input;
pub mod player;
pub mod sprite;
pub mod video;
pub mod vram;


/// High byte of an 8.8 fixed-point value, i.e. the whole pixel.
pub fn high_byte(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Low byte of an 8.8 fixed-point value, i.e. the sub-pixel fraction.
pub fn low_byte(value: u16) -> u8 {
    (value & 0xFF) as u8
}
