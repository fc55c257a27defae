pub mod nametable;
pub mod palette;
pub mod ppu;
pub mod registers;

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;

pub const PATTERN_TABLE_SIZE: usize = 0x2000;
pub const NAMETABLE_SIZE: usize = 0x400;
pub const NAMETABLE_BASE: u16 = 0x2000;
pub const ATTRIBUTE_TABLE_OFFSET: u16 = 0x3C0;

pub const PALETTE_ADDR_START: u16 = 0x3F00;
pub const PALETTE_SIZE: usize = 32;

/// The PPU address bus is 14 bits wide; everything above mirrors.
pub const PPU_ADDR_MASK: u16 = 0x3FFF;
