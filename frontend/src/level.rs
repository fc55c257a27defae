use cart_core::error::CartError;
use cart_core::sprite::loader::SpriteRecord;
use cart_core::video::nametable::{get_at_addr, get_ppu_addr};
use cart_core::vram::buffer::VramBuffer;
use cart_core::vram::update::Orientation;

const FLOOR_TILE: u8 = 0x80;
const PILLAR_TILE: u8 = 0x81;
const FLOOR_Y: u8 = 0xB0;

// "STAGE 1" at tile (2, 2), then the attribute byte of the top-left corner
const TITLE: &[u8] = &[
    0x60, 0x42, 0x07, 0x53, 0x54, 0x41, 0x47, 0x45, 0x00, 0x31,
    0x23, 0xC0, 0x55,
    0xFF,
];

const fn sprite(x: u16, y: u8, sprite_type: u8) -> SpriteRecord {
    SpriteRecord { x, y, sprite_type }
}

pub const SPRITES: &[SpriteRecord] = &[
    sprite(0x0060, 0xA0, 0x07),
    sprite(0x0090, 0x00, 0x91),
    sprite(0x00C0, 0xA8, 0x0A),
    sprite(0x0120, 0x90, 0x07),
    sprite(0x0160, 0x90, 0x0B),
    sprite(0x01A0, 0x80, 0x01),
    sprite(0x0200, 0x80, 0x07),
    sprite(0x0260, 0x80, 0x00),
    sprite(0x02A0, 0xAC, 0x0D),
    sprite(0x0300, 0x20, 0x07),
    sprite(0x0340, 0x10, 0x0E),
    sprite(0x03A0, 0x90, 0x05),
    sprite(0x0400, 0x00, 0xC6),
    sprite(0x0480, 0xA0, 0x07),
    sprite(0x0500, 0x00, 0x0F),
    SpriteRecord::END,
];

/// Queues the static part of the first screen. Meant to be flushed with
/// rendering off.
pub fn draw_background(vram: &mut VramBuffer) -> Result<(), CartError> {
    vram.push_list(TITLE)?;
    vram.push_sequential(get_ppu_addr(0, 0, FLOOR_Y), &[FLOOR_TILE; 32], Orientation::Horizontal);
    vram.push_sequential(get_ppu_addr(0, 0xF8, 0x78), &[PILLAR_TILE; 7], Orientation::Vertical);
    vram.push_single(get_at_addr(0, 0, FLOOR_Y), 0x55);
    Ok(())
}
