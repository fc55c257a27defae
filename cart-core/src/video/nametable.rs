//! Pixel-to-address helpers for the nametable and attribute table, and the
//! vertical scroll arithmetic that skips the attribute rows.

use super::{ATTRIBUTE_TABLE_OFFSET, NAMETABLE_BASE, NAMETABLE_SIZE};

/// Visible rows of a nametable in pixels; the low byte of a y scroll never
/// reaches this value.
const SCROLL_ROWS: i32 = 0xF0;

/// Nametable address of the tile under pixel (`x`, `y`) in nametable `nt` (0-3).
pub fn get_ppu_addr(nt: u8, x: u8, y: u8) -> u16 {
    let y = y.min(239);
    NAMETABLE_BASE + (nt as u16 & 0x03) * NAMETABLE_SIZE as u16 + ((y as u16 >> 3) << 5) + (x as u16 >> 3)
}

/// Attribute byte address covering pixel (`x`, `y`) in nametable `nt` (0-3).
pub fn get_at_addr(nt: u8, x: u8, y: u8) -> u16 {
    let y = y.min(239);
    NAMETABLE_BASE
        + (nt as u16 & 0x03) * NAMETABLE_SIZE as u16
        + ATTRIBUTE_TABLE_OFFSET
        + ((y as u16 >> 5) << 3)
        + (x as u16 >> 5)
}

/// Adds `add` pixels to a y scroll, keeping the low byte in 0..=0xEF and
/// carrying into the high byte when a nametable boundary is crossed.
pub fn add_scroll_y(add: u8, scroll: u16) -> u16 {
    step_scroll_y(scroll, add as i32)
}

/// Subtracts `sub` pixels from a y scroll with the same wrapping as [`add_scroll_y`].
pub fn sub_scroll_y(sub: u8, scroll: u16) -> u16 {
    step_scroll_y(scroll, -(sub as i32))
}

fn step_scroll_y(scroll: u16, delta: i32) -> u16 {
    let high = (scroll >> 8) as i32;
    // an out-of-range low byte is treated as the last visible row
    let low = ((scroll & 0xFF) as i32).min(SCROLL_ROWS - 1);

    let total = high * SCROLL_ROWS + low + delta;
    let high = total.div_euclid(SCROLL_ROWS) as u8;
    let low = total.rem_euclid(SCROLL_ROWS) as u8;

    ((high as u16) << 8) | low as u16
}
