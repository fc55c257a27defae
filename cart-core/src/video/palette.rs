use super::{PALETTE_ADDR_START, PALETTE_SIZE};
use crate::vram::buffer::VramBuffer;
use crate::vram::update::Orientation;
use log::*;

pub const BRIGHT_BLACK: u8 = 0;
pub const BRIGHT_NORMAL: u8 = 4;
pub const BRIGHT_WHITE: u8 = 8;

const COLOR_BLACK: u8 = 0x0F;
const COLOR_WHITE: u8 = 0x30;

/// RAM copy of the 32 palette entries plus the global brightness.
///
/// Nothing here touches the PPU. A changed palette is queued as a single
/// sequential write by [`Palette::commit`] and reaches video memory during
/// the next blank like every other update.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [u8; PALETTE_SIZE],
    bright: u8,
    dirty: bool,
}

impl Palette {
    pub fn new() -> Palette {
        Palette {
            colors: [COLOR_BLACK; PALETTE_SIZE],
            bright: BRIGHT_NORMAL,
            dirty: true,
        }
    }

    /// Sets one entry. Slots 0x10, 0x14, 0x18 and 0x1C share their cell with
    /// 0x00, 0x04, 0x08 and 0x0C, so writing either changes both.
    pub fn pal_col(&mut self, slot: u8, value: u8) {
        let slot = palette_slot(slot);
        debug!("pal_col({:02x}, {:02x})", slot, value);
        self.colors[slot] = value & 0x3F;
        self.dirty = true;
    }

    /// Loads all 32 entries. For the shared cells the background entry wins.
    pub fn pal_all(&mut self, colors: &[u8; PALETTE_SIZE]) {
        for (dst, src) in self.colors.iter_mut().zip(colors) {
            *dst = src & 0x3F;
        }
        self.dirty = true;
    }

    pub fn pal_bright(&mut self, bright: u8) {
        self.bright = bright.min(BRIGHT_WHITE);
        self.dirty = true;
    }

    /// Moves brightness from `from` to `to`. Only the end state is kept; the
    /// per-frame stepping of the fade is left to whoever renders it.
    pub fn pal_fade_to(&mut self, from: u8, to: u8) {
        debug!("Palette fade {} -> {}", from.min(BRIGHT_WHITE), to.min(BRIGHT_WHITE));
        self.pal_bright(to);
    }

    pub fn color(&self, slot: u8) -> u8 {
        self.colors[palette_slot(slot)]
    }

    pub fn bright(&self) -> u8 {
        self.bright
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The palette as the hardware should see it, with brightness applied.
    ///
    /// Entry 0 of each sprite palette is a mirror of the matching background
    /// entry, so it carries that value to keep the upload from overwriting it.
    pub fn output(&self) -> [u8; PALETTE_SIZE] {
        let mut out = [0; PALETTE_SIZE];
        for (dst, &color) in out.iter_mut().zip(&self.colors) {
            *dst = apply_brightness(color, self.bright);
        }
        for slot in (0x10..PALETTE_SIZE).step_by(4) {
            out[slot] = out[slot - 0x10];
        }
        out
    }

    /// Queues the palette upload if anything changed since the last commit.
    /// A dropped upload leaves the palette dirty so the next commit retries.
    pub fn commit(&mut self, vram: &mut VramBuffer) {
        if !self.dirty {
            return;
        }

        if vram.push_sequential(PALETTE_ADDR_START, &self.output(), Orientation::Horizontal) {
            self.dirty = false;
        } else {
            debug!("Palette upload dropped, retrying next frame");
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new()
    }
}

fn palette_slot(slot: u8) -> usize {
    let slot = slot & 0x1F;
    if slot & 0x13 == 0x10 { (slot & 0x0F) as usize } else { slot as usize }
}

fn apply_brightness(color: u8, bright: u8) -> u8 {
    let hue = color & 0x0F;
    let level = (color & 0x30) as i16;

    match bright {
        BRIGHT_BLACK => COLOR_BLACK,
        BRIGHT_NORMAL => color,
        BRIGHT_WHITE => COLOR_WHITE,
        b if b < BRIGHT_NORMAL => {
            // the 0x0D-0x0F column is black at every level
            if hue >= 0x0D {
                return COLOR_BLACK;
            }
            let level = level - 0x10 * (BRIGHT_NORMAL - b) as i16;
            if level < 0 { COLOR_BLACK } else { level as u8 | hue }
        }
        b => {
            let hue = if hue >= 0x0D { 0x00 } else { hue };
            let level = (level + 0x10 * (b - BRIGHT_NORMAL) as i16).min(COLOR_WHITE as i16);
            level as u8 | hue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vram::{VramConfig, channel};

    #[test]
    fn brightness_levels() {
        assert_eq!(apply_brightness(0x21, BRIGHT_NORMAL), 0x21);
        assert_eq!(apply_brightness(0x21, BRIGHT_BLACK), 0x0F);
        assert_eq!(apply_brightness(0x21, BRIGHT_WHITE), 0x30);
        assert_eq!(apply_brightness(0x21, 3), 0x11);
        assert_eq!(apply_brightness(0x21, 1), 0x0F);
        assert_eq!(apply_brightness(0x21, 5), 0x31);
        assert_eq!(apply_brightness(0x0F, 3), 0x0F);
    }

    #[test]
    fn fade_keeps_the_end_state() {
        let mut palette = Palette::new();
        palette.pal_fade_to(4, 0);
        assert_eq!(palette.bright(), BRIGHT_BLACK);
        assert!(palette.output().iter().all(|&c| c == COLOR_BLACK));

        palette.pal_fade_to(0, 12);
        assert_eq!(palette.bright(), BRIGHT_WHITE);
    }

    #[test]
    fn sprite_backdrop_follows_background() {
        let mut palette = Palette::new();
        palette.pal_col(0x00, 0x2C);
        palette.pal_col(0x05, 0x16);

        let out = palette.output();
        assert_eq!(out[0x10], 0x2C);
        assert_eq!(out[0x04], COLOR_BLACK);
        assert_eq!(out[0x05], 0x16);
    }

    #[test]
    fn shared_cells_can_be_written_from_either_side() {
        let mut palette = Palette::new();
        palette.pal_col(0x10, 0x11);
        palette.pal_col(0x1C, 0x2A);
        palette.pal_col(0x15, 0x06);

        assert_eq!(palette.color(0x00), 0x11);
        assert_eq!(palette.color(0x0C), 0x2A);
        assert_eq!(palette.color(0x05), COLOR_BLACK);

        let out = palette.output();
        assert_eq!(out[0x00], 0x11);
        assert_eq!(out[0x10], 0x11);
        assert_eq!(out[0x1C], 0x2A);
        assert_eq!(out[0x15], 0x06);
    }

    #[test]
    fn dropped_upload_stays_dirty() {
        let (mut vram, _flusher) = channel(VramConfig {
            capacity: 16,
            frame_budget: 64,
        });
        let mut palette = Palette::new();

        palette.commit(&mut vram);
        assert!(palette.is_dirty());
        assert_eq!(vram.dropped(), 1);
    }

    #[test]
    fn pal_col_masks_slot_and_value() {
        let mut palette = Palette::new();
        palette.pal_col(0x21, 0xFF);
        assert_eq!(palette.color(1), 0x3F);
    }
}
