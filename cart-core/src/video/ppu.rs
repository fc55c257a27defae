use super::registers::{Mirroring, PpuCtrl, PpuMask};
use super::{NAMETABLE_SIZE, PALETTE_SIZE, PATTERN_TABLE_SIZE, PPU_ADDR_MASK};
use log::*;

/// Video memory and the handful of registers the cartridge touches.
///
/// Writes only go through the address/data port pair, the same way the
/// vblank handler drives the real chip. Any data write made while rendering
/// is on and the beam is outside vertical blank is counted as a corrupting
/// write.
pub struct Ppu {
    chr: Box<[u8; PATTERN_TABLE_SIZE]>,
    nametables: [u8; NAMETABLE_SIZE * 2],
    palette_ram: [u8; PALETTE_SIZE],
    mirroring: Mirroring,
    pub ctrl: PpuCtrl,
    pub mask: PpuMask,
    vram_addr: u16,
    scroll_x: u16,
    scroll_y: u16,
    in_vblank: bool,
    corrupted_writes: usize,
}

impl Ppu {
    pub fn new(mirroring: Mirroring) -> Ppu {
        Ppu {
            chr: Box::new([0; PATTERN_TABLE_SIZE]),
            nametables: [0; NAMETABLE_SIZE * 2],
            palette_ram: [0; PALETTE_SIZE],
            mirroring,
            ctrl: PpuCtrl::NMI_ENABLE,
            mask: PpuMask::SHOW_BG | PpuMask::SHOW_SPRITES | PpuMask::SHOW_BG_LEFT | PpuMask::SHOW_SPRITES_LEFT,
            vram_addr: 0,
            scroll_x: 0,
            scroll_y: 0,
            in_vblank: false,
            corrupted_writes: 0,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn begin_vblank(&mut self) {
        self.in_vblank = true;
    }

    pub fn end_vblank(&mut self) {
        self.in_vblank = false;
    }

    pub fn in_vblank(&self) -> bool {
        self.in_vblank
    }

    /// Number of data writes that landed while the picture was being drawn.
    pub fn corrupted_writes(&self) -> usize {
        self.corrupted_writes
    }

    pub fn ppu_on_all(&mut self) {
        self.mask.insert(PpuMask::SHOW_BG | PpuMask::SHOW_SPRITES);
    }

    pub fn ppu_off(&mut self) {
        self.mask.remove(PpuMask::SHOW_BG | PpuMask::SHOW_SPRITES);
    }

    /// Replaces the emphasis bits of the mask register, leaving the rest alone.
    pub fn color_emphasis(&mut self, color: PpuMask) {
        self.mask = (self.mask - PpuMask::EMPHASIS) | (color & PpuMask::EMPHASIS);
    }

    pub fn set_scroll_x(&mut self, x: u16) {
        self.scroll_x = x & 0x1FF;
    }

    pub fn set_scroll_y(&mut self, y: u16) {
        self.scroll_y = y & 0x1FF;
    }

    pub fn scroll(&self) -> (u16, u16) {
        (self.scroll_x, self.scroll_y)
    }

    /// PPUADDR: latch the full 14-bit destination in one go.
    pub fn set_address(&mut self, addr: u16) {
        self.vram_addr = addr & PPU_ADDR_MASK;
    }

    pub fn address(&self) -> u16 {
        self.vram_addr
    }

    /// PPUDATA: store at the latched address, then step by the control increment.
    pub fn write_data(&mut self, value: u8) {
        if !self.in_vblank && self.mask.rendering_enabled() {
            self.corrupted_writes += 1;
            warn!(
                "PPU data write {:02x} to {:04x} outside vertical blank while rendering",
                value, self.vram_addr
            );
        }

        self.store(self.vram_addr, value);
        self.vram_addr = self.vram_addr.wrapping_add(self.ctrl.vram_increment()) & PPU_ADDR_MASK;
    }

    /// Direct inspection of video memory, bypassing the port.
    pub fn peek(&self, addr: u16) -> u8 {
        let addr = addr & PPU_ADDR_MASK;
        match addr {
            0x0000..=0x1FFF => self.chr[addr as usize],
            0x2000..=0x3EFF => self.nametables[self.nametable_index(addr)],
            0x3F00..=0x3FFF => self.palette_ram[Self::palette_index(addr)],
            _ => unreachable!(),
        }
    }

    pub fn palette(&self) -> &[u8; PALETTE_SIZE] {
        &self.palette_ram
    }

    fn store(&mut self, addr: u16, value: u8) {
        trace!("PPU write {:02x} to {:04x}", value, addr);

        match addr {
            0x0000..=0x1FFF => self.chr[addr as usize] = value,
            0x2000..=0x3EFF => {
                let index = self.nametable_index(addr);
                self.nametables[index] = value;
            }
            0x3F00..=0x3FFF => self.palette_ram[Self::palette_index(addr)] = value & 0x3F,
            _ => unreachable!(),
        }
    }

    fn nametable_index(&self, addr: u16) -> usize {
        // $3000-$3EFF mirrors $2000-$2EFF
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let physical = match self.mirroring {
            Mirroring::Horizontal => table / 2,
            Mirroring::Vertical => table % 2,
        };

        physical * NAMETABLE_SIZE + offset
    }

    fn palette_index(addr: u16) -> usize {
        let index = (addr & 0x1F) as usize;
        // $3F10/$3F14/$3F18/$3F1C share storage with the background entries
        if index >= 0x10 && index % 4 == 0 { index - 0x10 } else { index }
    }
}
