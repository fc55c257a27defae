use bitflags::bitflags;

bitflags! {
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PpuCtrl: u8 {
        const NAMETABLE_SELECT  = 0b0000_0011;
        const VRAM_INCREMENT_32 = 1 << 2;
        const SPRITE_TABLE      = 1 << 3;
        const BG_TABLE          = 1 << 4;
        const SPRITE_SIZE_16    = 1 << 5;
        const MASTER_SLAVE      = 1 << 6;
        const NMI_ENABLE        = 1 << 7;
    }

    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PpuMask: u8 {
        const GREYSCALE         = 1 << 0;
        const SHOW_BG_LEFT      = 1 << 1;
        const SHOW_SPRITES_LEFT = 1 << 2;
        const SHOW_BG           = 1 << 3;
        const SHOW_SPRITES      = 1 << 4;
        const EMPHASIZE_RED     = 1 << 5;
        const EMPHASIZE_GREEN   = 1 << 6;
        const EMPHASIZE_BLUE    = 1 << 7;
        const EMPHASIS          = 0b1110_0000;
    }
}

impl PpuCtrl {
    /// Address step applied after every data port write.
    pub fn vram_increment(&self) -> u16 {
        if self.contains(PpuCtrl::VRAM_INCREMENT_32) { 32 } else { 1 }
    }
}

impl PpuMask {
    pub fn rendering_enabled(&self) -> bool {
        self.intersects(PpuMask::SHOW_BG | PpuMask::SHOW_SPRITES)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Mirroring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mirroring::Horizontal => write!(f, "horizontal"),
            Mirroring::Vertical => write!(f, "vertical"),
        }
    }
}
