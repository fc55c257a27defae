//! Sprite type codes and what they mean.

use crate::player::{GameMode, PAD_HEIGHT_BLUE, PAD_HEIGHT_PINK};

/// Type code of a slot whose sprite was used up.
pub const NO_SPRITE: u8 = 0xFF;

/// Fixed hitbox width shared by every sprite.
pub const SPRITE_WIDTH: u8 = 0x0F;

/// Gravity pads come in a visible (blue) and an invisible (pink strength) flavour.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PadVariant {
    Visible,
    Invisible,
}

impl PadVariant {
    pub fn launch_impulse(&self) -> i16 {
        match self {
            PadVariant::Visible => PAD_HEIGHT_BLUE,
            PadVariant::Invisible => PAD_HEIGHT_PINK,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SpriteKind {
    /// Consumed sprite, or a slot that never held one.
    Gone,
    ModePortal(GameMode),
    UnusedPortal,
    BlueOrb,
    PinkOrb,
    Coin,
    /// Zone forcing normal gravity.
    GravityDown,
    /// Zone forcing flipped gravity.
    GravityUp,
    YellowPad,
    YellowOrb,
    GravityPadBottom(PadVariant),
    GravityPadTop(PadVariant),
    EndTrigger,
    /// Recolours the background (0x80-0xBF) or sprite (0xC0-0xEF) palette.
    ColorTrigger(u8),
    Unknown(u8),
}

impl SpriteKind {
    /// Triggers fire as soon as the sprite is live instead of on contact.
    pub fn is_trigger(&self) -> bool {
        matches!(self, SpriteKind::EndTrigger | SpriteKind::ColorTrigger(_))
    }
}

impl From<u8> for SpriteKind {
    fn from(value: u8) -> Self {
        match value {
            NO_SPRITE => SpriteKind::Gone,
            0x00 => SpriteKind::ModePortal(GameMode::Cube),
            0x01 => SpriteKind::ModePortal(GameMode::Ship),
            0x02 => SpriteKind::ModePortal(GameMode::Ball),
            0x03 => SpriteKind::ModePortal(GameMode::Ufo),
            0x04 => SpriteKind::UnusedPortal,
            0x05 => SpriteKind::BlueOrb,
            0x06 => SpriteKind::PinkOrb,
            0x07 => SpriteKind::Coin,
            0x08 | 0x10 | 0x11 | 0xFC => SpriteKind::GravityDown,
            0x09 | 0x12 | 0x13 | 0xFB => SpriteKind::GravityUp,
            0x0A | 0x0C => SpriteKind::YellowPad,
            0x0B => SpriteKind::YellowOrb,
            0x0D => SpriteKind::GravityPadBottom(PadVariant::Visible),
            0x0E => SpriteKind::GravityPadTop(PadVariant::Visible),
            0xFD => SpriteKind::GravityPadBottom(PadVariant::Invisible),
            0xFE => SpriteKind::GravityPadTop(PadVariant::Invisible),
            0x0F => SpriteKind::EndTrigger,
            0x80..=0xEF => SpriteKind::ColorTrigger(value),
            other => SpriteKind::Unknown(other),
        }
    }
}

/// Hitbox height for a sprite type. Pure: triggers report 0 here and are
/// fired separately by the resolver.
pub fn sprite_height_lookup(sprite_type: u8) -> u8 {
    match sprite_type {
        NO_SPRITE => 0,
        0xFD | 0xFE => 0x07,
        0xFB | 0xFC => 0x0F,
        0x80..=0xEF => 0,
        0x00..=0x04 => 0x2F,
        0x05 | 0x06 => 0x0F,
        0x07 => 0x17,
        0x08 | 0x09 => 0x2F,
        0x0A | 0x0C => 0x07,
        0x0B => 0x0F,
        0x0D | 0x0E => 0x04,
        0x10..=0x13 => 0x17,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights() {
        assert_eq!(sprite_height_lookup(0xFF), 0);
        assert_eq!(sprite_height_lookup(0x07), 0x17);
        assert_eq!(sprite_height_lookup(0x14), 0);
        assert_eq!(sprite_height_lookup(0x00), 0x2F);
        assert_eq!(sprite_height_lookup(0x0D), 0x04);
        assert_eq!(sprite_height_lookup(0xFD), 0x07);
        assert_eq!(sprite_height_lookup(0xFB), 0x0F);
        assert_eq!(sprite_height_lookup(0x12), 0x17);
        assert_eq!(sprite_height_lookup(0x0F), 0);
        assert_eq!(sprite_height_lookup(0x9A), 0);
        assert_eq!(sprite_height_lookup(0x7F), 0);
    }

    #[test]
    fn every_mapped_non_trigger_type_has_a_hitbox() {
        for value in 0..=u8::MAX {
            let kind = SpriteKind::from(value);
            let height = sprite_height_lookup(value);
            match kind {
                SpriteKind::Gone | SpriteKind::Unknown(_) | SpriteKind::EndTrigger | SpriteKind::ColorTrigger(_) => {
                    assert_eq!(height, 0, "type {:02x}", value)
                }
                _ => assert_ne!(height, 0, "type {:02x}", value),
            }
        }
    }

    #[test]
    fn classification() {
        assert_eq!(SpriteKind::from(0x02), SpriteKind::ModePortal(GameMode::Ball));
        assert_eq!(SpriteKind::from(0xFC), SpriteKind::GravityDown);
        assert_eq!(SpriteKind::from(0x13), SpriteKind::GravityUp);
        assert_eq!(SpriteKind::from(0xFE), SpriteKind::GravityPadTop(PadVariant::Invisible));
        assert_eq!(SpriteKind::from(0xC5), SpriteKind::ColorTrigger(0xC5));
        assert_eq!(SpriteKind::from(0x14), SpriteKind::Unknown(0x14));
        assert!(SpriteKind::from(0x0F).is_trigger());
    }
}
