use super::collision::{Collidable, Hitbox};
use super::kind::{NO_SPRITE, SPRITE_WIDTH, SpriteKind, sprite_height_lookup};
use crate::high_byte;

pub const MAX_LOADED_SPRITES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSprite {
    pub sprite_type: u8,
    pub active: bool,
    /// Level column of the sprite, in pixels.
    pub world_x: u16,
    /// 8.8 fixed-point screen position.
    pub x: u16,
    pub y: u16,
}

impl ActiveSprite {
    pub const EMPTY: ActiveSprite = ActiveSprite {
        sprite_type: NO_SPRITE,
        active: false,
        world_x: 0,
        x: 0,
        y: 0,
    };

    pub fn kind(&self) -> SpriteKind {
        SpriteKind::from(self.sprite_type)
    }

    /// Takes the sprite out of play so it cannot fire again.
    pub fn consume(&mut self) {
        self.sprite_type = NO_SPRITE;
        self.active = false;
    }
}

impl Default for ActiveSprite {
    fn default() -> Self {
        ActiveSprite::EMPTY
    }
}

impl Collidable for ActiveSprite {
    fn hitbox(&self) -> Hitbox {
        Hitbox {
            x: high_byte(self.x),
            y: high_byte(self.y),
            width: SPRITE_WIDTH,
            height: sprite_height_lookup(self.sprite_type),
        }
    }
}

/// Fixed table of loaded sprites. The sprite code owns positions; the
/// collision resolver only ever changes `active` and `sprite_type`.
#[derive(Debug, Clone)]
pub struct SpriteTable {
    slots: [ActiveSprite; MAX_LOADED_SPRITES],
}

impl SpriteTable {
    pub fn new() -> Self {
        SpriteTable {
            slots: [ActiveSprite::EMPTY; MAX_LOADED_SPRITES],
        }
    }

    pub fn get(&self, index: usize) -> &ActiveSprite {
        &self.slots[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut ActiveSprite {
        &mut self.slots[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveSprite> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActiveSprite> {
        self.slots.iter_mut()
    }

    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| !slot.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn clear(&mut self) {
        self.slots = [ActiveSprite::EMPTY; MAX_LOADED_SPRITES];
    }
}

impl Default for SpriteTable {
    fn default() -> Self {
        SpriteTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitbox_uses_type_height() {
        let coin = ActiveSprite {
            sprite_type: 0x07,
            active: true,
            world_x: 0,
            x: 0x3000,
            y: 0x9080,
        };

        assert_eq!(
            coin.hitbox(),
            Hitbox {
                x: 0x30,
                y: 0x90,
                width: SPRITE_WIDTH,
                height: 0x17
            }
        );
    }

    #[test]
    fn consume_frees_the_slot() {
        let mut table = SpriteTable::new();
        assert_eq!(table.free_slot(), Some(0));

        table.get_mut(0).sprite_type = 0x07;
        table.get_mut(0).active = true;
        assert_eq!(table.free_slot(), Some(1));
        assert_eq!(table.active_count(), 1);

        table.get_mut(0).consume();
        assert_eq!(table.get(0).kind(), SpriteKind::Gone);
        assert_eq!(table.free_slot(), Some(0));
    }
}
