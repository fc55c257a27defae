use super::slots::{ActiveSprite, SpriteTable};
use crate::video::SCREEN_WIDTH;
use log::*;

/// Column value that ends a level's sprite table.
pub const TURN_OFF: u16 = 0xFFFF;

/// One entry of a level's sprite table, sorted by `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRecord {
    /// Level column in pixels.
    pub x: u16,
    /// Screen row in pixels.
    pub y: u8,
    pub sprite_type: u8,
}

impl SpriteRecord {
    pub const END: SpriteRecord = SpriteRecord {
        x: TURN_OFF,
        y: 0xFF,
        sprite_type: 0xFF,
    };

    pub fn is_turn_off(&self) -> bool {
        self.x == TURN_OFF
    }
}

/// Streams a level's sprite table into the slot table as the camera scrolls.
#[derive(Debug, Clone, Default)]
pub struct SpriteLoader {
    records: Vec<SpriteRecord>,
    next: usize,
}

impl SpriteLoader {
    pub fn new(records: &[SpriteRecord]) -> Self {
        let end = records.iter().position(SpriteRecord::is_turn_off).unwrap_or(records.len());
        SpriteLoader {
            records: records[..end].to_vec(),
            next: 0,
        }
    }

    /// Empties the table and loads everything visible from the left edge of the level.
    pub fn init_sprites(&mut self, table: &mut SpriteTable) -> usize {
        self.next = 0;
        table.clear();
        while self.load_next_sprite(table, 0) {}

        let loaded = table.active_count();
        debug!("Loaded {} of {} sprites", loaded, self.records.len());
        loaded
    }

    /// Loads the next record if it has scrolled into view and a slot is free.
    /// Records the camera already passed are skipped. Returns whether the
    /// loader made progress.
    pub fn load_next_sprite(&mut self, table: &mut SpriteTable, scroll_x: u16) -> bool {
        let Some(record) = self.records.get(self.next).copied() else {
            return false;
        };

        if record.x < scroll_x {
            trace!("Skipping sprite {:02x} at {}, already off screen", record.sprite_type, record.x);
            self.next += 1;
            return true;
        }

        if record.x as usize >= scroll_x as usize + SCREEN_WIDTH {
            return false;
        }

        let Some(index) = table.free_slot() else {
            return false;
        };

        *table.get_mut(index) = ActiveSprite {
            sprite_type: record.sprite_type,
            active: true,
            world_x: record.x,
            x: (record.x - scroll_x) << 8,
            y: (record.y as u16) << 8,
        };
        self.next += 1;

        trace!(
            "Sprite {:02x} loaded into slot {} at ({}, {})",
            record.sprite_type, index, record.x, record.y
        );
        true
    }

    /// Moves live sprites with the camera, retires the ones that left the
    /// screen on either side, then loads whatever scrolled in.
    ///
    /// Records are streamed forward only: a sprite retired because the camera
    /// moved back is not loaded again.
    pub fn check_spr_objects(&mut self, table: &mut SpriteTable, scroll_x: u16) {
        let right_edge = scroll_x as usize + SCREEN_WIDTH;

        for slot in table.iter_mut().filter(|slot| slot.active) {
            if slot.world_x < scroll_x || slot.world_x as usize >= right_edge {
                trace!("Sprite {:02x} scrolled off at {}", slot.sprite_type, slot.world_x);
                slot.active = false;
            } else {
                slot.x = (slot.world_x - scroll_x) << 8;
            }
        }

        while self.load_next_sprite(table, scroll_x) {}
    }

    pub fn remaining(&self) -> usize {
        self.records.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::slots::MAX_LOADED_SPRITES;

    fn record(x: u16, sprite_type: u8) -> SpriteRecord {
        SpriteRecord { x, y: 0x80, sprite_type }
    }

    #[test]
    fn init_stops_at_turn_off_and_screen_edge() {
        let records = [
            record(0x10, 0x07),
            record(0x40, 0x05),
            record(0x200, 0x07),
            SpriteRecord::END,
            record(0x20, 0x07),
        ];
        let mut loader = SpriteLoader::new(&records);
        let mut table = SpriteTable::new();

        assert_eq!(loader.init_sprites(&mut table), 2);
        assert_eq!(loader.remaining(), 1);
        assert_eq!(table.get(1).x, 0x4000);
        assert_eq!(table.get(1).y, 0x8000);
    }

    #[test]
    fn init_respects_slot_count() {
        let records: Vec<_> = (0..20).map(|i| record(i * 8, 0x07)).collect();
        let mut loader = SpriteLoader::new(&records);
        let mut table = SpriteTable::new();

        assert_eq!(loader.init_sprites(&mut table), MAX_LOADED_SPRITES);
        assert_eq!(loader.remaining(), 20 - MAX_LOADED_SPRITES);
    }

    #[test]
    fn scrolling_retires_and_refills() {
        let records = [record(0x10, 0x07), record(0x180, 0x0B)];
        let mut loader = SpriteLoader::new(&records);
        let mut table = SpriteTable::new();
        loader.init_sprites(&mut table);

        loader.check_spr_objects(&mut table, 0x08);
        assert!(table.get(0).active);
        assert_eq!(table.get(0).x, 0x0800);

        // the coin's slot is reused by the orb that scrolled in
        loader.check_spr_objects(&mut table, 0x90);
        assert_eq!(table.active_count(), 1);
        assert_eq!(loader.remaining(), 0);

        let orb = table.get(0);
        assert!(orb.active);
        assert_eq!(orb.sprite_type, 0x0B);
        assert_eq!(orb.x, (0x180 - 0x90) << 8);
    }

    #[test]
    fn scrolling_back_retires_sprites_past_the_right_edge() {
        let records = [record(0x1F0, 0x07)];
        let mut loader = SpriteLoader::new(&records);
        let mut table = SpriteTable::new();

        loader.check_spr_objects(&mut table, 0x100);
        assert!(table.get(0).active);
        assert_eq!(table.get(0).x, 0xF000);

        loader.check_spr_objects(&mut table, 0x10);
        assert!(!table.get(0).active);
        assert_eq!(table.active_count(), 0);

        loader.check_spr_objects(&mut table, 0x100);
        assert_eq!(table.active_count(), 0);
    }
}
