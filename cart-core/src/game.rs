use crate::input::joypad::Joypad;
use crate::player::Player;
use crate::sprite::loader::{SpriteLoader, SpriteRecord};
use crate::sprite::resolver::sprite_collide;
use crate::sprite::slots::SpriteTable;
use crate::video::PALETTE_SIZE;
use crate::video::nametable::get_ppu_addr;
use crate::video::palette::Palette;
use crate::vram::buffer::VramBuffer;
use crate::vram::update::Orientation;
use log::*;

pub const PLAYER_START_X: u16 = 0x2000;
pub const PLAYER_START_Y: u16 = 0xA000;

/// Pixel position of the coin counter in nametable 0.
pub const HUD_X: u8 = 0xD8;
pub const HUD_Y: u8 = 0x10;
/// Tile index of the digit 0; the other digits follow it.
pub const DIGIT_TILE_BASE: u8 = 0x30;

pub const LEVEL_PALETTE: [u8; PALETTE_SIZE] = [
    0x11, 0x01, 0x30, 0x0F, 0x11, 0x21, 0x31, 0x0F, 0x11, 0x17, 0x27, 0x0F, 0x11, 0x2A, 0x1A, 0x0F,
    0x11, 0x28, 0x18, 0x30, 0x11, 0x16, 0x26, 0x30, 0x11, 0x0F, 0x2C, 0x30, 0x11, 0x0F, 0x38, 0x30,
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum GameState {
    #[default]
    Playing,
    LevelComplete = 0x03,
}

/// Everything the per-frame logic reads and writes.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub player: Player,
    pub sprites: SpriteTable,
    pub loader: SpriteLoader,
    pub joypad: Joypad,
    pub palette: Palette,
    pub coins: u8,
    pub game_state: GameState,
    /// Camera position in level pixels.
    pub scroll_x: u16,
    // counter value currently on screen
    hud_coins: Option<u8>,
}

impl GameContext {
    pub fn new() -> Self {
        GameContext {
            player: Player::new(PLAYER_START_X, PLAYER_START_Y),
            sprites: SpriteTable::new(),
            loader: SpriteLoader::default(),
            joypad: Joypad::new(),
            palette: Palette::new(),
            coins: 0,
            game_state: GameState::Playing,
            scroll_x: 0,
            hud_coins: None,
        }
    }

    /// Scene transition. Anything still queued for the previous scene is
    /// dropped before the new one starts writing.
    pub fn load_level(&mut self, records: &[SpriteRecord], vram: &mut VramBuffer) {
        vram.clear();

        let mini = self.player.mini;
        self.player = Player::new(PLAYER_START_X, PLAYER_START_Y);
        self.player.mini = mini;

        self.palette = Palette::new();
        self.palette.pal_all(&LEVEL_PALETTE);

        self.coins = 0;
        self.hud_coins = None;
        self.game_state = GameState::Playing;
        self.scroll_x = 0;

        self.loader = SpriteLoader::new(records);
        let loaded = self.loader.init_sprites(&mut self.sprites);
        info!("Level loaded: {} sprites live, {} waiting", loaded, self.loader.remaining());
    }

    /// One pass of game logic. Returns the number of sprites the player touched.
    pub fn frame(&mut self, vram: &mut VramBuffer) -> usize {
        self.joypad.pad_poll();

        let contacts = if self.game_state == GameState::Playing {
            self.loader.check_spr_objects(&mut self.sprites, self.scroll_x);
            sprite_collide(self)
        } else {
            0
        };

        self.draw_coins(vram);
        self.palette.commit(vram);
        contacts
    }

    fn draw_coins(&mut self, vram: &mut VramBuffer) {
        if self.hud_coins == Some(self.coins) {
            return;
        }

        let tiles = [
            DIGIT_TILE_BASE + self.coins / 100,
            DIGIT_TILE_BASE + self.coins / 10 % 10,
            DIGIT_TILE_BASE + self.coins % 10,
        ];
        if vram.push_sequential(get_ppu_addr(0, HUD_X, HUD_Y), &tiles, Orientation::Horizontal) {
            self.hud_coins = Some(self.coins);
        }
    }
}

impl Default for GameContext {
    fn default() -> Self {
        GameContext::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vram::{VramConfig, channel};

    // single palette upload plus the three counter digits
    const FIRST_FRAME_BYTES: usize = 3 + PALETTE_SIZE + 3 + 3;

    fn coin_at_player() -> SpriteRecord {
        SpriteRecord {
            x: 0x24,
            y: 0xA0,
            sprite_type: 0x07,
        }
    }

    #[test]
    fn load_level_drops_queued_writes() {
        let (mut vram, _flusher) = channel(VramConfig::default());
        vram.push_single(0x2100, 0xAA);
        assert!(!vram.is_empty());

        let mut ctx = GameContext::new();
        ctx.coins = 9;
        ctx.load_level(&[coin_at_player(), SpriteRecord::END], &mut vram);

        assert!(vram.is_empty());
        assert_eq!(ctx.coins, 0);
        assert_eq!(ctx.sprites.active_count(), 1);
        assert_eq!(ctx.palette.color(0), LEVEL_PALETTE[0]);
    }

    #[test]
    fn counter_is_redrawn_only_when_it_changes() {
        let (mut vram, _flusher) = channel(VramConfig {
            capacity: 256,
            frame_budget: 128,
        });
        let mut ctx = GameContext::new();
        ctx.load_level(&[SpriteRecord::END], &mut vram);

        assert_eq!(ctx.frame(&mut vram), 0);
        assert_eq!(vram.buffered_bytes(), FIRST_FRAME_BYTES);

        ctx.frame(&mut vram);
        assert_eq!(vram.buffered_bytes(), FIRST_FRAME_BYTES);

        ctx.coins = 12;
        ctx.frame(&mut vram);
        assert_eq!(vram.buffered_bytes(), FIRST_FRAME_BYTES + 6);
    }

    #[test]
    fn coin_is_collected_during_a_frame() {
        let (mut vram, _flusher) = channel(VramConfig::default());
        let mut ctx = GameContext::new();
        ctx.load_level(&[coin_at_player(), SpriteRecord::END], &mut vram);

        assert_eq!(ctx.frame(&mut vram), 1);
        assert_eq!(ctx.coins, 1);
        assert_eq!(ctx.frame(&mut vram), 0);
        assert_eq!(ctx.coins, 1);
    }

    #[test]
    fn finished_level_stops_collisions() {
        let (mut vram, _flusher) = channel(VramConfig::default());
        let mut ctx = GameContext::new();
        ctx.load_level(&[coin_at_player(), SpriteRecord::END], &mut vram);
        ctx.game_state = GameState::LevelComplete;

        assert_eq!(ctx.frame(&mut vram), 0);
        assert_eq!(ctx.coins, 0);
    }

    #[test]
    fn mini_flag_survives_a_reload() {
        let (mut vram, _flusher) = channel(VramConfig::default());
        let mut ctx = GameContext::new();
        ctx.player.mini = true;
        ctx.player.vel_y = 0x100;

        ctx.load_level(&[SpriteRecord::END], &mut vram);
        assert!(ctx.player.mini);
        assert_eq!(ctx.player.vel_y, 0);
    }
}
