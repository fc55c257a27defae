use crate::event::BlankEvent;
use cart_core::game::{GameContext, GameState, PLAYER_START_Y};
use cart_core::input::joypad::Joypad;
use cart_core::input::registers::Buttons;
use cart_core::player::{CUBE_DATA_GROUNDED, GameMode, Gravity, JUMP_VEL, Player};
use cart_core::vram::buffer::VramBuffer;
use crossbeam_channel::Receiver;
use log::*;

/// Camera speed in pixels per frame.
const SCROLL_SPEED: u16 = 2;

// 8.8 fixed point, per frame
const GRAVITY: i16 = 0x0050;
const SHIP_THRUST: i16 = 0x00A0;
const MAX_SPEED: i16 = 0x0700;

const FLOOR_Y: u16 = PLAYER_START_Y;
const CEILING_Y: u16 = 0x1000;

#[derive(Debug, Default)]
pub struct RunStats {
    pub frames: usize,
    pub contacts: usize,
    pub missed_blanks: usize,
    pub coins: u8,
    pub dropped: usize,
    pub state: GameState,
}

/// The main loop of the cartridge: input, game logic, physics, then wait
/// for the next vertical blank.
pub struct Runner {
    ctx: GameContext,
    vram: VramBuffer,
    blank_rx: Receiver<BlankEvent>,
    frames: usize,
}

impl Runner {
    pub fn new(ctx: GameContext, vram: VramBuffer, blank_rx: Receiver<BlankEvent>, frames: usize) -> Self {
        Self {
            ctx,
            vram,
            blank_rx,
            frames,
        }
    }

    pub fn run(mut self) -> RunStats {
        let mut stats = RunStats::default();
        let mut last_blank: Option<u8> = None;

        for frame in 0..self.frames {
            self.ctx.joypad.set_key_state(Buttons::A, scripted_jump(frame));

            let contacts = self.ctx.frame(&mut self.vram);
            stats.contacts += contacts;
            step_physics(&mut self.ctx.player, &self.ctx.joypad);
            self.ctx.scroll_x = self.ctx.scroll_x.saturating_add(SCROLL_SPEED);
            stats.frames += 1;

            match self.blank_rx.recv() {
                Ok(BlankEvent::Blank { frame: blank, report }) => {
                    if let Some(last) = last_blank {
                        stats.missed_blanks += blank.wrapping_sub(last).saturating_sub(1) as usize;
                    }
                    last_blank = Some(blank);

                    if report.deferred {
                        debug!("Frame {}: flush ran out of budget", frame);
                    }
                }
                Err(_) => {
                    warn!("Blank handler stopped, ending the game loop");
                    break;
                }
            }

            if self.ctx.game_state == GameState::LevelComplete {
                info!("Level complete after {} frames", stats.frames);
                break;
            }
        }

        stats.coins = self.ctx.coins;
        stats.dropped = self.vram.dropped();
        stats.state = self.ctx.game_state;
        stats
    }
}

/// Holds A for a few frames out of every forty.
fn scripted_jump(frame: usize) -> bool {
    frame % 40 < 4
}

/// A small stand-in for the real movement code, enough to carry the player
/// through the demo level.
fn step_physics(player: &mut Player, pad: &Joypad) {
    let down: i16 = match player.gravity {
        Gravity::Normal => 1,
        Gravity::Flipped => -1,
    };
    let jump = pad.get_pad_new().contains(Buttons::A);

    match player.mode {
        GameMode::Cube | GameMode::Ball if jump && player.is_grounded() => {
            player.vel_y = player.gravity.relative(JUMP_VEL);
            player.cube_data = 0;
        }
        GameMode::Ship if pad.is_key_pressed(Buttons::A) => {
            player.vel_y = player.vel_y.saturating_sub(down * SHIP_THRUST);
        }
        GameMode::Ufo if jump => player.vel_y = player.gravity.relative(JUMP_VEL) / 2,
        _ => (),
    }

    player.vel_y = player.vel_y.saturating_add(down * GRAVITY).clamp(-MAX_SPEED, MAX_SPEED);
    let y = (player.y as i32 + player.vel_y as i32).clamp(CEILING_Y as i32, FLOOR_Y as i32) as u16;
    player.y = y;

    let landed = match player.gravity {
        Gravity::Normal => y == FLOOR_Y && player.vel_y >= 0,
        Gravity::Flipped => y == CEILING_Y && player.vel_y <= 0,
    };

    if landed {
        player.vel_y = 0;
        player.cube_data = CUBE_DATA_GROUNDED;
    } else if player.is_grounded() {
        player.cube_data = 0;
    }
}
