//! Per-frame collision pass between the player and every live sprite, and
//! the rules each sprite type applies on contact.

use super::collision::{Collidable, check_collision};
use super::kind::{PadVariant, SpriteKind};
use super::slots::MAX_LOADED_SPRITES;
use crate::game::{GameContext, GameState};
use crate::input::registers::Buttons;
use crate::player::{Gravity, JUMP_VEL, PAD_HEIGHT_PINK, PAD_HEIGHT_YELLOW};
use crate::video::palette::{BRIGHT_BLACK, BRIGHT_NORMAL};
use log::*;

const COLOR_BLACK: u8 = 0x0F;

/// Fires a trigger sprite. Triggers act as soon as they are live, whether or
/// not the player touches them, and are consumed so they act once.
/// Returns whether the slot held a trigger.
pub fn activate_trigger(ctx: &mut GameContext, index: usize) -> bool {
    let sprite = ctx.sprites.get(index);
    if !sprite.active {
        return false;
    }

    match sprite.kind() {
        SpriteKind::ColorTrigger(sprite_type) => {
            let color = sprite_type & 0x3F;
            // one step darker for the companion entry, black when there is none
            let shade = color.checked_sub(0x10).unwrap_or(COLOR_BLACK);
            let (main, companion) = if sprite_type >= 0xC0 { (6, 5) } else { (0, 1) };

            debug!(
                "Color trigger {:02x}: palette {} = {:02x}, {} = {:02x}",
                sprite_type, main, color, companion, shade
            );
            ctx.palette.pal_col(main, color);
            ctx.palette.pal_col(companion, shade);
        }
        SpriteKind::EndTrigger => {
            info!("End trigger reached, level complete");
            ctx.game_state = GameState::LevelComplete;
            ctx.palette.pal_fade_to(BRIGHT_NORMAL, BRIGHT_BLACK);
        }
        _ => return false,
    }

    ctx.sprites.get_mut(index).consume();
    true
}

/// Tests the player against every active slot and applies the contact rule
/// of each sprite it overlaps. Returns the number of contacts.
pub fn sprite_collide(ctx: &mut GameContext) -> usize {
    let player = ctx.player.hitbox();
    let mut contacts = 0;

    for index in 0..MAX_LOADED_SPRITES {
        if !ctx.sprites.get(index).active {
            continue;
        }

        if activate_trigger(ctx, index) {
            continue;
        }

        let sprite = *ctx.sprites.get(index);
        if check_collision(&player, &sprite) {
            trace!("Player touches sprite {:02x} in slot {}", sprite.sprite_type, index);
            sprite_collide_lookup(ctx, index);
            contacts += 1;
        }
    }

    contacts
}

/// Applies the contact rule for the sprite in slot `index`.
///
/// Rules are checked in order and at most one applies per call. Each type
/// code belongs to exactly one rule.
pub fn sprite_collide_lookup(ctx: &mut GameContext, index: usize) {
    let kind = ctx.sprites.get(index).kind();
    let pressed = ctx.joypad.get_pad_new().contains(Buttons::A);
    let player = &mut ctx.player;

    match kind {
        SpriteKind::Gone => {}
        SpriteKind::ModePortal(mode) => {
            if player.mode != mode {
                debug!("Mode portal: {} -> {}", player.mode, mode);
            }
            player.mode = mode;
        }
        SpriteKind::YellowOrb => {
            if orb_ready(player.mode.is_grounded_mode(), player.is_grounded(), pressed) {
                player.cube_data = 0;
                player.vel_y = player.gravity.relative(JUMP_VEL);
            }
        }
        SpriteKind::Coin => {
            ctx.coins = ctx.coins.wrapping_add(1);
            ctx.sprites.get_mut(index).consume();
            debug!("Coin collected ({} total)", ctx.coins);
        }
        SpriteKind::BlueOrb => {
            if orb_ready(player.mode.is_grounded_mode(), player.is_grounded(), pressed) {
                player.cube_data = 0;
                player.gravity = player.gravity.toggled();
                player.vel_y = match player.gravity {
                    Gravity::Normal => !PAD_HEIGHT_PINK,
                    Gravity::Flipped => PAD_HEIGHT_PINK,
                };
                debug!("Blue orb flips gravity to {:?}", player.gravity);
            }
        }
        SpriteKind::PinkOrb => {
            // only the ground check, in every mode
            if player.is_grounded() {
                player.cube_data = 0;
                player.vel_y = player.gravity.relative(PAD_HEIGHT_PINK);
            }
        }
        SpriteKind::GravityDown => player.gravity = Gravity::Normal,
        SpriteKind::GravityUp => player.gravity = Gravity::Flipped,
        SpriteKind::YellowPad => player.vel_y = player.gravity.relative(PAD_HEIGHT_YELLOW),
        SpriteKind::GravityPadBottom(variant) => {
            if player.gravity == Gravity::Normal {
                player.gravity = Gravity::Flipped;
                player.vel_y = if player.vel_y == 0 { !variant.launch_impulse() } else { 0 };
                debug!("Bottom gravity pad, vel_y = {:04x}", player.vel_y);
            }
        }
        SpriteKind::GravityPadTop(variant) => {
            if player.gravity == Gravity::Flipped {
                player.gravity = Gravity::Normal;
                player.vel_y = match (player.vel_y, variant) {
                    (0, _) => variant.launch_impulse(),
                    (vel_y, PadVariant::Visible) => vel_y.wrapping_neg(),
                    (_, PadVariant::Invisible) => 0,
                };
                debug!("Top gravity pad, vel_y = {:04x}", player.vel_y);
            }
        }
        // triggers are handled by activate_trigger before contact
        SpriteKind::EndTrigger | SpriteKind::ColorTrigger(_) => {}
        SpriteKind::UnusedPortal | SpriteKind::Unknown(_) => {}
    }
}

/// Orbs need the player on the ground in cube and ball mode, and a fresh
/// press of A while flying.
fn orb_ready(grounded_mode: bool, grounded: bool, pressed: bool) -> bool {
    if grounded_mode { grounded } else { pressed }
}
