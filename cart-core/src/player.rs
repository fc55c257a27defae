use crate::high_byte;
use crate::sprite::collision::{Collidable, Hitbox};

pub const CUBE_WIDTH: u8 = 0x0F;
pub const CUBE_HEIGHT: u8 = 0x0F;
pub const MINI_CUBE_WIDTH: u8 = 0x07;
pub const MINI_CUBE_HEIGHT: u8 = 0x07;

// Vertical impulses in 8.8 fixed point; negative is up the screen.
pub const JUMP_VEL: i16 = -0x0580;
pub const PAD_HEIGHT_YELLOW: i16 = -0x0680;
pub const PAD_HEIGHT_PINK: i16 = -0x04A0;
pub const PAD_HEIGHT_BLUE: i16 = -0x0300;

/// `cube_data` value meaning the player stands on a surface and may jump.
pub const CUBE_DATA_GROUNDED: u8 = 0x02;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum GameMode {
    #[default]
    Cube = 0,
    Ship = 1,
    Ball = 2,
    Ufo = 3,
}

impl GameMode {
    /// Modes whose orbs need the player to be standing on something.
    pub fn is_grounded_mode(&self) -> bool {
        matches!(self, GameMode::Cube | GameMode::Ball)
    }
}

impl TryFrom<u8> for GameMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameMode::Cube),
            1 => Ok(GameMode::Ship),
            2 => Ok(GameMode::Ball),
            3 => Ok(GameMode::Ufo),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Cube => write!(f, "cube"),
            GameMode::Ship => write!(f, "ship"),
            GameMode::Ball => write!(f, "ball"),
            GameMode::Ufo => write!(f, "ufo"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Gravity {
    #[default]
    Normal = 0,
    Flipped = 1,
}

impl Gravity {
    pub fn toggled(self) -> Gravity {
        match self {
            Gravity::Normal => Gravity::Flipped,
            Gravity::Flipped => Gravity::Normal,
        }
    }

    /// Turns an impulse tuned for normal gravity into the one for the current
    /// direction. Flipping is the ones' complement, as on the cartridge.
    pub fn relative(self, impulse: i16) -> i16 {
        match self {
            Gravity::Normal => impulse,
            Gravity::Flipped => !impulse,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Player {
    /// 8.8 fixed-point screen position.
    pub x: u16,
    pub y: u16,
    /// 8.8 fixed-point vertical velocity.
    pub vel_y: i16,
    pub gravity: Gravity,
    pub mode: GameMode,
    pub mini: bool,
    pub cube_data: u8,
}

impl Player {
    pub fn new(x: u16, y: u16) -> Player {
        Player {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.cube_data == CUBE_DATA_GROUNDED
    }
}

impl Collidable for Player {
    fn hitbox(&self) -> Hitbox {
        let (width, height) = if self.mini {
            (MINI_CUBE_WIDTH, MINI_CUBE_HEIGHT)
        } else {
            (CUBE_WIDTH, CUBE_HEIGHT)
        };

        Hitbox {
            x: high_byte(self.x),
            y: high_byte(self.y),
            width,
            height,
        }
    }
}
