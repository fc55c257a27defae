pub mod joypad;
pub mod registers;
