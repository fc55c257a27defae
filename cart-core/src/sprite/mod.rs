pub mod collision;
pub mod kind;
pub mod loader;
pub mod resolver;
pub mod slots;
