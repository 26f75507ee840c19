pub mod config;
pub mod play;
pub mod progress;
pub mod stickers;
