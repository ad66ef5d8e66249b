//! Register offsets (relative to [`crate::memory_map::io::BASE`]) and bit
//! fields, grouped by the peripheral that owns them.
//!
//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbaiomap>

pub mod dma;
pub mod irq;
pub mod keypad;
pub mod serial;
pub mod sound;
pub mod system;
pub mod timer;
pub mod video;
