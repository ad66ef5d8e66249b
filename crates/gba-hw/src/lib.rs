//! Hardware definitions for the GBA memory-mapped I/O block.
//!
//! Everything in this crate is plain data: region geometry, clock and keypad
//! specifications, and the register offsets/bit fields of each peripheral
//! group. Behaviour lives in `gba-io`.

pub mod memory_map;
pub mod mmio;
pub mod specs;
