//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbamemorymap>

/// On-board work RAM (256 KB, 16-bit bus)
pub mod ewram {
    pub const BASE: u32 = 0x02000000;
    pub const SIZE: usize = 256 * 1024;
}

/// On-chip work RAM (32 KB, 32-bit bus)
pub mod iwram {
    pub const BASE: u32 = 0x03000000;
    pub const SIZE: usize = 32 * 1024;
}

/// I/O register block
///
/// Reference: <https://problemkaputt.de/gbatek.htm#gbaiomap>
pub mod io {
    /// I/O block base address
    pub const BASE: u32 = 0x04000000;
    /// Size of the mirrored I/O window; offsets are taken modulo this size
    pub const SIZE: usize = 0x400;
    /// Number of half-word slots backing the I/O window
    pub const SLOT_COUNT: usize = SIZE >> 1;
}

/// Game Pak regions whose access timing is programmed through WAITCNT
///
/// Reference: <https://problemkaputt.de/gbatek.htm#gbasystemcontrol>
pub mod cart {
    /// ROM mirror using wait state 0
    pub const WS0_BASE: u32 = 0x08000000;
    /// ROM mirror using wait state 1
    pub const WS1_BASE: u32 = 0x0A000000;
    /// ROM mirror using wait state 2
    pub const WS2_BASE: u32 = 0x0C000000;
    /// Game Pak SRAM
    pub const SRAM_BASE: u32 = 0x0E000000;
    /// SRAM mirror
    pub const SRAM_MIRROR_BASE: u32 = 0x0F000000;
}
