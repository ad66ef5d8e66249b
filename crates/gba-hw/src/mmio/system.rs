//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbasystemcontrol>

/// System control register offsets
pub mod registers {
    pub const WAITCNT: u32 = 0x204;
    /// First offset past the register file proper. Some interrupt
    /// libraries touch it, so it is tolerated.
    pub const REG_MAX: u32 = 0x20A;
    pub const POSTFLG: u32 = 0x300;
    /// Byte-wide; only reachable through 8-bit writes
    pub const HALTCNT: u32 = 0x301;
}

/// HALTCNT bit 7 selects stop mode instead of halt
pub const HALTCNT_STOP: u8 = 0x80;

/// WAITCNT bit fields
pub mod waitcnt {
    pub const SRAM_MASK: u16 = 0x0003;
    pub const WS0_NONSEQ_MASK: u16 = 0x000C;
    pub const WS0_SEQ: u16 = 0x0010;
    pub const WS1_NONSEQ_MASK: u16 = 0x0060;
    pub const WS1_SEQ: u16 = 0x0080;
    pub const WS2_NONSEQ_MASK: u16 = 0x0300;
    pub const WS2_SEQ: u16 = 0x0400;
    pub const PREFETCH: u16 = 0x4000;
}

/// Extra wait cycles for non-sequential Game Pak accesses, indexed by the
/// two-bit WAITCNT field
pub const ROM_WAITSTATES: [u32; 4] = [4, 3, 2, 8];

/// Extra wait cycles for sequential accesses: pairs of (bit clear, bit set)
/// for WS0, WS1, WS2
pub const ROM_WAITSTATES_SEQ: [u32; 6] = [2, 1, 4, 1, 8, 1];
