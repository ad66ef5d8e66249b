//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbatimers>

/// Number of hardware timers
pub const COUNT: usize = 4;

/// Distance between the register pairs of consecutive timers
pub const TIMER_STRIDE: u32 = 0x004;

/// Timer register offsets
pub mod registers {
    pub const TM0CNT_LO: u32 = 0x100;
    pub const TM0CNT_HI: u32 = 0x102;
    pub const TM1CNT_LO: u32 = 0x104;
    pub const TM1CNT_HI: u32 = 0x106;
    pub const TM2CNT_LO: u32 = 0x108;
    pub const TM2CNT_HI: u32 = 0x10A;
    pub const TM3CNT_LO: u32 = 0x10C;
    pub const TM3CNT_HI: u32 = 0x10E;
}

/// TMxCNT_HI bit fields
pub mod control {
    pub const PRESCALE_MASK: u16 = 0x0003;
    pub const COUNT_UP: u16 = 0x0004;
    pub const IRQ: u16 = 0x0040;
    pub const START: u16 = 0x0080;
    /// Bits that exist in hardware
    pub const WRITE_MASK: u16 = 0x00C7;
}

/// Cycle shift for each prescaler selection (1, 64, 256, 1024)
pub const PRESCALE_SHIFTS: [u32; 4] = [0, 6, 8, 10];
