//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbasoundcontroller>

/// Sound register offsets
pub mod registers {
    pub const SOUND1CNT_LO: u32 = 0x060;
    pub const SOUND1CNT_HI: u32 = 0x062;
    pub const SOUND1CNT_X: u32 = 0x064;
    pub const SOUND2CNT_LO: u32 = 0x068;
    pub const SOUND2CNT_HI: u32 = 0x06C;
    pub const SOUND3CNT_LO: u32 = 0x070;
    pub const SOUND3CNT_HI: u32 = 0x072;
    pub const SOUND3CNT_X: u32 = 0x074;
    pub const SOUND4CNT_LO: u32 = 0x078;
    pub const SOUND4CNT_HI: u32 = 0x07C;
    pub const SOUNDCNT_LO: u32 = 0x080;
    pub const SOUNDCNT_HI: u32 = 0x082;
    pub const SOUNDCNT_X: u32 = 0x084;
    pub const SOUNDBIAS: u32 = 0x088;
    pub const WAVE_RAM0_LO: u32 = 0x090;
    pub const WAVE_RAM0_HI: u32 = 0x092;
    pub const WAVE_RAM1_LO: u32 = 0x094;
    pub const WAVE_RAM1_HI: u32 = 0x096;
    pub const WAVE_RAM2_LO: u32 = 0x098;
    pub const WAVE_RAM2_HI: u32 = 0x09A;
    pub const WAVE_RAM3_LO: u32 = 0x09C;
    pub const WAVE_RAM3_HI: u32 = 0x09E;
    pub const FIFO_A_LO: u32 = 0x0A0;
    pub const FIFO_A_HI: u32 = 0x0A2;
    pub const FIFO_B_LO: u32 = 0x0A4;
    pub const FIFO_B_HI: u32 = 0x0A6;
}

/// Bits kept in storage after a write (the rest are unreadable or unused)
pub mod write_masks {
    pub const SOUND1CNT_LO: u16 = 0x007F;
    pub const SOUND1CNT_X: u16 = 0x47FF;
    pub const SOUND2CNT_HI: u16 = 0x47FF;
    pub const SOUND3CNT_LO: u16 = 0x00E0;
    pub const SOUND3CNT_HI: u16 = 0xE03F;
    pub const SOUND3CNT_X: u16 = 0x47FF;
    pub const SOUND4CNT_LO: u16 = 0xFF3F;
    pub const SOUND4CNT_HI: u16 = 0x40FF;
    pub const SOUNDCNT_LO: u16 = 0xFF77;
    pub const SOUNDCNT_HI: u16 = 0x770F;
}

/// Bits that read back once write-only fields (length, frequency, restart)
/// are hidden
pub mod read_masks {
    pub const SOUND1CNT_HI: u16 = 0xFFC0;
    pub const SOUND1CNT_X: u16 = 0x4000;
    pub const SOUND2CNT_LO: u16 = 0xFFC0;
    pub const SOUND2CNT_HI: u16 = 0x4000;
    pub const SOUND3CNT_HI: u16 = 0xE000;
    pub const SOUND3CNT_X: u16 = 0x4000;
    pub const SOUND4CNT_LO: u16 = 0xFF00;
    pub const SOUND4CNT_HI: u16 = 0x4000;
}

/// SOUNDCNT_X bit fields
pub mod soundcnt_x {
    /// Master enable for the whole sound circuit
    pub const MASTER_ENABLE: u16 = 0x0080;
    /// Per-channel "playing" flags; read-only
    pub const CHANNEL_ACTIVE: u16 = 0x000F;
}

/// Power-on value of SOUNDBIAS
pub const SOUNDBIAS_INITIAL: u16 = 0x0200;

/// Number of 32-bit wave RAM banks visible at once
pub const WAVE_RAM_BANKS: usize = 4;
