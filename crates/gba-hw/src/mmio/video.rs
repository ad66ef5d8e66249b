//! # References
//! - <https://problemkaputt.de/gbatek.htm#lcdiodisplaycontrol>
//! - <https://problemkaputt.de/gbatek.htm#lcdiobgcontrol>

/// Video register offsets
pub mod registers {
    pub const DISPCNT: u32 = 0x000;
    /// Undocumented green swap; not backed by a valid register
    pub const GREENSWP: u32 = 0x002;
    pub const DISPSTAT: u32 = 0x004;
    pub const VCOUNT: u32 = 0x006;
    pub const BG0CNT: u32 = 0x008;
    pub const BG1CNT: u32 = 0x00A;
    pub const BG2CNT: u32 = 0x00C;
    pub const BG3CNT: u32 = 0x00E;
    pub const BG0HOFS: u32 = 0x010;
    pub const BG0VOFS: u32 = 0x012;
    pub const BG1HOFS: u32 = 0x014;
    pub const BG1VOFS: u32 = 0x016;
    pub const BG2HOFS: u32 = 0x018;
    pub const BG2VOFS: u32 = 0x01A;
    pub const BG3HOFS: u32 = 0x01C;
    pub const BG3VOFS: u32 = 0x01E;
    pub const BG2PA: u32 = 0x020;
    pub const BG2PB: u32 = 0x022;
    pub const BG2PC: u32 = 0x024;
    pub const BG2PD: u32 = 0x026;
    pub const BG2X_LO: u32 = 0x028;
    pub const BG2X_HI: u32 = 0x02A;
    pub const BG2Y_LO: u32 = 0x02C;
    pub const BG2Y_HI: u32 = 0x02E;
    pub const BG3PA: u32 = 0x030;
    pub const BG3PB: u32 = 0x032;
    pub const BG3PC: u32 = 0x034;
    pub const BG3PD: u32 = 0x036;
    pub const BG3X_LO: u32 = 0x038;
    pub const BG3X_HI: u32 = 0x03A;
    pub const BG3Y_LO: u32 = 0x03C;
    pub const BG3Y_HI: u32 = 0x03E;
    pub const WIN0H: u32 = 0x040;
    pub const WIN1H: u32 = 0x042;
    pub const WIN0V: u32 = 0x044;
    pub const WIN1V: u32 = 0x046;
    pub const WININ: u32 = 0x048;
    pub const WINOUT: u32 = 0x04A;
    pub const MOSAIC: u32 = 0x04C;
    pub const BLDCNT: u32 = 0x050;
    pub const BLDALPHA: u32 = 0x052;
    pub const BLDY: u32 = 0x054;
}

/// DISPCNT bit fields
pub mod dispcnt {
    /// Bit 3 reports CGB mode and cannot be set by software
    pub const CGB_MODE: u16 = 0x0008;
    /// Forced blank; set at power-on
    pub const FORCED_BLANK: u16 = 0x0080;
}

/// DISPSTAT bit fields
pub mod dispstat {
    pub const IN_VBLANK: u16 = 0x0001;
    pub const IN_HBLANK: u16 = 0x0002;
    pub const VCOUNTER_MATCH: u16 = 0x0004;
    /// Status bits maintained by the video unit; software writes ignore them
    pub const READ_ONLY: u16 = IN_VBLANK | IN_HBLANK | VCOUNTER_MATCH;
    pub const VBLANK_IRQ: u16 = 0x0008;
    pub const HBLANK_IRQ: u16 = 0x0010;
    pub const VCOUNTER_IRQ: u16 = 0x0020;
    /// V-count setting occupies the high byte
    pub const VCOUNT_SETTING_SHIFT: u16 = 8;
}

/// Identity value of the affine scale parameters (1.0 in 8.8 fixed point)
pub const AFFINE_IDENTITY: u16 = 0x0100;
