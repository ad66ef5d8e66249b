//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbacommunicationports>

/// Serial register offsets
pub mod registers {
    pub const SIOMULTI0: u32 = 0x120;
    pub const SIOMULTI1: u32 = 0x122;
    pub const SIOMULTI2: u32 = 0x124;
    pub const SIOMULTI3: u32 = 0x126;
    pub const SIOCNT: u32 = 0x128;
    pub const SIOMLT_SEND: u32 = 0x12A;
    pub const RCNT: u32 = 0x134;
    pub const JOYCNT: u32 = 0x140;
    pub const JOY_RECV_LO: u32 = 0x150;
    pub const JOY_RECV_HI: u32 = 0x152;
    pub const JOY_TRANS_LO: u32 = 0x154;
    pub const JOY_TRANS_HI: u32 = 0x156;
    pub const JOYSTAT: u32 = 0x158;
}

/// Bits of RCNT that can be written
pub const RCNT_WRITE_MASK: u16 = 0xC1FF;

/// RCNT bits driven by the link port pins; preserved across writes
pub const RCNT_PIN_STATE: u16 = 0x000F;

/// Power-on value of RCNT
pub const RCNT_INITIAL: u16 = 0x8000;

/// SIOCNT bit fields
pub mod siocnt {
    /// Bits 12-13 select normal/multiplayer/UART
    pub const MODE_SHIFT: u16 = 12;
    pub const MODE_MASK: u16 = 0x3000;
    pub const START: u16 = 0x0080;
    pub const IRQ: u16 = 0x4000;
}

/// RCNT bit fields
pub mod rcnt {
    /// Bits 14-15 select SIO/GPIO/JOY bus
    pub const MODE_SHIFT: u16 = 14;
    pub const MODE_MASK: u16 = 0xC000;
}
