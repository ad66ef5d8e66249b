//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbainterruptcontrol>

/// Interrupt register offsets
pub mod registers {
    pub const IE: u32 = 0x200;
    pub const IF: u32 = 0x202;
    pub const IME: u32 = 0x208;
}

/// Interrupt source bits shared by IE and IF
pub mod sources {
    pub const VBLANK: u16 = 1 << 0;
    pub const HBLANK: u16 = 1 << 1;
    pub const VCOUNTER: u16 = 1 << 2;
    pub const TIMER0: u16 = 1 << 3;
    pub const TIMER1: u16 = 1 << 4;
    pub const TIMER2: u16 = 1 << 5;
    pub const TIMER3: u16 = 1 << 6;
    pub const SIO: u16 = 1 << 7;
    pub const DMA0: u16 = 1 << 8;
    pub const DMA1: u16 = 1 << 9;
    pub const DMA2: u16 = 1 << 10;
    pub const DMA3: u16 = 1 << 11;
    pub const KEYPAD: u16 = 1 << 12;
    pub const GAMEPAK: u16 = 1 << 13;
}
