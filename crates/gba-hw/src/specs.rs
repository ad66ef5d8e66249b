/// CPU specifications
pub mod cpu {
    /// ARM7TDMI clock (16.78 MHz)
    pub const ARM7_HZ: u64 = 16_777_216;
}

/// Display specifications
pub mod display {
    /// Screen width in pixels
    pub const WIDTH: u32 = 240;

    /// Screen height in pixels
    pub const HEIGHT: u32 = 160;

    /// Total scanlines per frame, including vertical blank
    pub const TOTAL_LINES: u32 = 228;

    /// Cycles per scanline
    pub const CYCLES_PER_LINE: u32 = 1232;
}

/// Keypad specifications
pub mod keypad {
    /// Number of physical keys reported through KEYINPUT
    pub const KEY_COUNT: u32 = 10;

    /// KEYINPUT value with every key released (active-low)
    pub const ALL_RELEASED: u16 = 0x03FF;

    pub const A: u16 = 1 << 0;
    pub const B: u16 = 1 << 1;
    pub const SELECT: u16 = 1 << 2;
    pub const START: u16 = 1 << 3;
    pub const RIGHT: u16 = 1 << 4;
    pub const LEFT: u16 = 1 << 5;
    pub const UP: u16 = 1 << 6;
    pub const DOWN: u16 = 1 << 7;
    pub const R: u16 = 1 << 8;
    pub const L: u16 = 1 << 9;
}
