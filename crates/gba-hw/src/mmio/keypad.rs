//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbakeypadinput>

/// Keypad register offsets
pub mod registers {
    pub const KEYINPUT: u32 = 0x130;
    pub const KEYCNT: u32 = 0x132;
}
