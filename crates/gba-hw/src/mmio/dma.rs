//! # References
//! - <https://problemkaputt.de/gbatek.htm#gbadmatransfers>

/// Number of DMA channels
pub const CHANNELS: usize = 4;

/// Distance between the register blocks of consecutive channels
pub const CHANNEL_STRIDE: u32 = 0x00C;

/// DMA register offsets
pub mod registers {
    pub const DMA0SAD_LO: u32 = 0x0B0;
    pub const DMA0SAD_HI: u32 = 0x0B2;
    pub const DMA0DAD_LO: u32 = 0x0B4;
    pub const DMA0DAD_HI: u32 = 0x0B6;
    pub const DMA0CNT_LO: u32 = 0x0B8;
    pub const DMA0CNT_HI: u32 = 0x0BA;
    pub const DMA1SAD_LO: u32 = 0x0BC;
    pub const DMA1SAD_HI: u32 = 0x0BE;
    pub const DMA1DAD_LO: u32 = 0x0C0;
    pub const DMA1DAD_HI: u32 = 0x0C2;
    pub const DMA1CNT_LO: u32 = 0x0C4;
    pub const DMA1CNT_HI: u32 = 0x0C6;
    pub const DMA2SAD_LO: u32 = 0x0C8;
    pub const DMA2SAD_HI: u32 = 0x0CA;
    pub const DMA2DAD_LO: u32 = 0x0CC;
    pub const DMA2DAD_HI: u32 = 0x0CE;
    pub const DMA2CNT_LO: u32 = 0x0D0;
    pub const DMA2CNT_HI: u32 = 0x0D2;
    pub const DMA3SAD_LO: u32 = 0x0D4;
    pub const DMA3SAD_HI: u32 = 0x0D6;
    pub const DMA3DAD_LO: u32 = 0x0D8;
    pub const DMA3DAD_HI: u32 = 0x0DA;
    pub const DMA3CNT_LO: u32 = 0x0DC;
    pub const DMA3CNT_HI: u32 = 0x0DE;
}

/// DMAxCNT_HI bit fields
pub mod control {
    pub const DEST_CONTROL_MASK: u16 = 0x0060;
    pub const SRC_CONTROL_MASK: u16 = 0x0180;
    pub const REPEAT: u16 = 0x0200;
    pub const WIDTH_32: u16 = 0x0400;
    /// Game Pak DRQ, channel 3 only
    pub const DRQ: u16 = 0x0800;
    pub const TIMING_SHIFT: u16 = 12;
    pub const TIMING_MASK: u16 = 0x3000;
    pub const IRQ: u16 = 0x4000;
    pub const ENABLE: u16 = 0x8000;
    /// Writable bits on channels 0-2
    pub const WRITE_MASK: u16 = 0xF7E0;
    /// Writable bits on channel 3 (adds DRQ)
    pub const WRITE_MASK_DMA3: u16 = 0xFFE0;
}

/// Source address bits honoured by the engine
pub const SOURCE_MASK: u32 = 0x0FFF_FFFE;

/// Destination address bits honoured by the engine
pub const DEST_MASK: u32 = 0x0FFF_FFFE;

/// Word count meaning "maximum" when zero is written, channels 0-2
pub const MAX_COUNT: u32 = 0x4000;

/// Word count meaning "maximum" when zero is written, channel 3
pub const MAX_COUNT_DMA3: u32 = 0x10000;
