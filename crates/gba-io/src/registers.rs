//! Register file storage and the static per-register classification table.
//!
//! Every even offset of the I/O window has a 16-bit slot in [`RegisterFile`].
//! Registers that exist in hardware additionally have a [`RegisterInfo`]
//! descriptor in [`REGISTERS`], which drives dispatch on both the read and
//! write path as well as the snapshot policy for that slot.
//!
//! The two snapshot flags are independent: `raw_on_save` means the
//! canonical read path must not run while saving (it would have side effects
//! or return a recomputed value), `raw_on_load` means the canonical write path
//! must not run while restoring (it would re-trigger edge-sensitive effects).

use crate::mmio::audio::Fifo;
use gba_hw::memory_map::io;
use gba_hw::mmio::{dma, irq, keypad, serial, sound, system, timer, video};
use ReadKind as R;
use WriteKind as W;

pub use io::SLOT_COUNT;

/// Number of slots covered by snapshots (everything below `REG_MAX`)
pub const SNAPSHOT_SLOTS: usize = (system::registers::REG_MAX >> 1) as usize;

/// Backing storage for the I/O window, one cell per half-word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    slots: [u16; SLOT_COUNT],
}

impl RegisterFile {
    /// All-zero storage
    pub fn new() -> Self {
        Self {
            slots: [0; SLOT_COUNT],
        }
    }

    /// Storage holding the hardware power-on values
    pub fn power_on() -> Self {
        let mut regs = Self::new();
        regs.set(video::registers::DISPCNT, video::dispcnt::FORCED_BLANK);
        regs.set(serial::registers::RCNT, serial::RCNT_INITIAL);
        regs.set(
            keypad::registers::KEYINPUT,
            gba_hw::specs::keypad::ALL_RELEASED,
        );
        regs.set(sound::registers::SOUNDBIAS, sound::SOUNDBIAS_INITIAL);
        regs.set(video::registers::BG2PA, video::AFFINE_IDENTITY);
        regs.set(video::registers::BG2PD, video::AFFINE_IDENTITY);
        regs.set(video::registers::BG3PA, video::AFFINE_IDENTITY);
        regs.set(video::registers::BG3PD, video::AFFINE_IDENTITY);
        regs
    }

    /// Slot index for an I/O offset. Offsets wrap at the window size.
    pub fn slot_index(address: u32) -> usize {
        (address as usize & (io::SIZE - 1)) >> 1
    }

    pub fn get(&self, address: u32) -> u16 {
        self.slots[Self::slot_index(address)]
    }

    pub fn set(&mut self, address: u32, value: u16) {
        self.slots[Self::slot_index(address)] = value;
    }

    /// Combined 32-bit value of the slot pair starting at `address`
    pub fn get32(&self, address: u32) -> u32 {
        let address = address & !3;
        self.get(address) as u32 | (self.get(address | 2) as u32) << 16
    }

    /// Store both halves of a 32-bit value starting at `address`
    pub fn set32(&mut self, address: u32, value: u32) {
        self.set(address, value as u16);
        self.set(address + 2, (value >> 16) as u16);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Target of a logically 32-bit register split over two slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideTarget {
    WaveRam(usize),
    Fifo(Fifo),
    DmaSource(usize),
    DmaDest(usize),
}

/// Write-side handler for a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Generic video register hook
    Video,
    DisplayStatus,
    /// Forwarded to the audio unit, then masked. Gated registers are the ones
    /// the master enable powers down.
    Sound { mask: u16, gated: bool },
    SoundMasterEnable,
    /// Low half of a composite register
    Composite(WideTarget),
    /// High half of a composite register; the low half sits two bytes below
    CompositeHigh,
    DmaCount(usize),
    DmaControl(usize),
    TimerReload(usize),
    TimerControl(usize),
    SerialControl,
    SerialRcnt,
    SerialMultiSend,
    Waitstates,
    InterruptEnable,
    InterruptAcknowledge,
    InterruptMasterEnable,
    /// Accepted and stored without side effects
    Tolerated,
    /// No behaviour implemented; stored after a stub diagnostic
    Stub,
}

/// Read-side handler for a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    /// Slot contents are authoritative
    Transparent,
    /// Reads as zero while the sound circuit is off. `readable` lists the bits
    /// that are not write-only.
    SoundGated { readable: u16 },
    WriteOnly,
    Stub,
    TimerCounter(usize),
    KeyInput,
    SerialControl,
    SerialRcnt,
    /// No readable latch at this offset
    Unused,
}

/// Static description of one register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterInfo {
    pub address: u32,
    pub name: Option<&'static str>,
    /// Backed by real hardware
    pub valid: bool,
    /// Snapshot copies the slot literally instead of reading it
    pub raw_on_save: bool,
    /// Restore loads the slot literally instead of replaying the write
    pub raw_on_load: bool,
    /// Reading it does not count as polling hardware state
    pub read_constant: bool,
    pub read: ReadKind,
    pub write: WriteKind,
}

impl RegisterInfo {
    const fn named(address: u32, name: &'static str) -> Self {
        Self {
            address,
            name: Some(name),
            valid: true,
            raw_on_save: false,
            raw_on_load: false,
            read_constant: false,
            read: ReadKind::Unused,
            write: WriteKind::Stub,
        }
    }

    const fn padding(address: u32) -> Self {
        Self {
            name: None,
            valid: false,
            ..Self::named(address, "")
        }
    }

    const fn invalid(self) -> Self {
        Self {
            valid: false,
            ..self
        }
    }

    const fn raw_save(self) -> Self {
        Self {
            raw_on_save: true,
            ..self
        }
    }

    const fn raw_load(self) -> Self {
        Self {
            raw_on_load: true,
            ..self
        }
    }

    const fn raw(self) -> Self {
        self.raw_save().raw_load()
    }

    const fn constant(self) -> Self {
        Self {
            read_constant: true,
            ..self
        }
    }

    const fn reads(self, read: ReadKind) -> Self {
        Self { read, ..self }
    }

    const fn writes(self, write: WriteKind) -> Self {
        Self { write, ..self }
    }
}

const fn vid(address: u32, name: &'static str) -> RegisterInfo {
    RegisterInfo::named(address, name).writes(W::Video)
}

/// Write-only video register: scroll, affine, window, mosaic, fade
const fn vid_wo(address: u32, name: &'static str) -> RegisterInfo {
    vid(address, name).raw_save().reads(R::WriteOnly)
}

const fn snd(address: u32, name: &'static str, mask: u16, readable: u16) -> RegisterInfo {
    RegisterInfo::named(address, name)
        .constant()
        .reads(R::SoundGated { readable })
        .writes(W::Sound { mask, gated: true })
}

const fn wide(address: u32, name: &'static str, target: WideTarget) -> RegisterInfo {
    RegisterInfo::named(address, name).writes(W::Composite(target))
}

const fn wide_hi(address: u32, name: &'static str) -> RegisterInfo {
    RegisterInfo::named(address, name).writes(W::CompositeHigh)
}

/// Link port and JOY bus registers: stored literally in both directions
const fn link(address: u32, name: &'static str) -> RegisterInfo {
    RegisterInfo::named(address, name).raw()
}

const ALL: u16 = 0xFFFF;

/// The register classification table.
pub const REGISTERS: &[RegisterInfo] = {
    use dma::registers::*;
    use irq::registers::*;
    use keypad::registers::*;
    use serial::registers::*;
    use sound::registers::*;
    use sound::{read_masks as rm, write_masks as wm};
    use system::registers::*;
    use timer::registers::*;
    use video::registers::*;

    &[
        // Video
        vid(DISPCNT, "DISPCNT").reads(R::Transparent),
        RegisterInfo::named(DISPSTAT, "DISPSTAT")
            .raw()
            .reads(R::Transparent)
            .writes(W::DisplayStatus),
        vid(VCOUNT, "VCOUNT").raw().reads(R::Transparent),
        vid(BG0CNT, "BG0CNT").constant().reads(R::Transparent),
        vid(BG1CNT, "BG1CNT").constant().reads(R::Transparent),
        vid(BG2CNT, "BG2CNT").constant().reads(R::Transparent),
        vid(BG3CNT, "BG3CNT").constant().reads(R::Transparent),
        vid_wo(BG0HOFS, "BG0HOFS"),
        vid_wo(BG0VOFS, "BG0VOFS"),
        vid_wo(BG1HOFS, "BG1HOFS"),
        vid_wo(BG1VOFS, "BG1VOFS"),
        vid_wo(BG2HOFS, "BG2HOFS"),
        vid_wo(BG2VOFS, "BG2VOFS"),
        vid_wo(BG3HOFS, "BG3HOFS"),
        vid_wo(BG3VOFS, "BG3VOFS"),
        vid_wo(BG2PA, "BG2PA"),
        vid_wo(BG2PB, "BG2PB"),
        vid_wo(BG2PC, "BG2PC"),
        vid_wo(BG2PD, "BG2PD"),
        vid_wo(BG2X_LO, "BG2X_LO"),
        vid_wo(BG2X_HI, "BG2X_HI"),
        vid_wo(BG2Y_LO, "BG2Y_LO"),
        vid_wo(BG2Y_HI, "BG2Y_HI"),
        vid_wo(BG3PA, "BG3PA"),
        vid_wo(BG3PB, "BG3PB"),
        vid_wo(BG3PC, "BG3PC"),
        vid_wo(BG3PD, "BG3PD"),
        vid_wo(BG3X_LO, "BG3X_LO"),
        vid_wo(BG3X_HI, "BG3X_HI"),
        vid_wo(BG3Y_LO, "BG3Y_LO"),
        vid_wo(BG3Y_HI, "BG3Y_HI"),
        vid_wo(WIN0H, "WIN0H"),
        vid_wo(WIN1H, "WIN1H"),
        vid_wo(WIN0V, "WIN0V"),
        vid_wo(WIN1V, "WIN1V"),
        vid(WININ, "WININ").raw_save().constant().reads(R::Transparent),
        vid(WINOUT, "WINOUT").raw_save().constant().reads(R::Transparent),
        vid_wo(MOSAIC, "MOSAIC"),
        RegisterInfo::padding(0x04E).raw_save(),
        vid(BLDCNT, "BLDCNT").raw_save().constant().reads(R::Transparent),
        vid(BLDALPHA, "BLDALPHA").raw_save().constant().reads(R::Transparent),
        vid_wo(BLDY, "BLDY"),
        RegisterInfo::padding(0x056).raw_save(),
        RegisterInfo::padding(0x058).raw_save(),
        RegisterInfo::padding(0x05A).raw_save(),
        RegisterInfo::padding(0x05C).raw_save(),
        RegisterInfo::padding(0x05E).raw_save(),
        // Sound
        snd(SOUND1CNT_LO, "SOUND1CNT_LO", wm::SOUND1CNT_LO, ALL),
        snd(SOUND1CNT_HI, "SOUND1CNT_HI", ALL, rm::SOUND1CNT_HI),
        snd(SOUND1CNT_X, "SOUND1CNT_X", wm::SOUND1CNT_X, rm::SOUND1CNT_X),
        snd(SOUND2CNT_LO, "SOUND2CNT_LO", ALL, rm::SOUND2CNT_LO),
        snd(SOUND2CNT_HI, "SOUND2CNT_HI", wm::SOUND2CNT_HI, rm::SOUND2CNT_HI),
        snd(SOUND3CNT_LO, "SOUND3CNT_LO", wm::SOUND3CNT_LO, ALL),
        snd(SOUND3CNT_HI, "SOUND3CNT_HI", wm::SOUND3CNT_HI, rm::SOUND3CNT_HI),
        snd(SOUND3CNT_X, "SOUND3CNT_X", wm::SOUND3CNT_X, rm::SOUND3CNT_X),
        snd(SOUND4CNT_LO, "SOUND4CNT_LO", wm::SOUND4CNT_LO, rm::SOUND4CNT_LO),
        snd(SOUND4CNT_HI, "SOUND4CNT_HI", wm::SOUND4CNT_HI, rm::SOUND4CNT_HI),
        snd(SOUNDCNT_LO, "SOUNDCNT_LO", wm::SOUNDCNT_LO, ALL),
        snd(SOUNDCNT_HI, "SOUNDCNT_HI", wm::SOUNDCNT_HI, ALL),
        RegisterInfo::named(SOUNDCNT_X, "SOUNDCNT_X")
            .raw_load()
            .reads(R::Transparent)
            .writes(W::SoundMasterEnable),
        RegisterInfo::named(SOUNDBIAS, "SOUNDBIAS")
            .raw_save()
            .reads(R::Stub)
            .writes(W::Sound {
                mask: ALL,
                gated: false,
            }),
        wide(WAVE_RAM0_LO, "WAVE_RAM0_LO", WideTarget::WaveRam(0))
            .raw()
            .reads(R::Transparent),
        wide_hi(WAVE_RAM0_HI, "WAVE_RAM0_HI").raw().reads(R::Transparent),
        wide(WAVE_RAM1_LO, "WAVE_RAM1_LO", WideTarget::WaveRam(1))
            .raw()
            .reads(R::Transparent),
        wide_hi(WAVE_RAM1_HI, "WAVE_RAM1_HI").raw().reads(R::Transparent),
        wide(WAVE_RAM2_LO, "WAVE_RAM2_LO", WideTarget::WaveRam(2))
            .raw()
            .reads(R::Transparent),
        wide_hi(WAVE_RAM2_HI, "WAVE_RAM2_HI").raw().reads(R::Transparent),
        wide(WAVE_RAM3_LO, "WAVE_RAM3_LO", WideTarget::WaveRam(3))
            .raw()
            .reads(R::Transparent),
        wide_hi(WAVE_RAM3_HI, "WAVE_RAM3_HI").raw().reads(R::Transparent),
        wide(FIFO_A_LO, "FIFO_A_LO", WideTarget::Fifo(Fifo::A))
            .raw()
            .reads(R::WriteOnly),
        wide_hi(FIFO_A_HI, "FIFO_A_HI").raw().reads(R::WriteOnly),
        wide(FIFO_B_LO, "FIFO_B_LO", WideTarget::Fifo(Fifo::B))
            .raw()
            .reads(R::WriteOnly),
        wide_hi(FIFO_B_HI, "FIFO_B_HI").raw().reads(R::WriteOnly),
        // DMA
        wide(DMA0SAD_LO, "DMA0SAD_LO", WideTarget::DmaSource(0))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA0SAD_HI, "DMA0SAD_HI").raw_save().reads(R::WriteOnly),
        wide(DMA0DAD_LO, "DMA0DAD_LO", WideTarget::DmaDest(0))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA0DAD_HI, "DMA0DAD_HI").raw_save().reads(R::WriteOnly),
        RegisterInfo::named(DMA0CNT_LO, "DMA0CNT_LO")
            .raw_save()
            .reads(R::WriteOnly)
            .writes(W::DmaCount(0)),
        RegisterInfo::named(DMA0CNT_HI, "DMA0CNT_HI")
            .raw()
            .reads(R::Transparent)
            .writes(W::DmaControl(0)),
        wide(DMA1SAD_LO, "DMA1SAD_LO", WideTarget::DmaSource(1))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA1SAD_HI, "DMA1SAD_HI").raw_save().reads(R::WriteOnly),
        wide(DMA1DAD_LO, "DMA1DAD_LO", WideTarget::DmaDest(1))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA1DAD_HI, "DMA1DAD_HI").raw_save().reads(R::WriteOnly),
        RegisterInfo::named(DMA1CNT_LO, "DMA1CNT_LO")
            .raw_save()
            .reads(R::WriteOnly)
            .writes(W::DmaCount(1)),
        RegisterInfo::named(DMA1CNT_HI, "DMA1CNT_HI")
            .raw()
            .reads(R::Transparent)
            .writes(W::DmaControl(1)),
        wide(DMA2SAD_LO, "DMA2SAD_LO", WideTarget::DmaSource(2))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA2SAD_HI, "DMA2SAD_HI").raw_save().reads(R::WriteOnly),
        wide(DMA2DAD_LO, "DMA2DAD_LO", WideTarget::DmaDest(2))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA2DAD_HI, "DMA2DAD_HI").raw_save().reads(R::WriteOnly),
        RegisterInfo::named(DMA2CNT_LO, "DMA2CNT_LO")
            .raw_save()
            .reads(R::WriteOnly)
            .writes(W::DmaCount(2)),
        RegisterInfo::named(DMA2CNT_HI, "DMA2CNT_HI")
            .raw()
            .reads(R::Transparent)
            .writes(W::DmaControl(2)),
        wide(DMA3SAD_LO, "DMA3SAD_LO", WideTarget::DmaSource(3))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA3SAD_HI, "DMA3SAD_HI").raw_save().reads(R::WriteOnly),
        wide(DMA3DAD_LO, "DMA3DAD_LO", WideTarget::DmaDest(3))
            .raw_save()
            .reads(R::WriteOnly),
        wide_hi(DMA3DAD_HI, "DMA3DAD_HI").raw_save().reads(R::WriteOnly),
        RegisterInfo::named(DMA3CNT_LO, "DMA3CNT_LO")
            .raw_save()
            .reads(R::WriteOnly)
            .writes(W::DmaCount(3)),
        RegisterInfo::named(DMA3CNT_HI, "DMA3CNT_HI")
            .raw()
            .reads(R::Transparent)
            .writes(W::DmaControl(3)),
        // Timers
        RegisterInfo::named(TM0CNT_LO, "TM0CNT_LO")
            .raw()
            .reads(R::TimerCounter(0))
            .writes(W::TimerReload(0)),
        RegisterInfo::named(TM0CNT_HI, "TM0CNT_HI")
            .raw()
            .constant()
            .reads(R::Transparent)
            .writes(W::TimerControl(0)),
        RegisterInfo::named(TM1CNT_LO, "TM1CNT_LO")
            .raw()
            .reads(R::TimerCounter(1))
            .writes(W::TimerReload(1)),
        RegisterInfo::named(TM1CNT_HI, "TM1CNT_HI")
            .raw()
            .constant()
            .reads(R::Transparent)
            .writes(W::TimerControl(1)),
        RegisterInfo::named(TM2CNT_LO, "TM2CNT_LO")
            .raw()
            .reads(R::TimerCounter(2))
            .writes(W::TimerReload(2)),
        RegisterInfo::named(TM2CNT_HI, "TM2CNT_HI")
            .raw()
            .constant()
            .reads(R::Transparent)
            .writes(W::TimerControl(2)),
        RegisterInfo::named(TM3CNT_LO, "TM3CNT_LO")
            .raw()
            .reads(R::TimerCounter(3))
            .writes(W::TimerReload(3)),
        RegisterInfo::named(TM3CNT_HI, "TM3CNT_HI")
            .raw()
            .constant()
            .reads(R::Transparent)
            .writes(W::TimerControl(3)),
        // Serial, keypad
        link(SIOMULTI0, "SIOMULTI0").reads(R::Transparent),
        link(SIOMULTI1, "SIOMULTI1").reads(R::Transparent),
        link(SIOMULTI2, "SIOMULTI2").reads(R::Transparent),
        link(SIOMULTI3, "SIOMULTI3").reads(R::Transparent),
        link(SIOCNT, "SIOCNT")
            .reads(R::SerialControl)
            .writes(W::SerialControl),
        RegisterInfo::named(SIOMLT_SEND, "SIOMLT_SEND")
            .invalid()
            .reads(R::Transparent)
            .writes(W::SerialMultiSend),
        link(KEYINPUT, "KEYINPUT").constant().reads(R::KeyInput),
        link(KEYCNT, "KEYCNT").reads(R::Stub),
        link(RCNT, "RCNT").reads(R::SerialRcnt).writes(W::SerialRcnt),
        link(JOYCNT, "JOYCNT").reads(R::Stub),
        link(JOY_RECV_LO, "JOY_RECV_LO").reads(R::Stub),
        RegisterInfo::named(JOY_RECV_HI, "JOY_RECV_HI").invalid(),
        link(JOY_TRANS_LO, "JOY_TRANS_LO").reads(R::Stub),
        RegisterInfo::named(JOY_TRANS_HI, "JOY_TRANS_HI").invalid(),
        link(JOYSTAT, "JOYSTAT"),
        // Interrupts, system control
        RegisterInfo::named(IE, "IE")
            .raw_load()
            .constant()
            .reads(R::Transparent)
            .writes(W::InterruptEnable),
        RegisterInfo::named(IF, "IF")
            .raw_load()
            .reads(R::Transparent)
            .writes(W::InterruptAcknowledge),
        RegisterInfo::named(WAITCNT, "WAITCNT")
            .reads(R::Transparent)
            .writes(W::Waitstates),
        RegisterInfo::named(IME, "IME")
            .raw_load()
            .reads(R::Transparent)
            .writes(W::InterruptMasterEnable),
        RegisterInfo::padding(REG_MAX)
            .reads(R::Transparent)
            .writes(W::Tolerated),
        RegisterInfo::named(POSTFLG, "POSTFLG").invalid().reads(R::Stub),
    ]
};

const NO_DESCRIPTOR: u8 = u8::MAX;

const fn build_slot_index(table: &[RegisterInfo]) -> [u8; SLOT_COUNT] {
    assert!(table.len() < NO_DESCRIPTOR as usize);
    let mut index = [NO_DESCRIPTOR; SLOT_COUNT];
    let mut i = 0;
    while i < table.len() {
        let slot = (table[i].address >> 1) as usize;
        assert!(index[slot] == NO_DESCRIPTOR, "duplicate register descriptor");
        index[slot] = i as u8;
        i += 1;
    }
    index
}

static SLOT_INDEX: [u8; SLOT_COUNT] = build_slot_index(REGISTERS);

/// Descriptor for the register at `address`, if the slot has one.
///
/// Addresses outside the I/O window have no descriptor.
pub fn describe(address: u32) -> Option<&'static RegisterInfo> {
    if address as usize >= io::SIZE {
        return None;
    }
    match SLOT_INDEX[RegisterFile::slot_index(address)] {
        NO_DESCRIPTOR => None,
        i => Some(&REGISTERS[i as usize]),
    }
}

/// Diagnostic name for the register at `address`
pub fn register_name(address: u32) -> Option<&'static str> {
    describe(address).and_then(|info| info.name)
}

pub fn is_valid(address: u32) -> bool {
    describe(address).is_some_and(|info| info.valid)
}

pub fn is_raw_on_save(address: u32) -> bool {
    describe(address).is_some_and(|info| info.raw_on_save)
}

pub fn is_raw_on_load(address: u32) -> bool {
    describe(address).is_some_and(|info| info.raw_on_load)
}

/// Whether reading `address` leaves a pending idle-skip alone
pub fn is_read_constant(address: u32) -> bool {
    describe(address).is_some_and(|info| info.read_constant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::mmio::{dma::registers::*, irq::registers::*, sound::registers::*};
    use gba_hw::mmio::{timer::registers::*, video::registers::*};

    fn valid_count(range: std::ops::Range<u32>) -> usize {
        range.step_by(2).filter(|&a| is_valid(a)).count()
    }

    #[test]
    fn power_on_defaults() {
        let regs = RegisterFile::power_on();
        assert_eq!(regs.get(DISPCNT), 0x0080);
        assert_eq!(regs.get(keypad::registers::KEYINPUT), 0x03FF);
        assert_eq!(regs.get(SOUNDBIAS), 0x0200);
        assert_eq!(regs.get(serial::registers::RCNT), 0x8000);
        for reg in [BG2PA, BG2PD, BG3PA, BG3PD] {
            assert_eq!(regs.get(reg), 0x0100);
        }
        assert_eq!(regs.get(BG2PB), 0);
    }

    #[test]
    fn slot_addressing_wraps_at_window() {
        let mut regs = RegisterFile::new();
        regs.set(0x400 + IE, 0x1234);
        assert_eq!(regs.get(IE), 0x1234);
        assert_eq!(RegisterFile::slot_index(0x3FF), SLOT_COUNT - 1);
    }

    #[test]
    fn wide_accessors_split_halves() {
        let mut regs = RegisterFile::new();
        regs.set32(DMA1SAD_LO, 0x0800_1234);
        assert_eq!(regs.get(DMA1SAD_LO), 0x1234);
        assert_eq!(regs.get(DMA1SAD_HI), 0x0800);
        assert_eq!(regs.get32(DMA1SAD_LO), 0x0800_1234);
    }

    #[test]
    fn valid_registers_per_block() {
        assert_eq!(valid_count(0x000..0x060), 41);
        assert_eq!(valid_count(0x060..0x0B0), 26);
        assert_eq!(valid_count(0x0B0..0x100), 24);
        assert_eq!(valid_count(0x100..0x120), 8);
        assert_eq!(valid_count(0x120..0x200), 12);
        assert_eq!(valid_count(0x200..0x20A), 4);
        assert!(!is_valid(GREENSWP));
        assert!(!is_valid(gba_hw::mmio::serial::registers::SIOMLT_SEND));
    }

    #[test]
    fn save_and_load_policies_differ() {
        // Copied raw on save, but replayed on load to rebuild engine state
        assert!(is_raw_on_save(DMA0SAD_LO) && !is_raw_on_load(DMA0SAD_LO));
        assert!(is_raw_on_save(BG2X_LO) && !is_raw_on_load(BG2X_LO));
        // Read through the read path, but loaded raw
        assert!(!is_raw_on_save(IF) && is_raw_on_load(IF));
        assert!(!is_raw_on_save(SOUNDCNT_X) && is_raw_on_load(SOUNDCNT_X));
        // Both
        assert!(is_raw_on_save(DMA2CNT_HI) && is_raw_on_load(DMA2CNT_HI));
        assert!(is_raw_on_save(TM3CNT_LO) && is_raw_on_load(TM3CNT_LO));
        // Neither
        assert!(!is_raw_on_save(DISPCNT) && !is_raw_on_load(DISPCNT));
        assert!(!is_raw_on_save(system::registers::WAITCNT));
        assert!(!is_raw_on_load(system::registers::WAITCNT));
    }

    #[test]
    fn names_are_sparse() {
        assert_eq!(register_name(DISPCNT), Some("DISPCNT"));
        assert_eq!(register_name(TM2CNT_HI), Some("TM2CNT_HI"));
        assert_eq!(register_name(0x066), None);
        assert_eq!(register_name(system::registers::REG_MAX), None);
        assert_eq!(register_name(0x800), None);
    }

    #[test]
    fn descriptors_sit_at_their_own_slot() {
        for info in REGISTERS {
            assert_eq!(info.address & 1, 0);
            assert_eq!(describe(info.address), Some(info));
        }
    }

    #[test]
    fn idle_skip_whitelist() {
        for reg in [BG0CNT, WININ, BLDALPHA, SOUND1CNT_LO, SOUNDCNT_HI, TM1CNT_HI, IE] {
            assert!(is_read_constant(reg), "{:#X}", reg);
        }
        for reg in [DISPCNT, DISPSTAT, VCOUNT, SOUNDCNT_X, TM1CNT_LO, IF, IME] {
            assert!(!is_read_constant(reg), "{:#X}", reg);
        }
    }
}
