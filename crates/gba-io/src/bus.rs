//! The I/O register bus.
//!
//! Every processor or DMA access to the I/O window ends up in [`IoBus`]. The
//! 16-bit paths are the canonical ones; 8- and 32-bit accesses are expressed
//! in terms of them, except for HALTCNT (byte-only) and the composite
//! registers, which take a single 32-bit hook call.
//!
//! Register semantics come from the descriptor table in
//! [`registers`](crate::registers): the write kind selects the peripheral hook
//! and what gets committed to storage, the read kind selects where the
//! returned value comes from.

use crate::config::{BusConfig, SoundWritePolicy};
use crate::cpu::CpuControl;
use crate::mmio::Peripherals;
use crate::registers::{self, ReadKind, RegisterFile, WideTarget, WriteKind};
use gba_hw::mmio::irq::sources;
use gba_hw::mmio::serial::RCNT_WRITE_MASK;
use gba_hw::mmio::sound::{registers::SOUNDCNT_X, soundcnt_x};
use gba_hw::mmio::system::{HALTCNT_STOP, registers as sys_regs};
use gba_hw::mmio::video::{dispstat, registers as video_regs};
use gba_hw::mmio::{sound, timer};
use tracing::{debug, instrument, trace, warn};

/// Diagnostic label for an offset
fn label(address: u32) -> &'static str {
    registers::register_name(address).unwrap_or("?")
}

/// Register storage plus the peripherals it dispatches to
#[derive(Debug)]
pub struct IoBus {
    pub(crate) regs: RegisterFile,
    pub cpu: CpuControl,
    pub peripherals: Peripherals,
    config: BusConfig,
}

impl IoBus {
    /// Bus with the default register-level adapters
    pub fn new(config: BusConfig) -> Self {
        Self::with_peripherals(config, Peripherals::default())
    }

    pub fn with_peripherals(config: BusConfig, peripherals: Peripherals) -> Self {
        Self {
            regs: RegisterFile::power_on(),
            cpu: CpuControl::new(config.initial_open_bus),
            peripherals,
            config,
        }
    }

    /// Restore power-on register values and put every register-level
    /// peripheral back in step with them. Key input and cartridge hardware
    /// are left alone.
    pub fn reset(&mut self) {
        debug!("I/O reset");
        self.regs = RegisterFile::power_on();
        self.cpu = CpuControl::new(self.config.initial_open_bus);

        let p = &mut self.peripherals;
        p.video.reset();
        p.audio.reset();
        p.dma.reset();
        p.timers.reset();
        p.irq.reset();
        p.waitstates.reset();
        p.sio.reset(&self.regs);
    }

    /// Flag `mask` in IF on behalf of a peripheral
    pub fn request_interrupt(&mut self, mask: u16) {
        self.peripherals.irq.request(&mut self.regs, mask);
    }

    /// Move the video unit to `line`, requesting the V-counter interrupt on a
    /// match
    pub fn enter_scanline(&mut self, line: u16) {
        if self.peripherals.video.enter_scanline(&mut self.regs, line) {
            self.request_interrupt(sources::VCOUNTER);
        }
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Raw storage, for peripherals that publish status (VCOUNT, IF, ...)
    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn sound_enabled(&self) -> bool {
        self.regs.get(SOUNDCNT_X) & soundcnt_x::MASTER_ENABLE != 0
    }

    /// Canonical 16-bit write
    #[instrument(level = "trace", skip(self))]
    pub fn write16(&mut self, address: u32, value: u16) {
        let address = address & !1;
        trace!(
            "I/O write16: offset={:#05X} ({}), value={:#06X}",
            address,
            label(address),
            value
        );

        let kind = if address < sound::registers::SOUND1CNT_LO && address != video_regs::DISPSTAT
        {
            WriteKind::Video
        } else {
            registers::describe(address).map_or(WriteKind::Stub, |info| info.write)
        };

        let cycles = self.cpu.cycles;
        let p = &mut self.peripherals;
        let value = match kind {
            WriteKind::Video => p.video.write_register(&self.regs, address, value),
            WriteKind::DisplayStatus => {
                p.video
                    .write_dispstat(&mut self.regs, value & !dispstat::READ_ONLY);
                return;
            }
            WriteKind::Sound { mask, gated } => {
                if gated
                    && self.config.sound_writes == SoundWritePolicy::IgnoreWhileDisabled
                    && self.regs.get(SOUNDCNT_X) & soundcnt_x::MASTER_ENABLE == 0
                {
                    debug!("Dropping {} write while sound is off", label(address));
                    return;
                }
                p.audio.write_register(address, value);
                value & mask
            }
            WriteKind::SoundMasterEnable => {
                p.audio.write_register(address, value);
                (value & soundcnt_x::MASTER_ENABLE)
                    | (self.regs.get(address) & soundcnt_x::CHANNEL_ACTIVE)
            }
            WriteKind::Composite(_) => {
                let high = self.regs.get(address + 2) as u32;
                self.write32(address, high << 16 | value as u32);
                return;
            }
            WriteKind::CompositeHigh => {
                let low = address - 2;
                let low_half = self.regs.get(low) as u32;
                self.write32(low, (value as u32) << 16 | low_half);
                return;
            }
            WriteKind::DmaCount(channel) => {
                p.dma.write_count(channel, value);
                value
            }
            WriteKind::DmaControl(channel) => p.dma.write_control(channel, value, cycles),
            WriteKind::TimerReload(index) => {
                p.timers.write_reload(index, value);
                return;
            }
            WriteKind::TimerControl(index) => {
                let value = value & timer::control::WRITE_MASK;
                p.timers.write_control(&mut self.regs, index, value, cycles);
                value
            }
            WriteKind::SerialControl => {
                p.sio.write_siocnt(value);
                value
            }
            WriteKind::SerialRcnt => p.sio.write_rcnt(value & RCNT_WRITE_MASK),
            WriteKind::SerialMultiSend => {
                p.sio.write_multiplayer_send(value);
                value
            }
            WriteKind::Waitstates => {
                p.waitstates.adjust_waitstates(value);
                value
            }
            WriteKind::InterruptEnable => {
                p.irq.write_ie(&self.regs, value);
                value
            }
            WriteKind::InterruptAcknowledge => self.regs.get(address) & !value,
            WriteKind::InterruptMasterEnable => {
                p.irq.write_ime(&self.regs, value);
                value
            }
            // Some interrupt libraries write past the register file
            WriteKind::Tolerated => value,
            WriteKind::Stub => {
                debug!("Stub I/O register write: {:#05X}", address);
                if address >= sys_regs::REG_MAX {
                    warn!("Write to unused I/O register: {:#05X}", address);
                    return;
                }
                value
            }
        };
        self.regs.set(address, value);
    }

    /// Canonical 16-bit read
    #[instrument(level = "trace", skip(self))]
    pub fn read16(&mut self, address: u32) -> u16 {
        let address = address & !1;
        let info = registers::describe(address);
        if !info.is_some_and(|info| info.read_constant) {
            // Polling hardware state defeats idle loop detection
            self.cpu.halt_pending = false;
        }

        let value = match info.map_or(ReadKind::Unused, |info| info.read) {
            ReadKind::Transparent => self.regs.get(address),
            ReadKind::SoundGated { readable } => {
                if !self.sound_enabled() {
                    0
                } else if self.config.hide_write_only_sound_bits {
                    self.regs.get(address) & readable
                } else {
                    self.regs.get(address)
                }
            }
            ReadKind::TimerCounter(index) => {
                self.peripherals
                    .timers
                    .update_register(&mut self.regs, index, self.cpu.cycles);
                self.regs.get(address)
            }
            ReadKind::KeyInput => self.peripherals.keys.read(),
            ReadKind::SerialControl => self.peripherals.sio.siocnt(),
            ReadKind::SerialRcnt => self.peripherals.sio.rcnt(),
            ReadKind::Stub => {
                debug!("Stub I/O register read: {:#05X}", address);
                self.regs.get(address)
            }
            ReadKind::WriteOnly => {
                warn!(
                    "Read from write-only I/O register: {:#05X} ({})",
                    address,
                    label(address)
                );
                self.cpu.load_bad()
            }
            ReadKind::Unused => {
                warn!("Read from unused I/O register: {:#05X}", address);
                self.cpu.load_bad()
            }
        };
        trace!(
            "I/O read16: offset={:#05X} ({}), value={:#06X}",
            address,
            label(address),
            value
        );
        value
    }

    /// Byte write. HALTCNT is only reachable this way; other offsets merge
    /// into the stored half-word and take the 16-bit path.
    #[instrument(level = "trace", skip(self))]
    pub fn write8(&mut self, address: u32, value: u8) {
        if address == sys_regs::HALTCNT {
            if value & HALTCNT_STOP != 0 {
                self.cpu.stop();
            } else {
                self.cpu.halt();
            }
            return;
        }
        let shift = 8 * (address & 1);
        let merged = (value as u16) << shift | (self.regs.get(address) & !(0xFF << shift));
        self.write16(address & !1, merged);
    }

    /// Word write. Composite registers see the whole value in one hook call.
    #[instrument(level = "trace", skip(self))]
    pub fn write32(&mut self, address: u32, value: u32) {
        let address = address & !3;
        let target = match registers::describe(address).map(|info| info.write) {
            Some(WriteKind::Composite(target)) => target,
            _ => {
                self.write16(address, value as u16);
                self.write16(address | 2, (value >> 16) as u16);
                return;
            }
        };

        trace!(
            "I/O write32: offset={:#05X} ({}), value={:#010X}",
            address,
            label(address),
            value
        );
        let p = &mut self.peripherals;
        let stored = match target {
            WideTarget::WaveRam(bank) => {
                p.audio.write_wave_ram(bank, value);
                value
            }
            WideTarget::Fifo(fifo) => {
                p.audio.write_fifo(fifo, value);
                value
            }
            WideTarget::DmaSource(channel) => p.dma.write_source(channel, value),
            WideTarget::DmaDest(channel) => p.dma.write_dest(channel, value),
        };
        self.regs.set32(address, stored);
    }

    /// Byte lane of the containing half-word
    pub fn read8(&mut self, address: u32) -> u8 {
        (self.read16(address & !1) >> (8 * (address & 1))) as u8
    }

    pub fn read32(&mut self, address: u32) -> u32 {
        let address = address & !3;
        self.read16(address) as u32 | (self.read16(address | 2) as u32) << 16
    }
}

impl Default for IoBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::mmio::dma::registers::*;
    use gba_hw::mmio::irq::registers::*;
    use gba_hw::mmio::sound::registers::*;
    use gba_hw::mmio::timer::registers::*;
    use gba_hw::mmio::video::registers::*;

    const OPEN_BUS: u32 = 0xE3A0_0001;

    fn bus() -> IoBus {
        IoBus::new(BusConfig {
            initial_open_bus: OPEN_BUS,
            ..BusConfig::default()
        })
    }

    #[test]
    fn dispcnt_write_goes_through_video() {
        let mut bus = bus();
        bus.write16(DISPCNT, 0x1F4B);
        assert_eq!(bus.read16(DISPCNT), 0x1F43);
    }

    #[test]
    fn dispstat_low_bits_are_status() {
        let mut bus = bus();
        bus.registers_mut().set(DISPSTAT, dispstat::IN_HBLANK);
        bus.write16(DISPSTAT, 0xFFFF);
        assert_eq!(bus.read16(DISPSTAT), 0xFFFA);
    }

    #[test]
    fn interrupt_flags_clear_on_write() {
        let mut bus = bus();
        bus.registers_mut().set(IF, 0x0005);
        bus.write16(IF, 0x0001);
        assert_eq!(bus.read16(IF), 0x0004);
    }

    #[test]
    fn sound_master_enable_keeps_channel_flags() {
        let mut bus = bus();
        bus.registers_mut().set(SOUNDCNT_X, 0x0003);
        bus.write16(SOUNDCNT_X, 0xFFFF);
        assert_eq!(bus.read16(SOUNDCNT_X), 0x0083);
    }

    #[test]
    fn timer_reload_is_not_committed() {
        let mut bus = bus();
        bus.write16(TM0CNT_LO, 0xBEEF);
        assert_eq!(bus.registers().get(TM0CNT_LO), 0);
        assert_eq!(bus.peripherals.timers.timer(0).reload, 0xBEEF);
    }

    #[test]
    fn write_only_reads_open_bus() {
        let mut bus = bus();
        bus.write16(BG0HOFS, 0x0123);
        assert_eq!(bus.registers().get(BG0HOFS), 0x0123);
        assert_eq!(bus.read16(BG0HOFS), 0x0001);
        assert_eq!(bus.read16(DMA1CNT_LO), 0x0001);
        assert_eq!(bus.read16(0x0066), 0x0001);
    }

    #[test]
    fn unused_writes_are_dropped() {
        let mut bus = bus();
        bus.write16(0x20C, 0x1234);
        bus.write16(0x300, 0x0001);
        assert_eq!(bus.registers().get(0x20C), 0);
        assert_eq!(bus.registers().get(0x300), 0);

        // REG_MAX is tolerated
        bus.write16(sys_regs::REG_MAX, 0x5555);
        assert_eq!(bus.read16(sys_regs::REG_MAX), 0x5555);
    }

    #[test]
    fn dma_source_halves_combine() {
        let mut bus = bus();
        bus.write16(DMA0SAD_HI, 0x0800);
        bus.write16(DMA0SAD_LO, 0x1235);
        assert_eq!(bus.peripherals.dma.channel(0).source, 0x0800_1234);
        assert_eq!(bus.registers().get32(DMA0SAD_LO), 0x0800_1234);
    }

    #[test]
    fn halfword_and_word_composite_writes_agree() {
        let mut halves = bus();
        halves.write16(DMA2DAD_LO, 0x5679);
        halves.write16(DMA2DAD_HI, 0xF123);

        let mut word = bus();
        word.write32(DMA2DAD_LO, 0xF123_5679);

        assert_eq!(halves.registers(), word.registers());
        assert_eq!(
            halves.peripherals.dma.channel(2),
            word.peripherals.dma.channel(2)
        );
    }

    #[test]
    fn byte_write_merges_lane() {
        let mut bus = bus();
        bus.write16(IE, 0x1234);
        bus.write8(IE + 1, 0xAB);
        assert_eq!(bus.read16(IE), 0xAB34);
        bus.write8(IE, 0xCD);
        assert_eq!(bus.read16(IE), 0xABCD);
        assert_eq!(bus.read8(IE + 1), 0xAB);
    }

    #[test]
    fn haltcnt_selects_halt_or_stop() {
        use crate::cpu::PowerState;

        let mut bus = bus();
        bus.write8(sys_regs::HALTCNT, 0x00);
        assert_eq!(bus.cpu.power, PowerState::Halted);
        bus.write8(sys_regs::HALTCNT, 0x80);
        assert_eq!(bus.cpu.power, PowerState::Stopped);
        assert_eq!(bus.registers().get(sys_regs::POSTFLG), 0);
    }

    #[test]
    fn polling_cancels_idle_skip() {
        let mut bus = bus();
        bus.cpu.halt_pending = true;
        bus.read16(BG1CNT);
        assert!(bus.cpu.halt_pending);
        bus.read16(DISPSTAT);
        assert!(!bus.cpu.halt_pending);
    }

    #[test]
    fn word_read_combines_halves() {
        let mut bus = bus();
        bus.write32(BG0CNT, 0x1F05_1F04);
        assert_eq!(bus.read16(BG1CNT), 0x1F05);
        assert_eq!(bus.read32(BG0CNT), 0x1F05_1F04);

        // IE and IF share a word; the high half acknowledges
        bus.registers_mut().set(IF, 0x0003);
        bus.write32(IE, 0x0001_2001);
        assert_eq!(bus.read32(IE), 0x0002_2001);
    }
}
