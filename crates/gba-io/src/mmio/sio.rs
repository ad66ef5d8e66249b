//! Serial I/O control.
//!
//! SIOCNT and RCNT have live values held by the serial unit: RCNT's low bits
//! follow the link port pins, and a transfer in progress updates SIOCNT. Reads
//! of those two registers come from here rather than from storage.

use crate::registers::RegisterFile;
use gba_hw::mmio::serial::{self as hw_sio, rcnt, registers as hw_regs, siocnt};
use std::fmt;
use tracing::debug;

/// Link port operating mode, from RCNT bits 14-15 and SIOCNT bits 12-13
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SioMode {
    #[default]
    Normal8,
    Normal32,
    Multiplayer,
    Uart,
    Gpio,
    JoyBus,
}

impl SioMode {
    pub fn from_registers(rcnt_value: u16, siocnt_value: u16) -> Self {
        let rcnt_mode = (rcnt_value & rcnt::MODE_MASK) >> rcnt::MODE_SHIFT;
        let sio_mode = (siocnt_value & siocnt::MODE_MASK) >> siocnt::MODE_SHIFT;
        match (rcnt_mode, sio_mode) {
            (0 | 1, 0) => SioMode::Normal8,
            (0 | 1, 1) => SioMode::Normal32,
            (0 | 1, 2) => SioMode::Multiplayer,
            (0 | 1, _) => SioMode::Uart,
            (2, _) => SioMode::Gpio,
            _ => SioMode::JoyBus,
        }
    }
}

/// Hook contract of the serial unit
pub trait SerialPort: fmt::Debug + Send {
    fn write_siocnt(&mut self, value: u16);
    /// RCNT write, already masked to the writable bits. Returns the value the
    /// unit holds afterwards, which is what storage keeps.
    fn write_rcnt(&mut self, value: u16) -> u16;
    fn write_multiplayer_send(&mut self, value: u16);

    fn siocnt(&self) -> u16;
    fn rcnt(&self) -> u16;

    /// Rebuild the live mirrors from restored register storage
    fn sync_from_registers(&mut self, regs: &RegisterFile);

    /// Power-on state is fully described by the power-on registers
    fn reset(&mut self, regs: &RegisterFile) {
        self.sync_from_registers(regs);
    }
}

/// Serial unit with no link cable attached
#[derive(Debug, Clone)]
pub struct Sio {
    siocnt: u16,
    rcnt: u16,
    multiplayer_send: u16,
    pub mode: SioMode,
}

impl Sio {
    pub fn new() -> Self {
        Self {
            siocnt: 0,
            rcnt: hw_sio::RCNT_INITIAL,
            multiplayer_send: 0,
            mode: SioMode::from_registers(hw_sio::RCNT_INITIAL, 0),
        }
    }

    pub fn multiplayer_send(&self) -> u16 {
        self.multiplayer_send
    }

    fn switch_mode(&mut self) {
        let mode = SioMode::from_registers(self.rcnt, self.siocnt);
        if mode != self.mode {
            debug!("SIO mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

impl Default for Sio {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialPort for Sio {
    fn write_siocnt(&mut self, value: u16) {
        self.siocnt = value;
        self.switch_mode();
        if value & siocnt::START != 0 {
            debug!("Stub: SIO transfer started in {:?} mode with no link", self.mode);
        }
    }

    fn write_rcnt(&mut self, value: u16) -> u16 {
        self.rcnt = (self.rcnt & hw_sio::RCNT_PIN_STATE) | (value & !hw_sio::RCNT_PIN_STATE);
        self.switch_mode();
        self.rcnt
    }

    fn write_multiplayer_send(&mut self, value: u16) {
        self.multiplayer_send = value;
    }

    fn siocnt(&self) -> u16 {
        self.siocnt
    }

    fn rcnt(&self) -> u16 {
        self.rcnt
    }

    fn sync_from_registers(&mut self, regs: &RegisterFile) {
        self.siocnt = regs.get(hw_regs::SIOCNT);
        self.rcnt = regs.get(hw_regs::RCNT);
        self.multiplayer_send = regs.get(hw_regs::SIOMLT_SEND);
        self.switch_mode();
    }
}
