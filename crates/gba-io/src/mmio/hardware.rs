//! Cartridge-side hardware carried in snapshots as an opaque block.
//!
//! # References
//! - [GBA Cart I/O Port (GPIO)](https://problemkaputt.de/gbatek.htm#gbacartioportgpio)

use std::fmt;
use tracing::{trace, warn};

/// Extra hardware on the Game Pak (GPIO port and whatever hangs off it)
pub trait CartridgeHardware: fmt::Debug + Send {
    fn serialize(&self) -> Vec<u8>;
    fn deserialize(&mut self, data: &[u8]);
}

/// Plain ROM cartridge
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHardware;

impl CartridgeHardware for NoHardware {
    fn serialize(&self) -> Vec<u8> {
        Vec::new()
    }

    fn deserialize(&mut self, data: &[u8]) {
        if !data.is_empty() {
            warn!("Ignoring {} bytes of cartridge hardware state", data.len());
        }
    }
}

/// GPIO register offsets within ROM space
pub mod gpio_registers {
    pub const DATA: u32 = 0x0800_00C4;
    pub const DIRECTION: u32 = 0x0800_00C6;
    pub const CONTROL: u32 = 0x0800_00C8;
}

/// The four-pin GPIO port used by RTC, solar sensor and rumble carts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpioPort {
    pub pin_state: u8,
    /// Set bits are outputs
    pub direction: u8,
    /// Whether the port is readable through ROM space
    pub readable: bool,
}

impl GpioPort {
    const STATE_LEN: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, address: u32, value: u16) {
        use gpio_registers::*;
        match address {
            DATA => {
                let outputs = value as u8 & self.direction & 0xF;
                self.pin_state = (self.pin_state & !self.direction) | outputs;
            }
            DIRECTION => self.direction = value as u8 & 0xF,
            CONTROL => self.readable = value & 1 != 0,
            _ => warn!("Invalid GPIO address {:#010X}", address),
        }
        trace!("GPIO {:#010X} <- {:#06X}: {:?}", address, value, self);
    }

    /// `None` when the port is write-only and ROM contents show through
    pub fn read(&self, address: u32) -> Option<u16> {
        use gpio_registers::*;
        if !self.readable {
            return None;
        }
        match address {
            DATA => Some(self.pin_state as u16),
            DIRECTION => Some(self.direction as u16),
            CONTROL => Some(1),
            _ => None,
        }
    }
}

impl CartridgeHardware for GpioPort {
    fn serialize(&self) -> Vec<u8> {
        vec![self.pin_state, self.direction, self.readable as u8]
    }

    fn deserialize(&mut self, data: &[u8]) {
        match *data {
            [pin_state, direction, readable] => {
                self.pin_state = pin_state;
                self.direction = direction;
                self.readable = readable != 0;
            }
            _ => warn!(
                "GPIO state has {} bytes, expected {}",
                data.len(),
                Self::STATE_LEN
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::gpio_registers::*;

    #[test]
    fn data_writes_only_drive_outputs() {
        let mut gpio = GpioPort::new();
        gpio.pin_state = 0b0010;
        gpio.write(DIRECTION, 0b0101);
        gpio.write(DATA, 0b1111);
        assert_eq!(gpio.pin_state, 0b0111);
    }

    #[test]
    fn write_only_port_reads_through() {
        let mut gpio = GpioPort::new();
        assert_eq!(gpio.read(DATA), None);
        gpio.write(CONTROL, 1);
        gpio.write(DIRECTION, 0xF);
        assert_eq!(gpio.read(DIRECTION), Some(0xF));
    }

    #[test]
    fn state_round_trips() {
        let mut gpio = GpioPort::new();
        gpio.write(CONTROL, 1);
        gpio.write(DIRECTION, 0x3);
        gpio.write(DATA, 0x1);

        let mut restored = GpioPort::new();
        restored.deserialize(&gpio.serialize());
        assert_eq!(restored, gpio);

        // Malformed state leaves the port untouched
        restored.deserialize(&[1]);
        assert_eq!(restored, gpio);
    }
}
