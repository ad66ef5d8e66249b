//! Video register handling.
//!
//! The renderer receives every write below the sound block except DISPSTAT
//! and decides what gets stored. DISPSTAT goes through a dedicated writer
//! because its low bits are status maintained by the video unit.
//!
//! # References
//! - [LCD I/O Display Control](https://problemkaputt.de/gbatek.htm#lcdiodisplaycontrol)
//! - [LCD I/O BG Rotation/Scaling](https://problemkaputt.de/gbatek.htm#lcdiobgrotationscaling)

use crate::registers::RegisterFile;
use gba_hw::mmio::video::{dispcnt, dispstat, registers as hw_regs};
use gba_hw::specs::display;
use std::fmt;
use tracing::{debug, trace};

/// Hook contract of the video unit
pub trait VideoPort: fmt::Debug + Send {
    /// Generic register write. The returned value is what the bus stores.
    fn write_register(&mut self, regs: &RegisterFile, address: u32, value: u16) -> u16;

    /// DISPSTAT write with the read-only status bits already cleared. The
    /// writer persists the new value into `regs` itself.
    fn write_dispstat(&mut self, regs: &mut RegisterFile, value: u16);

    /// Move the beam to `line`, updating VCOUNT and the DISPSTAT status bits.
    ///
    /// Returns true when the V-counter interrupt should be requested.
    fn enter_scanline(&mut self, regs: &mut RegisterFile, line: u16) -> bool;

    fn reset(&mut self);
}

/// Rotation/scaling parameters of BG2 or BG3
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffineParams {
    pub pa: i16,
    pub pb: i16,
    pub pc: i16,
    pub pd: i16,
    /// Reference point, 20.8 fixed point sign-extended from 28 bits
    pub x: i32,
    pub y: i32,
}

/// Register-level video adapter: latches what a renderer would consume
#[derive(Debug, Clone, Default)]
pub struct VideoRegisters {
    pub dispcnt: u16,
    pub bgcnt: [u16; 4],
    pub bg_offset: [(u16, u16); 4],
    /// Parameters for BG2 and BG3
    pub affine: [AffineParams; 2],
    pub win_h: [u16; 2],
    pub win_v: [u16; 2],
    pub winin: u16,
    pub winout: u16,
    pub mosaic: u16,
    pub bldcnt: u16,
    pub bldalpha: u16,
    pub bldy: u16,
}

fn sign_extend_28(value: u32) -> i32 {
    ((value << 4) as i32) >> 4
}

impl VideoRegisters {
    pub fn new() -> Self {
        let identity = AffineParams {
            pa: gba_hw::mmio::video::AFFINE_IDENTITY as i16,
            pd: gba_hw::mmio::video::AFFINE_IDENTITY as i16,
            ..AffineParams::default()
        };
        Self {
            dispcnt: dispcnt::FORCED_BLANK,
            affine: [identity; 2],
            ..Self::default()
        }
    }

    fn affine_mut(&mut self, address: u32) -> &mut AffineParams {
        if address < hw_regs::BG3PA {
            &mut self.affine[0]
        } else {
            &mut self.affine[1]
        }
    }

    /// Combine a reference point half with the stored other half
    fn write_reference(&mut self, regs: &RegisterFile, address: u32, value: u16) -> u16 {
        let high = address & 2 != 0;
        let (value, combined) = if high {
            let value = value & 0x0FFF;
            (value, (value as u32) << 16 | regs.get(address - 2) as u32)
        } else {
            (value, (regs.get(address + 2) as u32) << 16 | value as u32)
        };
        let point = sign_extend_28(combined);
        let params = self.affine_mut(address);
        if address & 4 == 0 {
            params.x = point;
        } else {
            params.y = point;
        }
        value
    }
}

impl VideoPort for VideoRegisters {
    fn write_register(&mut self, regs: &RegisterFile, address: u32, value: u16) -> u16 {
        use hw_regs::*;

        match address {
            DISPCNT => {
                self.dispcnt = value & !dispcnt::CGB_MODE;
                debug!("DISPCNT: {:#06X}", self.dispcnt);
                self.dispcnt
            }
            VCOUNT => regs.get(VCOUNT),
            BG0CNT | BG1CNT => {
                let value = value & 0xDFFF;
                self.bgcnt[((address - BG0CNT) >> 1) as usize] = value;
                value
            }
            BG2CNT | BG3CNT => {
                self.bgcnt[((address - BG0CNT) >> 1) as usize] = value;
                value
            }
            BG0HOFS..=BG3VOFS => {
                let value = value & 0x01FF;
                let bg = ((address - BG0HOFS) >> 2) as usize;
                if address & 2 == 0 {
                    self.bg_offset[bg].0 = value;
                } else {
                    self.bg_offset[bg].1 = value;
                }
                value
            }
            BG2PA | BG3PA => {
                self.affine_mut(address).pa = value as i16;
                value
            }
            BG2PB | BG3PB => {
                self.affine_mut(address).pb = value as i16;
                value
            }
            BG2PC | BG3PC => {
                self.affine_mut(address).pc = value as i16;
                value
            }
            BG2PD | BG3PD => {
                self.affine_mut(address).pd = value as i16;
                value
            }
            BG2X_LO..=BG2Y_HI | BG3X_LO..=BG3Y_HI => self.write_reference(regs, address, value),
            WIN0H | WIN1H => {
                self.win_h[((address - WIN0H) >> 1) as usize] = value;
                value
            }
            WIN0V | WIN1V => {
                self.win_v[((address - WIN0V) >> 1) as usize] = value;
                value
            }
            WININ => {
                self.winin = value & 0x3F3F;
                self.winin
            }
            WINOUT => {
                self.winout = value & 0x3F3F;
                self.winout
            }
            MOSAIC => {
                self.mosaic = value;
                value
            }
            BLDCNT => {
                self.bldcnt = value & 0x3FFF;
                self.bldcnt
            }
            BLDALPHA => {
                self.bldalpha = value & 0x1F1F;
                self.bldalpha
            }
            BLDY => {
                self.bldy = value & 0x001F;
                self.bldy
            }
            _ => {
                debug!(
                    "Stub video register write: offset={:#05X}, value={:#06X}",
                    address, value
                );
                value
            }
        }
    }

    fn write_dispstat(&mut self, regs: &mut RegisterFile, value: u16) {
        let status = regs.get(hw_regs::DISPSTAT) & dispstat::READ_ONLY;
        regs.set(hw_regs::DISPSTAT, status | (value & !dispstat::READ_ONLY));
        debug!(
            "DISPSTAT: {:#06X} (V-count setting {})",
            regs.get(hw_regs::DISPSTAT),
            value >> dispstat::VCOUNT_SETTING_SHIFT
        );
    }

    fn enter_scanline(&mut self, regs: &mut RegisterFile, line: u16) -> bool {
        let mut status = regs.get(hw_regs::DISPSTAT) & !dispstat::READ_ONLY;
        let in_vblank = (display::HEIGHT as u16..display::TOTAL_LINES as u16 - 1).contains(&line);
        if in_vblank {
            status |= dispstat::IN_VBLANK;
        }
        let matched = line == status >> dispstat::VCOUNT_SETTING_SHIFT;
        if matched {
            status |= dispstat::VCOUNTER_MATCH;
        }
        regs.set(hw_regs::VCOUNT, line);
        regs.set(hw_regs::DISPSTAT, status);
        trace!("Scanline {} (DISPSTAT={:#06X})", line, status);
        matched && status & dispstat::VCOUNTER_IRQ != 0
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::mmio::video::registers::*;

    #[test]
    fn dispcnt_drops_cgb_bit() {
        let mut video = VideoRegisters::new();
        let regs = RegisterFile::new();
        assert_eq!(video.write_register(&regs, DISPCNT, 0xFFFF), 0xFFF7);
        assert_eq!(video.dispcnt, 0xFFF7);
    }

    #[test]
    fn vcount_is_read_only() {
        let mut video = VideoRegisters::new();
        let mut regs = RegisterFile::new();
        regs.set(VCOUNT, 42);
        assert_eq!(video.write_register(&regs, VCOUNT, 7), 42);
    }

    #[test]
    fn scroll_offsets_are_nine_bits() {
        let mut video = VideoRegisters::new();
        let regs = RegisterFile::new();
        assert_eq!(video.write_register(&regs, BG1VOFS, 0xFFFF), 0x01FF);
        assert_eq!(video.bg_offset[1], (0, 0x01FF));
    }

    #[test]
    fn reference_point_sign_extends() {
        let mut video = VideoRegisters::new();
        let mut regs = RegisterFile::new();
        let low = video.write_register(&regs, BG3Y_LO, 0x0000);
        regs.set(BG3Y_LO, low);
        let high = video.write_register(&regs, BG3Y_HI, 0xFFFF);
        assert_eq!(high, 0x0FFF);
        assert_eq!(video.affine[1].y, -0x10000);
        assert_eq!(video.affine[1].x, 0);
    }

    #[test]
    fn dispstat_keeps_status_bits() {
        let mut video = VideoRegisters::new();
        let mut regs = RegisterFile::new();
        regs.set(DISPSTAT, dispstat::IN_VBLANK);
        video.write_dispstat(&mut regs, 0x2A38);
        assert_eq!(regs.get(DISPSTAT), 0x2A39);
    }

    #[test]
    fn scanline_match_requests_irq() {
        let mut video = VideoRegisters::new();
        let mut regs = RegisterFile::new();
        video.write_dispstat(&mut regs, (100 << 8) | dispstat::VCOUNTER_IRQ);
        assert!(!video.enter_scanline(&mut regs, 99));
        assert!(video.enter_scanline(&mut regs, 100));
        assert_eq!(regs.get(VCOUNT), 100);
        assert_ne!(regs.get(DISPSTAT) & dispstat::VCOUNTER_MATCH, 0);
        video.enter_scanline(&mut regs, 160);
        assert_ne!(regs.get(DISPSTAT) & dispstat::IN_VBLANK, 0);
    }
}
