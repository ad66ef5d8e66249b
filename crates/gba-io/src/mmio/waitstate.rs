//! Memory access timing programmed through WAITCNT.
//!
//! # References
//! - [System Control](https://problemkaputt.de/gbatek.htm#gbasystemcontrol)

use gba_hw::memory_map::cart;
use gba_hw::mmio::system::{ROM_WAITSTATES, ROM_WAITSTATES_SEQ, waitcnt};
use std::fmt;
use tracing::debug;

/// Hook contract of the memory timing tables
pub trait WaitstatePort: fmt::Debug + Send {
    fn adjust_waitstates(&mut self, value: u16);

    /// Power-on timing, as if WAITCNT were written with zero
    fn reset(&mut self) {
        self.adjust_waitstates(0);
    }
}

/// Number of 16 MiB regions in the address space
const REGIONS: usize = 16;

// Fixed costs of the internal regions, indexed by address bits 24-27
const BASE_NONSEQ16: [u32; REGIONS] = [0, 0, 2, 0, 0, 0, 0, 0, 4, 4, 4, 4, 4, 4, 4, 0];
const BASE_NONSEQ32: [u32; REGIONS] = [0, 0, 5, 0, 0, 1, 1, 0, 7, 7, 9, 9, 13, 13, 9, 0];
const BASE_SEQ16: [u32; REGIONS] = [0, 0, 2, 0, 0, 0, 0, 0, 2, 2, 4, 4, 8, 8, 4, 0];
const BASE_SEQ32: [u32; REGIONS] = [0, 0, 5, 0, 0, 1, 1, 0, 5, 5, 9, 9, 17, 17, 9, 0];

const fn region(base: u32) -> usize {
    (base >> 24) as usize & (REGIONS - 1)
}

/// ROM regions with their two mirrors
const ROM_REGIONS: [usize; 3] = [
    region(cart::WS0_BASE),
    region(cart::WS1_BASE),
    region(cart::WS2_BASE),
];

/// Extra wait cycles per region for each access kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waitstates {
    pub nonseq16: [u32; REGIONS],
    pub seq16: [u32; REGIONS],
    pub nonseq32: [u32; REGIONS],
    pub seq32: [u32; REGIONS],
    pub prefetch: bool,
}

impl Waitstates {
    pub fn new() -> Self {
        let mut tables = Self {
            nonseq16: BASE_NONSEQ16,
            seq16: BASE_SEQ16,
            nonseq32: BASE_NONSEQ32,
            seq32: BASE_SEQ32,
            prefetch: false,
        };
        tables.adjust_waitstates(0);
        tables
    }

    /// Wait cycles for one access at `address`
    pub fn wait(&self, address: u32, sequential: bool, word: bool) -> u32 {
        let region = (address >> 24) as usize & (REGIONS - 1);
        match (sequential, word) {
            (false, false) => self.nonseq16[region],
            (true, false) => self.seq16[region],
            (false, true) => self.nonseq32[region],
            (true, true) => self.seq32[region],
        }
    }
}

impl Default for Waitstates {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitstatePort for Waitstates {
    fn adjust_waitstates(&mut self, value: u16) {
        let sram = ROM_WAITSTATES[(value & waitcnt::SRAM_MASK) as usize];
        for r in [region(cart::SRAM_BASE), region(cart::SRAM_MIRROR_BASE)] {
            self.nonseq16[r] = sram;
            self.seq16[r] = sram;
            self.nonseq32[r] = 2 * sram + 1;
            self.seq32[r] = 2 * sram + 1;
        }

        let nonseq_fields = [
            (value & waitcnt::WS0_NONSEQ_MASK) >> 2,
            (value & waitcnt::WS1_NONSEQ_MASK) >> 5,
            (value & waitcnt::WS2_NONSEQ_MASK) >> 8,
        ];
        let seq_bits = [
            value & waitcnt::WS0_SEQ != 0,
            value & waitcnt::WS1_SEQ != 0,
            value & waitcnt::WS2_SEQ != 0,
        ];

        for (ws, &base) in ROM_REGIONS.iter().enumerate() {
            let nonseq = ROM_WAITSTATES[nonseq_fields[ws] as usize];
            let seq = ROM_WAITSTATES_SEQ[ws * 2 + seq_bits[ws] as usize];
            for r in [base, base + 1] {
                self.nonseq16[r] = nonseq;
                self.seq16[r] = seq;
                self.nonseq32[r] = nonseq + 1 + seq;
                self.seq32[r] = 2 * seq + 1;
            }
        }

        self.prefetch = value & waitcnt::PREFETCH != 0;
        debug!(
            "WAITCNT {:#06X}: ROM nonseq {:?}, prefetch={}",
            value,
            ROM_REGIONS.map(|r| self.nonseq16[r]),
            self.prefetch
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_tables() {
        let ws = Waitstates::new();
        assert_eq!(ws.wait(cart::WS0_BASE, false, false), 4);
        assert_eq!(ws.wait(cart::WS0_BASE, true, false), 2);
        assert_eq!(ws.wait(cart::WS2_BASE + 0x0100_0000, true, false), 8);
        assert_eq!(ws.wait(cart::SRAM_BASE, false, false), 4);
        assert_eq!(ws.wait(0x0200_0000, false, true), 5);
        assert!(!ws.prefetch);
    }

    #[test]
    fn common_rom_setting() {
        // 3/1 for WS0 with prefetch, the value most games program
        let mut ws = Waitstates::new();
        ws.adjust_waitstates(0x4317);
        assert_eq!(ws.nonseq16[8], 3);
        assert_eq!(ws.seq16[8], 1);
        assert_eq!(ws.nonseq32[9], 3 + 1 + 1);
        assert_eq!(ws.seq32[9], 3);
        assert_eq!(ws.nonseq16[0xE], 8);
        assert_eq!(ws.nonseq32[0xF], 17);
        assert!(ws.prefetch);
    }
}
