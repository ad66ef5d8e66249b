//! Sound register hooks.
//!
//! The default adapter keeps the state a mixer would consume: the master
//! enable, the wave pattern banks and the two direct-sound FIFOs.

use gba_hw::mmio::sound::{WAVE_RAM_BANKS, registers as hw_regs, soundcnt_x};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace, warn};

/// Direct-sound FIFO selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fifo {
    A,
    B,
}

/// Hook contract of the audio unit
pub trait AudioPort: fmt::Debug + Send {
    /// Channel, mixer or master-enable register write
    fn write_register(&mut self, address: u32, value: u16);

    /// Full 32-bit write to one of the visible wave RAM banks
    fn write_wave_ram(&mut self, bank: usize, value: u32);

    /// 32-bit push into a direct-sound FIFO
    fn write_fifo(&mut self, fifo: Fifo, value: u32);

    /// Pop one sample word, as a sound DMA request would consume it
    fn pop_fifo(&mut self, fifo: Fifo) -> Option<u32>;

    fn reset(&mut self);
}

/// FIFO depth in 32-bit words
pub const FIFO_CAPACITY: usize = 8;

/// SOUND3CNT_LO bit selecting the bank being played
const WAVE_BANK_SELECT: u16 = 0x0040;

#[derive(Debug, Clone, Default)]
pub struct AudioRegisters {
    pub enabled: bool,
    pub soundbias: u16,
    sound3cnt_lo: u16,
    /// Two banks of four words; the CPU sees the one not selected for playback
    pub wave_ram: [u32; WAVE_RAM_BANKS * 2],
    fifos: [VecDeque<u32>; 2],
}

impl AudioRegisters {
    pub fn new() -> Self {
        Self {
            soundbias: gba_hw::mmio::sound::SOUNDBIAS_INITIAL,
            fifos: [
                VecDeque::with_capacity(FIFO_CAPACITY),
                VecDeque::with_capacity(FIFO_CAPACITY),
            ],
            ..Self::default()
        }
    }

    pub fn fifo(&self, fifo: Fifo) -> &VecDeque<u32> {
        &self.fifos[fifo as usize]
    }

    fn cpu_bank(&self) -> usize {
        if self.sound3cnt_lo & WAVE_BANK_SELECT != 0 {
            0
        } else {
            WAVE_RAM_BANKS
        }
    }
}

impl AudioPort for AudioRegisters {
    fn write_register(&mut self, address: u32, value: u16) {
        match address {
            hw_regs::SOUNDCNT_X => {
                let enabled = value & soundcnt_x::MASTER_ENABLE != 0;
                if enabled != self.enabled {
                    debug!("Sound circuit {}", if enabled { "enabled" } else { "disabled" });
                }
                self.enabled = enabled;
            }
            hw_regs::SOUND3CNT_LO => self.sound3cnt_lo = value,
            hw_regs::SOUNDBIAS => self.soundbias = value,
            _ => trace!("Sound register write: offset={:#05X}, value={:#06X}", address, value),
        }
    }

    fn write_wave_ram(&mut self, bank: usize, value: u32) {
        let index = self.cpu_bank() + bank % WAVE_RAM_BANKS;
        self.wave_ram[index] = value;
    }

    fn write_fifo(&mut self, fifo: Fifo, value: u32) {
        let queue = &mut self.fifos[fifo as usize];
        if queue.len() == FIFO_CAPACITY {
            warn!("FIFO {:?} overflow, clearing", fifo);
            queue.clear();
        }
        queue.push_back(value);
    }

    fn pop_fifo(&mut self, fifo: Fifo) -> Option<u32> {
        self.fifos[fifo as usize].pop_front()
    }

    fn reset(&mut self) {
        debug!("Sound reset");
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_enable_tracks_bit_seven() {
        let mut audio = AudioRegisters::new();
        audio.write_register(hw_regs::SOUNDCNT_X, 0x0080);
        assert!(audio.enabled);
        audio.write_register(hw_regs::SOUNDCNT_X, 0x000F);
        assert!(!audio.enabled);
    }

    #[test]
    fn wave_ram_targets_idle_bank() {
        let mut audio = AudioRegisters::new();
        audio.write_wave_ram(1, 0xAABBCCDD);
        assert_eq!(audio.wave_ram[WAVE_RAM_BANKS + 1], 0xAABBCCDD);

        audio.write_register(hw_regs::SOUND3CNT_LO, WAVE_BANK_SELECT);
        audio.write_wave_ram(1, 0x11223344);
        assert_eq!(audio.wave_ram[1], 0x11223344);
    }

    #[test]
    fn fifo_overflow_clears() {
        let mut audio = AudioRegisters::new();
        for word in 0..FIFO_CAPACITY as u32 {
            audio.write_fifo(Fifo::B, word);
        }
        assert_eq!(audio.fifo(Fifo::B).len(), FIFO_CAPACITY);
        audio.write_fifo(Fifo::B, 0xFF);
        assert_eq!(audio.fifo(Fifo::B).len(), 1);
        assert_eq!(audio.pop_fifo(Fifo::B), Some(0xFF));
        assert!(audio.fifo(Fifo::A).is_empty());
    }
}
