//! Save and restore of the I/O block.
//!
//! Saving walks the register table: slots flagged raw-on-save are copied
//! literally, other real registers are read through [`IoBus::read16`] so the
//! snapshot holds what software would see. Restoring mirrors that with the
//! raw-on-load flag and [`IoBus::write16`], which rebuilds peripheral state
//! from the register values. Engine state that registers cannot express
//! (timer bookkeeping, in-flight DMA) is carried alongside.

use crate::bus::IoBus;
use crate::mmio::dma::DmaTiming;
use crate::mmio::timer::{TimerFlags, TimerState};
use crate::registers::{self, SNAPSHOT_SLOTS};
use gba_hw::mmio::dma::{CHANNEL_STRIDE, CHANNELS, registers::DMA0CNT_HI};
use gba_hw::mmio::sound::registers::SOUNDCNT_X;
use gba_hw::mmio::timer::COUNT as TIMERS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub reload: u16,
    pub old_reload: u16,
    pub last_event: u32,
    pub next_event: u32,
    pub overflow_interval: u32,
    pub flags: u32,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            reload: state.reload,
            old_reload: state.old_reload,
            last_event: state.last_event,
            next_event: state.next_event,
            overflow_interval: state.overflow_interval,
            flags: state.flags.0,
        }
    }
}

impl From<TimerSnapshot> for TimerState {
    fn from(saved: TimerSnapshot) -> Self {
        Self {
            reload: saved.reload,
            old_reload: saved.old_reload,
            last_event: saved.last_event,
            next_event: saved.next_event,
            overflow_interval: saved.overflow_interval,
            flags: TimerFlags(saved.flags),
        }
    }
}

/// In-flight state of a DMA channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmaSnapshot {
    pub next_source: u32,
    pub next_dest: u32,
    pub next_count: u32,
    pub next_event: u32,
}

/// Captured I/O state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// One entry per half-word below `REG_MAX`
    pub io: Vec<u16>,
    pub timers: [TimerSnapshot; TIMERS],
    pub dma: [DmaSnapshot; CHANNELS],
    /// Opaque cartridge hardware block
    pub hardware: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot holds {found} I/O slots, expected {expected}")]
    SlotCount { expected: usize, found: usize },
}

fn slot_address(slot: usize) -> u32 {
    (slot << 1) as u32
}

fn dma_control_address(channel: usize) -> u32 {
    DMA0CNT_HI + channel as u32 * CHANNEL_STRIDE
}

impl IoBus {
    /// Capture the register block and engine state.
    ///
    /// Reads made on the snapshot's behalf do not cancel a pending idle-skip.
    #[instrument(level = "debug", skip(self))]
    pub fn serialize(&mut self) -> Snapshot {
        let halt_pending = self.cpu.halt_pending;
        let mut io = vec![0; SNAPSHOT_SLOTS];
        for (slot, cell) in io.iter_mut().enumerate() {
            let address = slot_address(slot);
            if registers::is_raw_on_save(address) {
                *cell = self.registers().get(address);
            } else if registers::is_valid(address) {
                *cell = self.read16(address);
            }
        }
        self.cpu.halt_pending = halt_pending;

        let timers = &self.peripherals.timers;
        let dma = &self.peripherals.dma;
        let snapshot = Snapshot {
            io,
            timers: std::array::from_fn(|i| TimerSnapshot::from(timers.timer(i))),
            dma: std::array::from_fn(|i| {
                let channel = dma.channel(i);
                DmaSnapshot {
                    next_source: channel.next_source,
                    next_dest: channel.next_dest,
                    next_count: channel.next_count,
                    next_event: channel.next_event,
                }
            }),
            hardware: self.peripherals.hardware.serialize(),
        };
        debug!("Serialized I/O state at cycle {}", self.cpu.cycles);
        snapshot
    }

    /// Replace the register block and engine state with `snapshot`.
    #[instrument(level = "debug", skip(self, snapshot))]
    pub fn deserialize(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.io.len() != SNAPSHOT_SLOTS {
            return Err(SnapshotError::SlotCount {
                expected: SNAPSHOT_SLOTS,
                found: snapshot.io.len(),
            });
        }

        // Sound channel writes consult the master enable
        let soundcnt_x = snapshot.io[(SOUNDCNT_X >> 1) as usize];
        self.registers_mut().set(SOUNDCNT_X, soundcnt_x);

        for (slot, &value) in snapshot.io.iter().enumerate() {
            let address = slot_address(slot);
            if registers::is_raw_on_load(address) {
                self.registers_mut().set(address, value);
            } else if registers::is_valid(address) {
                self.write16(address, value);
            }
        }

        let now = self.cpu.cycles;
        let mut enabled = 0;
        for (i, saved) in snapshot.timers.iter().enumerate() {
            let state = TimerState::from(*saved);
            if state.flags.enabled() {
                enabled |= 1 << i;
            }
            *self.peripherals.timers.timer_mut(i) = state;
        }
        self.peripherals.timers.set_enabled_mask(enabled);

        for (i, saved) in snapshot.dma.iter().enumerate() {
            let control = self.registers().get(dma_control_address(i));
            let dma = &mut self.peripherals.dma;
            // Start conditions seen before the restore no longer apply
            dma.cancel(i);
            let channel = dma.channel_mut(i);
            channel.control = control;
            channel.next_source = saved.next_source;
            channel.next_dest = saved.next_dest;
            channel.next_count = saved.next_count;
            channel.next_event = saved.next_event;
            if channel.timing() != DmaTiming::Now {
                dma.schedule(i, now);
            }
        }

        let soundcnt_x = self.registers().get(SOUNDCNT_X);
        self.peripherals.audio.write_register(SOUNDCNT_X, soundcnt_x);
        self.peripherals.dma.update(now);
        self.peripherals.hardware.deserialize(&snapshot.hardware);
        self.peripherals.sio.sync_from_registers(&self.regs);
        debug!("Restored I/O state at cycle {}", now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusConfig, SoundWritePolicy};
    use gba_hw::mmio::sound::registers::SOUND1CNT_X;

    #[test]
    fn slot_count_is_checked() {
        let mut bus = IoBus::default();
        let mut snapshot = bus.serialize();
        snapshot.io.pop();
        assert_eq!(
            bus.deserialize(&snapshot),
            Err(SnapshotError::SlotCount {
                expected: 261,
                found: 260
            })
        );
    }

    #[test]
    fn serialize_leaves_idle_skip_alone() {
        let mut bus = IoBus::default();
        bus.cpu.halt_pending = true;
        bus.serialize();
        assert!(bus.cpu.halt_pending);
    }

    #[test]
    fn sound_enable_restored_before_channels() {
        let config = BusConfig {
            sound_writes: SoundWritePolicy::IgnoreWhileDisabled,
            ..BusConfig::default()
        };
        let mut source = IoBus::new(config.clone());
        source.write16(SOUNDCNT_X, 0x0080);
        source.write16(SOUND1CNT_X, 0x0123);
        let snapshot = source.serialize();

        let mut target = IoBus::new(config);
        target.deserialize(&snapshot).unwrap();
        assert_eq!(target.read16(SOUND1CNT_X), 0x0123);
    }
}
