//! DMA register hooks and channel bookkeeping.
//!
//! The bus only latches registers and decides when a channel becomes due. The
//! transfer itself is stepped by whoever owns the memory map, using the
//! `next_*` fields of the active channel.
//!
//! # References
//! - [DMA Transfers](https://problemkaputt.de/gbatek.htm#gbadmatransfers)

use gba_hw::mmio::dma::{self as hw_dma, CHANNELS, control};
use std::fmt;
use tracing::{debug, trace, warn};

/// Start timing selected by DMAxCNT_HI bits 12-13
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaTiming {
    Now,
    VBlank,
    HBlank,
    /// Sound FIFO on channels 1-2, video capture on channel 3
    Special,
}

impl DmaTiming {
    pub fn from_control(value: u16) -> Self {
        match (value & control::TIMING_MASK) >> control::TIMING_SHIFT {
            0 => DmaTiming::Now,
            1 => DmaTiming::VBlank,
            2 => DmaTiming::HBlank,
            _ => DmaTiming::Special,
        }
    }
}

/// Latched registers and in-flight state of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmaChannel {
    pub source: u32,
    pub dest: u32,
    /// Word count, with zero already expanded to the channel maximum
    pub count: u32,
    pub control: u16,
    pub next_source: u32,
    pub next_dest: u32,
    pub next_count: u32,
    /// Cycle at which an immediate transfer is due
    pub next_event: u32,
}

impl DmaChannel {
    pub fn enabled(&self) -> bool {
        self.control & control::ENABLE != 0
    }

    pub fn timing(&self) -> DmaTiming {
        DmaTiming::from_control(self.control)
    }
}

/// Hook contract of the DMA engine
pub trait DmaPort: fmt::Debug + Send {
    /// Returns the value kept in the register slots
    fn write_source(&mut self, channel: usize, value: u32) -> u32;
    fn write_dest(&mut self, channel: usize, value: u32) -> u32;
    fn write_count(&mut self, channel: usize, value: u16);
    /// Returns the value kept in the CNT_HI slot
    fn write_control(&mut self, channel: usize, value: u16, now: u32) -> u16;

    fn channel(&self, channel: usize) -> &DmaChannel;
    fn channel_mut(&mut self, channel: usize) -> &mut DmaChannel;

    /// Arm a channel according to its start timing
    fn schedule(&mut self, channel: usize, now: u32);
    /// Re-evaluate which channel runs next
    fn update(&mut self, now: u32);
    /// Channel the transfer engine should service next, if any
    fn active_channel(&self) -> Option<usize>;

    /// Signal a start condition (blanking period) to every enabled channel
    /// waiting on it
    fn trigger(&mut self, timing: DmaTiming, now: u32);
    /// Drop a channel's outstanding start condition and FIFO arming
    fn cancel(&mut self, channel: usize);
    fn is_fifo_feeder(&self, channel: usize) -> bool;

    /// Back to power-on: every channel disabled and idle
    fn reset(&mut self);
}

/// Delay between enabling an immediate channel and its first transfer
pub const START_DELAY: u32 = 2;

#[derive(Debug, Clone, Default)]
pub struct DmaController {
    channels: [DmaChannel; CHANNELS],
    active: Option<usize>,
    /// Bit per blanking or special channel whose start condition occurred
    pending: u8,
    /// Bit per channel armed as a sound FIFO feeder
    fifo_feeders: u8,
}

impl DmaController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DmaPort for DmaController {
    fn write_source(&mut self, channel: usize, value: u32) -> u32 {
        let value = value & hw_dma::SOURCE_MASK;
        self.channels[channel].source = value;
        value
    }

    fn write_dest(&mut self, channel: usize, value: u32) -> u32 {
        let value = value & hw_dma::DEST_MASK;
        self.channels[channel].dest = value;
        value
    }

    fn write_count(&mut self, channel: usize, value: u16) {
        let max = if channel == CHANNELS - 1 {
            hw_dma::MAX_COUNT_DMA3
        } else {
            hw_dma::MAX_COUNT
        };
        self.channels[channel].count = match value {
            0 => max,
            n => n as u32,
        };
    }

    fn write_control(&mut self, channel: usize, value: u16, now: u32) -> u16 {
        let mask = if channel == CHANNELS - 1 {
            control::WRITE_MASK_DMA3
        } else {
            control::WRITE_MASK
        };
        let dma = &mut self.channels[channel];
        let was_enabled = dma.enabled();
        dma.control = value & mask;

        if dma.control & control::DRQ != 0 {
            debug!("Stub: DMA{} Game Pak DRQ not implemented", channel);
        }

        if !was_enabled && dma.enabled() {
            dma.next_source = dma.source;
            dma.next_dest = dma.dest;
            dma.next_count = dma.count;
            debug!(
                "DMA{} enabled: {:#010X} -> {:#010X}, {} units, {:?}",
                channel,
                dma.source,
                dma.dest,
                dma.count,
                dma.timing()
            );
            self.schedule(channel, now);
        } else if was_enabled && !dma.enabled() {
            self.cancel(channel);
            self.update(now);
        }

        self.channels[channel].control
    }

    fn channel(&self, channel: usize) -> &DmaChannel {
        &self.channels[channel]
    }

    fn channel_mut(&mut self, channel: usize) -> &mut DmaChannel {
        &mut self.channels[channel]
    }

    fn schedule(&mut self, channel: usize, now: u32) {
        if !self.channels[channel].enabled() {
            return;
        }
        match self.channels[channel].timing() {
            DmaTiming::Now => {
                self.channels[channel].next_event = now.wrapping_add(START_DELAY);
                self.update(now);
            }
            // Started by the video unit
            DmaTiming::VBlank | DmaTiming::HBlank => {}
            DmaTiming::Special => match channel {
                0 => warn!("Discarding invalid DMA0 scheduling"),
                1 | 2 => self.fifo_feeders |= 1 << channel,
                _ => debug!("DMA3 armed for video capture"),
            },
        }
    }

    fn update(&mut self, now: u32) {
        self.active = self
            .channels
            .iter()
            .enumerate()
            .filter(|(i, ch)| {
                ch.enabled() && (ch.timing() == DmaTiming::Now || self.pending & (1 << i) != 0)
            })
            .min_by_key(|(_, ch)| ch.next_event)
            .map(|(i, _)| i);
        trace!("Active DMA at cycle {}: {:?}", now, self.active);
    }

    fn active_channel(&self) -> Option<usize> {
        self.active
    }

    fn trigger(&mut self, timing: DmaTiming, now: u32) {
        for (i, channel) in self.channels.iter_mut().enumerate() {
            if channel.enabled() && channel.timing() == timing {
                trace!("DMA{} triggered by {:?}", i, timing);
                channel.next_event = now;
                self.pending |= 1 << i;
            }
        }
        self.update(now);
    }

    fn cancel(&mut self, channel: usize) {
        self.pending &= !(1 << channel);
        self.fifo_feeders &= !(1 << channel);
    }

    fn is_fifo_feeder(&self, channel: usize) -> bool {
        self.fifo_feeders & (1 << channel) != 0
    }

    fn reset(&mut self) {
        debug!("DMA reset");
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_masked() {
        let mut dma = DmaController::new();
        assert_eq!(dma.write_source(0, 0xFFFF_FFFF), 0x0FFF_FFFE);
        assert_eq!(dma.write_dest(2, 0x0600_0001), 0x0600_0000);
        assert_eq!(dma.channel(2).dest, 0x0600_0000);
    }

    #[test]
    fn zero_count_means_maximum() {
        let mut dma = DmaController::new();
        dma.write_count(0, 0);
        dma.write_count(3, 0);
        dma.write_count(1, 16);
        assert_eq!(dma.channel(0).count, 0x4000);
        assert_eq!(dma.channel(3).count, 0x10000);
        assert_eq!(dma.channel(1).count, 16);
    }

    #[test]
    fn control_mask_depends_on_channel() {
        let mut dma = DmaController::new();
        assert_eq!(dma.write_control(0, 0x0FFF, 0), 0x07E0);
        assert_eq!(dma.write_control(3, 0x0FFF, 0), 0x0FE0);
    }

    #[test]
    fn rising_enable_latches_and_schedules() {
        let mut dma = DmaController::new();
        dma.write_source(3, 0x0800_0000);
        dma.write_dest(3, 0x0600_0000);
        dma.write_count(3, 8);
        dma.write_control(3, control::ENABLE, 100);

        let ch = dma.channel(3);
        assert_eq!(ch.next_source, 0x0800_0000);
        assert_eq!(ch.next_dest, 0x0600_0000);
        assert_eq!(ch.next_count, 8);
        assert_eq!(ch.next_event, 100 + START_DELAY);
        assert_eq!(dma.active_channel(), Some(3));

        // Writing again while enabled does not re-latch
        dma.write_source(3, 0x0200_0000);
        dma.write_control(3, control::ENABLE, 200);
        assert_eq!(dma.channel(3).next_source, 0x0800_0000);
        assert_eq!(dma.channel(3).next_event, 100 + START_DELAY);
    }

    #[test]
    fn blanking_channels_wait_for_trigger() {
        let mut dma = DmaController::new();
        dma.write_control(1, control::ENABLE | (2 << control::TIMING_SHIFT), 0);
        assert_eq!(dma.channel(1).timing(), DmaTiming::HBlank);
        assert_eq!(dma.active_channel(), None);

        dma.trigger(DmaTiming::VBlank, 50);
        assert_eq!(dma.active_channel(), None);
        dma.trigger(DmaTiming::HBlank, 60);
        assert_eq!(dma.active_channel(), Some(1));
    }

    #[test]
    fn special_timing_arms_fifo_feeders() {
        let mut dma = DmaController::new();
        let special = control::ENABLE | control::TIMING_MASK;
        dma.write_control(0, special, 0);
        dma.write_control(2, special, 0);
        assert!(!dma.is_fifo_feeder(0));
        assert!(dma.is_fifo_feeder(2));
        dma.write_control(2, 0, 0);
        assert!(!dma.is_fifo_feeder(2));
    }

    #[test]
    fn cancel_and_reset_clear_armed_state() {
        let mut dma = DmaController::new();
        dma.write_control(0, control::ENABLE | (1 << control::TIMING_SHIFT), 0);
        dma.write_control(1, control::ENABLE | control::TIMING_MASK, 0);
        dma.trigger(DmaTiming::VBlank, 10);
        assert_eq!(dma.active_channel(), Some(0));

        dma.cancel(0);
        dma.cancel(1);
        dma.update(20);
        assert_eq!(dma.active_channel(), None);
        assert!(!dma.is_fifo_feeder(1));

        dma.write_control(3, control::ENABLE, 30);
        dma.reset();
        assert!(!dma.channel(3).enabled());
        assert_eq!(dma.active_channel(), None);
    }
}
