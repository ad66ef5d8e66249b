//! Timer register hooks.
//!
//! Counters are not ticked here. A running counter is rebuilt from the cycle
//! clock whenever software reads it, relative to the cycle it was last
//! (re)loaded at; the scheduler that handles overflows keeps `old_reload` and
//! `last_event` current.
//!
//! # References
//! - [Timers](https://problemkaputt.de/gbatek.htm#gbatimers)

use crate::registers::RegisterFile;
use gba_hw::mmio::timer::{self as hw_timer, COUNT, PRESCALE_SHIFTS, TIMER_STRIDE, control};
use std::fmt;
use tracing::debug;

/// Packed timer flags, stored verbatim in snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerFlags(pub u32);

impl TimerFlags {
    const PRESCALE_MASK: u32 = 0x0F;
    const COUNT_UP: u32 = 1 << 4;
    const DO_IRQ: u32 = 1 << 5;
    const ENABLE: u32 = 1 << 6;

    pub fn prescale_bits(self) -> u32 {
        self.0 & Self::PRESCALE_MASK
    }

    pub fn count_up(self) -> bool {
        self.0 & Self::COUNT_UP != 0
    }

    pub fn do_irq(self) -> bool {
        self.0 & Self::DO_IRQ != 0
    }

    pub fn enabled(self) -> bool {
        self.0 & Self::ENABLE != 0
    }

    fn with(self, bit: u32, set: bool) -> Self {
        if set {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }

    pub fn with_prescale_bits(self, bits: u32) -> Self {
        Self((self.0 & !Self::PRESCALE_MASK) | (bits & Self::PRESCALE_MASK))
    }

    pub fn with_count_up(self, set: bool) -> Self {
        self.with(Self::COUNT_UP, set)
    }

    pub fn with_do_irq(self, set: bool) -> Self {
        self.with(Self::DO_IRQ, set)
    }

    pub fn with_enabled(self, set: bool) -> Self {
        self.with(Self::ENABLE, set)
    }
}

/// Bookkeeping of one timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerState {
    pub reload: u16,
    /// Reload value the running count started from
    pub old_reload: u16,
    pub last_event: u32,
    pub next_event: u32,
    /// Cycles from reload to overflow
    pub overflow_interval: u32,
    pub flags: TimerFlags,
}

impl TimerState {
    fn recompute_interval(&mut self) {
        self.overflow_interval = (0x10000 - self.reload as u32) << self.flags.prescale_bits();
    }

    /// Counter value at cycle `now`
    fn counter_at(&self, now: u32, prescale_bits: u32) -> u16 {
        let elapsed = now.wrapping_sub(self.last_event) >> prescale_bits;
        self.old_reload.wrapping_add(elapsed as u16)
    }
}

/// Hook contract of the timer block
pub trait TimerPort: fmt::Debug + Send {
    /// TMxCNT_LO write. The counter slot is owned by the timer and is not
    /// touched by the bus.
    fn write_reload(&mut self, timer: usize, value: u16);
    /// TMxCNT_HI write, already masked to the implemented bits
    fn write_control(&mut self, regs: &mut RegisterFile, timer: usize, value: u16, now: u32);
    /// Bring the counter slot up to date before a read
    fn update_register(&mut self, regs: &mut RegisterFile, timer: usize, now: u32);

    fn timer(&self, timer: usize) -> &TimerState;
    fn timer_mut(&mut self, timer: usize) -> &mut TimerState;

    /// Bit per running timer
    fn enabled_mask(&self) -> u8;
    fn set_enabled_mask(&mut self, mask: u8);

    /// Stop every timer and clear its bookkeeping
    fn reset(&mut self);
}

/// A counter read costs one non-sequential and one internal cycle; the read
/// observes the counter as it was before them.
const READ_LATENCY: u32 = 2;

fn counter_address(timer: usize) -> u32 {
    hw_timer::registers::TM0CNT_LO + timer as u32 * TIMER_STRIDE
}

#[derive(Debug, Clone, Default)]
pub struct TimerBank {
    timers: [TimerState; COUNT],
    enabled: u8,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerPort for TimerBank {
    fn write_reload(&mut self, timer: usize, value: u16) {
        let state = &mut self.timers[timer];
        state.reload = value;
        state.recompute_interval();
    }

    fn write_control(&mut self, regs: &mut RegisterFile, timer: usize, value: u16, now: u32) {
        self.update_register(regs, timer, now);

        let state = &mut self.timers[timer];
        let old_prescale = state.flags.prescale_bits();
        let prescale = PRESCALE_SHIFTS[(value & control::PRESCALE_MASK) as usize];
        let was_enabled = state.flags.enabled();

        state.flags = state
            .flags
            .with_prescale_bits(prescale)
            .with_count_up(timer > 0 && value & control::COUNT_UP != 0)
            .with_do_irq(value & control::IRQ != 0);
        state.recompute_interval();
        state.flags = state.flags.with_enabled(value & control::START != 0);

        let address = counter_address(timer);
        if !was_enabled && state.flags.enabled() {
            state.next_event = if state.flags.count_up() {
                u32::MAX
            } else {
                now.wrapping_add(state.overflow_interval)
            };
            regs.set(address, state.reload);
            state.old_reload = state.reload;
            state.last_event = now;
            self.enabled |= 1 << timer;
            debug!(
                "Timer {} started: reload={:#06X}, prescale={}, count_up={}",
                timer,
                state.reload,
                prescale,
                state.flags.count_up()
            );
        } else if was_enabled && !state.flags.enabled() {
            if !state.flags.count_up() {
                regs.set(address, state.counter_at(now, old_prescale));
            }
            self.enabled &= !(1 << timer);
            debug!("Timer {} stopped at {:#06X}", timer, regs.get(address));
        } else if prescale != old_prescale && !state.flags.count_up() {
            state.next_event = state.last_event.wrapping_add(state.overflow_interval);
        }
    }

    fn update_register(&mut self, regs: &mut RegisterFile, timer: usize, now: u32) {
        let state = &self.timers[timer];
        if state.flags.enabled() && !state.flags.count_up() {
            let now = now.wrapping_sub(READ_LATENCY);
            regs.set(
                counter_address(timer),
                state.counter_at(now, state.flags.prescale_bits()),
            );
        }
    }

    fn timer(&self, timer: usize) -> &TimerState {
        &self.timers[timer]
    }

    fn timer_mut(&mut self, timer: usize) -> &mut TimerState {
        &mut self.timers[timer]
    }

    fn enabled_mask(&self) -> u8 {
        self.enabled
    }

    fn set_enabled_mask(&mut self, mask: u8) {
        self.enabled = mask;
    }

    fn reset(&mut self) {
        debug!("Timers reset");
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::mmio::timer::registers::*;

    #[test]
    fn reload_sets_overflow_interval() {
        let mut timers = TimerBank::new();
        timers.write_reload(0, 0xFF00);
        assert_eq!(timers.timer(0).overflow_interval, 0x100);
    }

    #[test]
    fn start_loads_counter_and_schedules() {
        let mut timers = TimerBank::new();
        let mut regs = RegisterFile::new();
        timers.write_reload(1, 0xFFF0);
        timers.write_control(&mut regs, 1, control::START | 1, 1000);

        let state = timers.timer(1);
        assert!(state.flags.enabled());
        assert_eq!(state.flags.prescale_bits(), 6);
        assert_eq!(state.overflow_interval, 16 << 6);
        assert_eq!(state.next_event, 1000 + (16 << 6));
        assert_eq!(state.last_event, 1000);
        assert_eq!(regs.get(TM1CNT_LO), 0xFFF0);
        assert_eq!(timers.enabled_mask(), 0b10);
    }

    #[test]
    fn counter_resyncs_from_cycle_clock() {
        let mut timers = TimerBank::new();
        let mut regs = RegisterFile::new();
        timers.write_reload(2, 0x1000);
        timers.write_control(&mut regs, 2, control::START, 0);

        timers.update_register(&mut regs, 2, 0x42 + READ_LATENCY);
        assert_eq!(regs.get(TM2CNT_LO), 0x1042);
    }

    #[test]
    fn stopping_freezes_counter() {
        let mut timers = TimerBank::new();
        let mut regs = RegisterFile::new();
        timers.write_control(&mut regs, 0, control::START | 2, 0);
        timers.write_control(&mut regs, 0, 2, 256 * 5);
        assert_eq!(regs.get(TM0CNT_LO), 5);
        assert_eq!(timers.enabled_mask(), 0);

        // Stopped timers are left alone on read
        timers.update_register(&mut regs, 0, 256 * 100);
        assert_eq!(regs.get(TM0CNT_LO), 5);
    }

    #[test]
    fn cascade_is_not_available_on_timer_zero() {
        let mut timers = TimerBank::new();
        let mut regs = RegisterFile::new();
        timers.write_control(&mut regs, 0, control::START | control::COUNT_UP, 0);
        assert!(!timers.timer(0).flags.count_up());
        timers.write_control(&mut regs, 3, control::START | control::COUNT_UP, 0);
        assert!(timers.timer(3).flags.count_up());
        assert_eq!(timers.timer(3).next_event, u32::MAX);
    }

    #[test]
    fn flags_layout() {
        let flags = TimerFlags::default()
            .with_prescale_bits(10)
            .with_count_up(true)
            .with_do_irq(true)
            .with_enabled(true);
        assert_eq!(flags.0, 10 | 1 << 4 | 1 << 5 | 1 << 6);
    }
}
