//! Processor-side state the I/O bus reads and writes.
//!
//! The instruction loop itself lives elsewhere; these are the plain flags and
//! counters it consults between steps.

use tracing::debug;

/// Low-power state requested through HALTCNT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Running,
    /// Halted until an interrupt is requested
    Halted,
    /// Stopped until a keypad, Game Pak or serial interrupt
    Stopped,
}

/// Processor control block shared with the bus
#[derive(Debug, Clone, Default)]
pub struct CpuControl {
    /// Global cycle clock used for on-demand timer resynchronisation and DMA
    /// scheduling
    pub cycles: u32,
    /// The executor detected a spin loop and may fast-forward to the next event
    pub halt_pending: bool,
    pub power: PowerState,
    /// Last prefetched opcode; reads with no hardware source return it
    pub open_bus: u32,
}

impl CpuControl {
    pub fn new(open_bus: u32) -> Self {
        Self {
            open_bus,
            ..Self::default()
        }
    }

    pub fn halt(&mut self) {
        debug!("CPU halt requested at cycle {}", self.cycles);
        self.power = PowerState::Halted;
    }

    pub fn stop(&mut self) {
        debug!("CPU stop requested at cycle {}", self.cycles);
        self.power = PowerState::Stopped;
    }

    /// Open-bus sentinel for a 16-bit load
    pub fn load_bad(&self) -> u16 {
        self.open_bus as u16
    }

    /// Advance the cycle clock
    pub fn advance(&mut self, cycles: u32) {
        self.cycles = self.cycles.wrapping_add(cycles);
    }
}
