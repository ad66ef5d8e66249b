//! Peripheral adapters behind the I/O register bus.
//!
//! Each peripheral exposes a narrow hook contract (a trait) that the bus calls
//! while dispatching register accesses. The modules below define those traits
//! together with a register-level default adapter, so a bus can be built and
//! driven without any real rendering, mixing or transfer engine attached.
//!
//! # Ownership of register storage
//! Most registers are stored in the bus's [`RegisterFile`](crate::RegisterFile)
//! after the hook returns. A few are owned by the peripheral instead (DISPSTAT,
//! the timer counters); their hooks receive the register file and persist the
//! value themselves, and the bus skips the generic commit.

pub mod audio;
pub mod dma;
pub mod hardware;
pub mod input;
pub mod irq;
pub mod sio;
pub mod timer;
pub mod video;
pub mod waitstate;

pub use audio::{AudioPort, AudioRegisters, Fifo};
pub use dma::{DmaChannel, DmaController, DmaPort, DmaTiming};
pub use hardware::{CartridgeHardware, GpioPort, NoHardware, gpio_registers};
pub use input::{InputLog, InputRecorder, KeyInput, KeyProvider};
pub use irq::{InterruptController, InterruptPort};
pub use sio::{Sio, SioMode, SerialPort};
pub use timer::{TimerBank, TimerFlags, TimerPort, TimerState};
pub use video::{VideoPort, VideoRegisters};
pub use waitstate::{WaitstatePort, Waitstates};

/// Every peripheral the bus dispatches to
#[derive(Debug)]
pub struct Peripherals {
    pub video: Box<dyn VideoPort>,
    pub audio: Box<dyn AudioPort>,
    pub dma: Box<dyn DmaPort>,
    pub timers: Box<dyn TimerPort>,
    pub sio: Box<dyn SerialPort>,
    pub irq: Box<dyn InterruptPort>,
    pub waitstates: Box<dyn WaitstatePort>,
    pub keys: KeyInput,
    pub hardware: Box<dyn CartridgeHardware>,
}

impl Default for Peripherals {
    fn default() -> Self {
        Self {
            video: Box::new(VideoRegisters::new()),
            audio: Box::new(AudioRegisters::new()),
            dma: Box::new(DmaController::new()),
            timers: Box::new(TimerBank::new()),
            sio: Box::new(Sio::new()),
            irq: Box::new(InterruptController::new()),
            waitstates: Box::new(Waitstates::new()),
            keys: KeyInput::new(),
            hardware: Box::new(NoHardware),
        }
    }
}
