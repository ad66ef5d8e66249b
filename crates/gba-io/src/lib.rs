pub mod args;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod mmio;
pub mod registers;
pub mod script;
pub mod snapshot;

// Re-export commonly used types
pub use args::{Args, load_script, load_snapshot};
pub use bus::IoBus;
pub use config::{BusConfig, SoundWritePolicy};
pub use cpu::{CpuControl, PowerState};
pub use mmio::Peripherals;
pub use registers::{RegisterFile, RegisterInfo};
pub use snapshot::{Snapshot, SnapshotError};
