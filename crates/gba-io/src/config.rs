//! Behavioural options of the register bus.

/// What happens to writes aimed at sound channel registers while the master
/// sound enable (SOUNDCNT_X bit 7) is clear.
///
/// Hardware behaviour here is not settled; both variants are kept so it can be
/// decided by testing against real units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundWritePolicy {
    /// Writes reach the audio unit and storage regardless of the enable bit
    #[default]
    Always,
    /// Writes are discarded while the circuit is powered down
    IgnoreWhileDisabled,
}

/// Configuration for an [`IoBus`](crate::IoBus)
#[derive(Debug, Clone, Default)]
pub struct BusConfig {
    pub sound_writes: SoundWritePolicy,
    /// Hide write-only fields (frequency, length, restart) of sound registers
    /// on reads. Storage keeps the full value so byte writes still merge with
    /// the bits software cannot see.
    pub hide_write_only_sound_bits: bool,
    /// Value returned by reads with no hardware source until the executor
    /// reports a prefetch
    pub initial_open_bus: u32,
}
