//! Keypad input sources and input recording.
//!
//! Key state is active-high everywhere in this module (a set bit is a pressed
//! key). KEYINPUT itself is active-low, and the inversion happens on read.

use gba_hw::specs::keypad::ALL_RELEASED;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tracing::{debug, trace};

/// Frontend callback polled for the pressed keys
pub trait KeyProvider: fmt::Debug + Send {
    fn read_keys(&mut self) -> u16;
}

/// Input recording / playback session
pub trait InputRecorder: fmt::Debug + Send {
    fn is_playing(&self) -> bool;
    fn is_recording(&self) -> bool;
    /// Next recorded key state, during playback
    fn query_input(&mut self) -> u16;
    /// Append one polled key state, during recording
    fn log_input(&mut self, keys: u16);
}

/// Everything that can feed KEYINPUT, in priority order: playback, provider,
/// shared key source.
#[derive(Debug, Default)]
pub struct KeyInput {
    provider: Option<Box<dyn KeyProvider>>,
    source: Option<Arc<AtomicU16>>,
    recorder: Option<Box<dyn InputRecorder>>,
}

impl KeyInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_provider(&mut self, provider: Box<dyn KeyProvider>) {
        self.provider = Some(provider);
    }

    /// Key state published by another thread
    pub fn set_source(&mut self, source: Arc<AtomicU16>) {
        self.source = Some(source);
    }

    pub fn set_recorder(&mut self, recorder: Box<dyn InputRecorder>) {
        self.recorder = Some(recorder);
    }

    pub fn take_recorder(&mut self) -> Option<Box<dyn InputRecorder>> {
        self.recorder.take()
    }

    /// Active-low KEYINPUT value
    pub fn read(&mut self) -> u16 {
        if let Some(recorder) = self.recorder.as_mut().filter(|r| r.is_playing()) {
            let keys = recorder.query_input();
            trace!("KEYINPUT playback: {:#06X}", keys);
            return ALL_RELEASED ^ keys;
        }

        let keys = if let Some(provider) = self.provider.as_mut() {
            provider.read_keys()
        } else if let Some(source) = &self.source {
            source.load(Ordering::Relaxed)
        } else {
            0
        };

        if let Some(recorder) = self.recorder.as_mut().filter(|r| r.is_recording()) {
            recorder.log_input(keys);
        }
        ALL_RELEASED ^ keys
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LogMode {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// In-memory input log
#[derive(Debug, Clone, Default)]
pub struct InputLog {
    entries: Vec<u16>,
    cursor: usize,
    mode: LogMode,
}

impl InputLog {
    pub fn recording() -> Self {
        Self {
            mode: LogMode::Recording,
            ..Self::default()
        }
    }

    pub fn playback(entries: Vec<u16>) -> Self {
        Self {
            entries,
            cursor: 0,
            mode: LogMode::Playing,
        }
    }

    pub fn entries(&self) -> &[u16] {
        &self.entries
    }
}

impl InputRecorder for InputLog {
    fn is_playing(&self) -> bool {
        self.mode == LogMode::Playing
    }

    fn is_recording(&self) -> bool {
        self.mode == LogMode::Recording
    }

    fn query_input(&mut self) -> u16 {
        match self.entries.get(self.cursor) {
            Some(&keys) => {
                self.cursor += 1;
                keys
            }
            None => {
                debug!("Input playback finished after {} polls", self.cursor);
                self.mode = LogMode::Idle;
                0
            }
        }
    }

    fn log_input(&mut self, keys: u16) {
        self.entries.push(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::specs::keypad;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Fixed(u16);

    impl KeyProvider for Fixed {
        fn read_keys(&mut self) -> u16 {
            self.0
        }
    }

    /// Recorder whose log stays visible to the test after being handed over
    #[derive(Debug, Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u16>>>);

    impl InputRecorder for SharedLog {
        fn is_playing(&self) -> bool {
            false
        }
        fn is_recording(&self) -> bool {
            true
        }
        fn query_input(&mut self) -> u16 {
            0
        }
        fn log_input(&mut self, keys: u16) {
            self.0.lock().unwrap().push(keys);
        }
    }

    #[test]
    fn no_source_reads_released() {
        assert_eq!(KeyInput::new().read(), 0x03FF);
    }

    #[test]
    fn provider_beats_shared_source() {
        let mut keys = KeyInput::new();
        let source = Arc::new(AtomicU16::new(keypad::B));
        keys.set_source(source.clone());
        assert_eq!(keys.read(), 0x03FF ^ keypad::B);

        source.store(keypad::START, Ordering::Relaxed);
        assert_eq!(keys.read(), 0x03FF ^ keypad::START);

        keys.set_provider(Box::new(Fixed(keypad::A)));
        assert_eq!(keys.read(), 0x03FE);
    }

    #[test]
    fn recording_logs_pressed_keys() {
        let log = SharedLog::default();
        let mut keys = KeyInput::new();
        keys.set_provider(Box::new(Fixed(keypad::UP | keypad::L)));
        keys.set_recorder(Box::new(log.clone()));
        keys.read();
        keys.read();
        assert_eq!(*log.0.lock().unwrap(), vec![keypad::UP | keypad::L; 2]);
    }

    #[test]
    fn playback_overrides_live_input() {
        let mut keys = KeyInput::new();
        keys.set_provider(Box::new(Fixed(keypad::A)));
        keys.set_recorder(Box::new(InputLog::playback(vec![keypad::R])));
        assert_eq!(keys.read(), 0x03FF ^ keypad::R);
        // Exhausted playback hands control back to the live provider
        assert_eq!(keys.read(), 0x03FF);
        assert_eq!(keys.read(), 0x03FF ^ keypad::A);
    }
}
