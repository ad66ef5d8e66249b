//! Interrupt enable/master-enable hooks.
//!
//! IF itself is plain write-1-to-clear storage handled by the bus. IE and IME
//! writes can make an already pending request visible, so they go through the
//! controller.

use crate::registers::RegisterFile;
use gba_hw::mmio::irq::{registers as hw_regs, sources};
use std::fmt;
use tracing::{debug, trace};

/// Hook contract of the interrupt controller
pub trait InterruptPort: fmt::Debug + Send {
    /// IE write; `regs` still holds the previous IE
    fn write_ie(&mut self, regs: &RegisterFile, value: u16);
    /// IME write; `regs` still holds the previous IME
    fn write_ime(&mut self, regs: &RegisterFile, value: u16);
    /// Whether the processor IRQ line is asserted
    fn irq_line(&self) -> bool;

    /// Flag `mask` in IF on behalf of a peripheral
    fn request(&mut self, regs: &mut RegisterFile, mask: u16);
    /// Processor took the exception
    fn acknowledge(&mut self);
    fn reset(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct InterruptController {
    line: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    fn raise(&mut self) {
        if !self.line {
            debug!("IRQ raised");
        }
        self.line = true;
    }
}

impl InterruptPort for InterruptController {
    fn write_ie(&mut self, regs: &RegisterFile, value: u16) {
        if value & sources::KEYPAD != 0 {
            debug!("Stub: keypad interrupts not implemented");
        }
        if value & sources::GAMEPAK != 0 {
            debug!("Stub: Game Pak interrupts not implemented");
        }
        if regs.get(hw_regs::IME) != 0 && value & regs.get(hw_regs::IF) != 0 {
            self.raise();
        }
    }

    fn write_ime(&mut self, regs: &RegisterFile, value: u16) {
        if value != 0 && regs.get(hw_regs::IE) & regs.get(hw_regs::IF) != 0 {
            self.raise();
        }
    }

    fn irq_line(&self) -> bool {
        self.line
    }

    fn request(&mut self, regs: &mut RegisterFile, mask: u16) {
        let pending = regs.get(hw_regs::IF) | mask;
        regs.set(hw_regs::IF, pending);
        trace!("IRQ request {:#06X}, IF={:#06X}", mask, pending);
        if regs.get(hw_regs::IME) != 0 && regs.get(hw_regs::IE) & pending != 0 {
            self.raise();
        }
    }

    fn acknowledge(&mut self) {
        self.line = false;
    }

    fn reset(&mut self) {
        self.line = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ime_exposes_pending_request() {
        let mut irq = InterruptController::new();
        let mut regs = RegisterFile::new();
        regs.set(hw_regs::IE, sources::VBLANK);
        irq.request(&mut regs, sources::VBLANK);
        assert!(!irq.irq_line());

        irq.write_ime(&regs, 1);
        assert!(irq.irq_line());
    }

    #[test]
    fn ie_exposes_pending_request() {
        let mut irq = InterruptController::new();
        let mut regs = RegisterFile::new();
        regs.set(hw_regs::IME, 1);
        irq.request(&mut regs, sources::TIMER2);
        assert_eq!(regs.get(hw_regs::IF), sources::TIMER2);

        irq.write_ie(&regs, sources::TIMER1);
        assert!(!irq.irq_line());
        irq.write_ie(&regs, sources::TIMER2);
        assert!(irq.irq_line());
        irq.acknowledge();
        assert!(!irq.irq_line());
    }
}
