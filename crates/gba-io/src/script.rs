//! Access scripts: a line-oriented list of bus accesses replayed by the CLI.
//!
//! ```text
//! # comment
//! w16 0x208 1        # IME = 1
//! w8  0x04000301 0   # full bus addresses are accepted too
//! r16 0x130
//! keys 0x0009        # pressed keys (A + START) seen by KEYINPUT
//! cycles 1024        # advance the cycle clock
//! snapshot
//! restore
//! dump
//! ```

use crate::args::parse_hex_or_dec;
use crate::bus::IoBus;
use crate::registers::{self, REGISTERS};
use crate::snapshot::{Snapshot, SnapshotError};
use gba_hw::memory_map::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write8(u32, u8),
    Write16(u32, u16),
    Write32(u32, u32),
    Read8(u32),
    Read16(u32),
    Read32(u32),
    /// Set the pressed keys (active-high)
    Keys(u16),
    Advance(u32),
    Snapshot,
    Restore,
    Dump,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` takes {expected} operand(s)")]
    Operands {
        line: usize,
        command: String,
        expected: usize,
    },
    #[error("line {line}: invalid number `{text}`")]
    Number { line: usize, text: String },
    #[error("line {line}: {value:#X} does not fit in {bits} bits")]
    Range { line: usize, value: u64, bits: u32 },
    #[error("restore requested before any snapshot was taken")]
    NoSnapshot,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result of one command that produces output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Read {
        address: u32,
        bits: u32,
        value: u32,
    },
    Snapshot(Snapshot),
    /// Raw storage of every named register
    Dump(Vec<(u32, &'static str, u16)>),
}

fn number(line: usize, text: &str, bits: u32) -> Result<u64, ScriptError> {
    let value = parse_hex_or_dec(text).map_err(|_| ScriptError::Number {
        line,
        text: text.to_string(),
    })?;
    if bits < 64 && value >> bits != 0 {
        return Err(ScriptError::Range { line, value, bits });
    }
    Ok(value)
}

/// I/O offset from either an offset or a full bus address
fn address(line: usize, text: &str) -> Result<u32, ScriptError> {
    let value = number(line, text, 32)? as u32;
    Ok(if value >= io::BASE {
        value - io::BASE
    } else {
        value
    })
}

pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut words = content.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let operands: Vec<&str> = words.collect();

        let expected = match command {
            "w8" | "w16" | "w32" => 2,
            "r8" | "r16" | "r32" | "keys" | "cycles" => 1,
            "snapshot" | "restore" | "dump" => 0,
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: command.to_string(),
                });
            }
        };
        if operands.len() != expected {
            return Err(ScriptError::Operands {
                line,
                command: command.to_string(),
                expected,
            });
        }

        commands.push(match command {
            "w8" => Command::Write8(
                address(line, operands[0])?,
                number(line, operands[1], 8)? as u8,
            ),
            "w16" => Command::Write16(
                address(line, operands[0])?,
                number(line, operands[1], 16)? as u16,
            ),
            "w32" => Command::Write32(
                address(line, operands[0])?,
                number(line, operands[1], 32)? as u32,
            ),
            "r8" => Command::Read8(address(line, operands[0])?),
            "r16" => Command::Read16(address(line, operands[0])?),
            "r32" => Command::Read32(address(line, operands[0])?),
            "keys" => Command::Keys(number(line, operands[0], 10)? as u16),
            "cycles" => Command::Advance(number(line, operands[0], 32)? as u32),
            "snapshot" => Command::Snapshot,
            "restore" => Command::Restore,
            _ => Command::Dump,
        });
    }
    Ok(commands)
}

/// Replay `commands` against `bus`, collecting reads, snapshots and dumps.
///
/// The bus gets a shared key source driven by `keys` commands.
pub fn run(bus: &mut IoBus, commands: &[Command]) -> Result<Vec<Output>, ScriptError> {
    let keys = Arc::new(AtomicU16::new(0));
    bus.peripherals.keys.set_source(keys.clone());

    let mut saved: Option<Snapshot> = None;
    let mut outputs = Vec::new();
    for command in commands {
        debug!("Script: {:?}", command);
        match *command {
            Command::Write8(address, value) => bus.write8(address, value),
            Command::Write16(address, value) => bus.write16(address, value),
            Command::Write32(address, value) => bus.write32(address, value),
            Command::Read8(address) => outputs.push(Output::Read {
                address,
                bits: 8,
                value: bus.read8(address) as u32,
            }),
            Command::Read16(address) => outputs.push(Output::Read {
                address,
                bits: 16,
                value: bus.read16(address) as u32,
            }),
            Command::Read32(address) => outputs.push(Output::Read {
                address,
                bits: 32,
                value: bus.read32(address),
            }),
            Command::Keys(pressed) => keys.store(pressed, Ordering::Relaxed),
            Command::Advance(cycles) => bus.cpu.advance(cycles),
            Command::Snapshot => {
                let snapshot = bus.serialize();
                outputs.push(Output::Snapshot(snapshot.clone()));
                saved = Some(snapshot);
            }
            Command::Restore => {
                let snapshot = saved.as_ref().ok_or(ScriptError::NoSnapshot)?;
                bus.deserialize(snapshot)?;
                info!("Restored snapshot");
            }
            Command::Dump => outputs.push(Output::Dump(dump(bus))),
        }
    }
    Ok(outputs)
}

/// Raw storage of every named hardware register. Nothing is read through the
/// bus, so dumping has no side effects.
pub fn dump(bus: &IoBus) -> Vec<(u32, &'static str, u16)> {
    REGISTERS
        .iter()
        .filter(|info| info.valid)
        .filter_map(|info| Some((info.address, info.name?, bus.registers().get(info.address))))
        .collect()
}

/// One-line rendering of a read result
pub fn format_read(address: u32, bits: u32, value: u32) -> String {
    let name = registers::register_name(address & !1).unwrap_or("?");
    let digits = (bits / 4) as usize;
    format!(
        "r{bits} {address:#05X} ({name}) -> {value:#0width$X}",
        width = digits + 2
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hw::mmio::irq::registers::IME;

    #[test]
    fn parses_commands_and_comments() {
        let script = "
            # setup
            w16 0x208 1      # IME
            w8 0x04000301 0x80
            r32 0x0B0
            keys 0x3
            cycles 100
            snapshot
            restore
            dump
        ";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                Command::Write16(IME, 1),
                Command::Write8(0x301, 0x80),
                Command::Read32(0x0B0),
                Command::Keys(3),
                Command::Advance(100),
                Command::Snapshot,
                Command::Restore,
                Command::Dump,
            ]
        );
    }

    #[test]
    fn reports_line_numbers() {
        assert_eq!(
            parse_script("r16 0x4\nbogus 1"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                command: "bogus".to_string()
            })
        );
        assert_eq!(
            parse_script("w16 0x4"),
            Err(ScriptError::Operands {
                line: 1,
                command: "w16".to_string(),
                expected: 2
            })
        );
        assert_eq!(
            parse_script("\n\nw8 0x4 0x100"),
            Err(ScriptError::Range {
                line: 3,
                value: 0x100,
                bits: 8
            })
        );
        assert_eq!(
            parse_script("r16 zz"),
            Err(ScriptError::Number {
                line: 1,
                text: "zz".to_string()
            })
        );
    }

    #[test]
    fn keys_feed_keyinput() {
        let mut bus = IoBus::default();
        let commands = parse_script("keys 0x1\nr16 0x130").unwrap();
        let outputs = run(&mut bus, &commands).unwrap();
        assert_eq!(
            outputs,
            vec![Output::Read {
                address: 0x130,
                bits: 16,
                value: 0x3FE
            }]
        );
    }

    #[test]
    fn restore_needs_snapshot() {
        let mut bus = IoBus::default();
        assert_eq!(
            run(&mut bus, &[Command::Restore]),
            Err(ScriptError::NoSnapshot)
        );
    }

    #[test]
    fn restore_rewinds_registers() {
        let mut bus = IoBus::default();
        let commands = parse_script("w16 0x200 0x1\nsnapshot\nw16 0x200 0x3\nrestore\nr16 0x200")
            .unwrap();
        let outputs = run(&mut bus, &commands).unwrap();
        assert_eq!(
            outputs.last(),
            Some(&Output::Read {
                address: 0x200,
                bits: 16,
                value: 1
            })
        );
    }

    #[test]
    fn read_formatting() {
        assert_eq!(format_read(0x130, 16, 0x3FF), "r16 0x130 (KEYINPUT) -> 0x03FF");
        assert_eq!(format_read(0x066, 8, 0x1), "r8 0x066 (?) -> 0x01");
    }
}
