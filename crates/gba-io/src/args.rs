use crate::config::{BusConfig, SoundWritePolicy};
use crate::script::{Command, parse_script};
use crate::snapshot::Snapshot;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Access script to replay against the bus ("-" reads stdin)
    pub script: PathBuf,

    /// Restore this JSON snapshot before running the script
    #[arg(long)]
    pub snapshot_in: Option<PathBuf>,

    /// Write a JSON snapshot of the final state to this path
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,

    /// Value returned by reads with no hardware source (hex: 0x1234 or decimal: 1234)
    #[arg(long, value_parser = parse_hex_or_dec, default_value = "0")]
    pub open_bus: u64,

    /// Discard writes to sound channel registers while SOUNDCNT_X bit 7 is clear
    #[arg(long)]
    pub ignore_sound_writes_while_disabled: bool,

    /// Hide write-only sound register fields (frequency, length, restart) on reads
    #[arg(long)]
    pub hide_write_only_sound_bits: bool,

    /// Print every named register after the script has run
    #[arg(long)]
    pub dump: bool,
}

impl Args {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.open_bus > u32::MAX as u64 {
            return Err(format!("--open-bus {:#X} does not fit in 32 bits", self.open_bus));
        }
        if self.snapshot_in.is_some() && self.snapshot_in == self.snapshot_out {
            return Err("--snapshot-in and --snapshot-out must differ".to_string());
        }
        Ok(())
    }

    /// Convert Args to BusConfig
    pub fn to_bus_config(&self) -> BusConfig {
        BusConfig {
            sound_writes: if self.ignore_sound_writes_while_disabled {
                SoundWritePolicy::IgnoreWhileDisabled
            } else {
                SoundWritePolicy::Always
            },
            hide_write_only_sound_bits: self.hide_write_only_sound_bits,
            initial_open_bus: self.open_bus as u32,
        }
    }
}

pub fn parse_hex_or_dec(s: &str) -> Result<u64, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

/// Load and parse the access script named on the command line
pub fn load_script(args: &Args) -> Result<Vec<Command>, Box<dyn std::error::Error>> {
    use std::io::Read;
    use tracing::info;

    let text = if args.script.as_os_str() == "-" {
        info!("Reading script from stdin");
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        info!("Loading script from file: {:?}", args.script);
        std::fs::read_to_string(&args.script)?
    };
    let commands = parse_script(&text)?;
    info!("Parsed {} commands", commands.len());
    Ok(commands)
}

/// Load a snapshot previously written with --snapshot-out
pub fn load_snapshot(path: &Path) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_decimal() {
        assert_eq!(parse_hex_or_dec("0x20A"), Ok(0x20A));
        assert_eq!(parse_hex_or_dec("522"), Ok(522));
        assert!(parse_hex_or_dec("0xZZ").is_err());
    }

    #[test]
    fn flags_map_to_config() {
        let args = Args::parse_from([
            "gba-io-cli",
            "trace.txt",
            "--open-bus",
            "0xE3A00000",
            "--ignore-sound-writes-while-disabled",
        ]);
        assert!(args.validate().is_ok());
        let config = args.to_bus_config();
        assert_eq!(config.sound_writes, SoundWritePolicy::IgnoreWhileDisabled);
        assert!(!config.hide_write_only_sound_bits);
        assert_eq!(config.initial_open_bus, 0xE3A0_0000);
    }

    #[test]
    fn rejects_oversized_open_bus() {
        let args = Args::parse_from(["gba-io-cli", "-", "--open-bus", "0x100000000"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn rejects_same_snapshot_paths() {
        let args = Args::parse_from([
            "gba-io-cli",
            "-",
            "--snapshot-in",
            "s.json",
            "--snapshot-out",
            "s.json",
        ]);
        assert!(args.validate().is_err());
    }
}
