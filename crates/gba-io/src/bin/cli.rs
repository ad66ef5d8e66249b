use clap::Parser;
use gba_io::script::{self, Output};
use gba_io::{Args, IoBus, load_script, load_snapshot};
use tracing::info;

fn print_dump(entries: &[(u32, &'static str, u16)]) {
    for (address, name, value) in entries {
        println!("{:#05X} {:<12} {:#06X}", address, name, value);
    }
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let commands = match load_script(&args) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("Failed to load script: {}", e);
            std::process::exit(2);
        }
    };

    let mut bus = IoBus::new(args.to_bus_config());

    if let Some(path) = &args.snapshot_in {
        let restored = load_snapshot(path)
            .and_then(|snapshot| bus.deserialize(&snapshot).map_err(Into::into));
        if let Err(e) = restored {
            eprintln!("Failed to restore snapshot {:?}: {}", path, e);
            std::process::exit(2);
        }
        info!("Restored snapshot from {:?}", path);
    }

    info!("=== Replaying {} accesses ===", commands.len());
    let outputs = match script::run(&mut bus, &commands) {
        Ok(outputs) => outputs,
        Err(e) => {
            eprintln!("Script error: {}", e);
            std::process::exit(1);
        }
    };

    for output in &outputs {
        match output {
            Output::Read {
                address,
                bits,
                value,
            } => println!("{}", script::format_read(*address, *bits, *value)),
            Output::Snapshot(snapshot) => {
                info!("Snapshot taken ({} I/O slots)", snapshot.io.len())
            }
            Output::Dump(entries) => print_dump(entries),
        }
    }

    if args.dump {
        print_dump(&script::dump(&bus));
    }

    if let Some(path) = &args.snapshot_out {
        let snapshot = bus.serialize();
        let written = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Failed to write snapshot {:?}: {}", path, e);
            std::process::exit(2);
        }
        info!("Wrote snapshot to {:?}", path);
    }

    info!("=== Replay Complete ===");
    info!("Cycle clock: {}", bus.cpu.cycles);
    info!("Power state: {:?}", bus.cpu.power);
}
