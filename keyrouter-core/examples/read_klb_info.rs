use keyrouter_core::{klb::KlbLoader, InfoEntry, Layout, INFO_DEBUG_INTERVAL};
use std::env;
use std::fs;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <klb-file>", args[0]);
        std::process::exit(1);
    }

    let klb_bytes = match fs::read(&args[1]) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    let file = match KlbLoader::load(&klb_bytes) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to load KLB file: {}", e);
            std::process::exit(1);
        }
    };

    println!("Layout Information:");
    println!("===================");
    println!(
        "Version: {}.{}",
        file.header.major_version, file.header.minor_version
    );
    println!(
        "Matrix: {} layers of {}x{}",
        file.header.layer_count, file.header.rows, file.header.cols
    );
    println!("Overrides: {}", file.overrides.len());

    print_info_entries(&file.info);

    match Layout::from_klb(&file) {
        Ok(layout) => {
            println!("\nRouter Settings:");
            println!("================");
            println!("LEDs: {}", layout.leds.led_count());
            println!(
                "Debug interval: {} ms{}",
                layout.config.debug_interval_ms,
                if file.info(INFO_DEBUG_INTERVAL).is_some() { "" } else { " (default)" }
            );
        }
        Err(e) => {
            eprintln!("Layout is not usable: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_info_entries(info: &[InfoEntry]) {
    println!("\nInfo Entries:");
    println!("=============");
    for entry in info {
        let id = String::from_utf8_lossy(&entry.id);
        match std::str::from_utf8(&entry.data) {
            Ok(text) if entry.data.iter().all(|b| !b.is_ascii_control()) => {
                println!("{}: \"{}\"", id, text)
            }
            _ => println!("{}: <binary data, {} bytes>", id, entry.data.len()),
        }
    }
}
