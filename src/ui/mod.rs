pub mod progress;

use crate::config::DeviceRegistry;
use crate::protocol::Command;

pub fn print_banner() {
    eprintln!("HunterTX-rs");
}

pub fn print_devices(registry: &DeviceRegistry) {
    for (name, addr) in registry.iter() {
        println!("{:<12} {} ({} bits)", name, addr, addr.len());
    }
}

/// Menu labels for the interactive picker, one per supported command
pub fn command_menu() -> Vec<(Command, String)> {
    Command::ALL
        .into_iter()
        .filter(|c| c.is_supported())
        .map(|c| (c, format!("{:<6} {}", c.name(), c.description())))
        .collect()
}
