//! Audio input device listing.

use clap::Args;
use sonic_sight_io::list_input_devices;

#[derive(Args)]
pub struct DevicesArgs {}

pub fn run(_args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_input_devices()?;

    if devices.is_empty() {
        println!("No input devices found.");
        return Ok(());
    }

    println!("Input Devices:");
    for (idx, device) in devices.iter().enumerate() {
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx,
            device.name,
            device.default_sample_rate,
            device.channels,
            if device.is_default { " (default)" } else { "" }
        );
    }
    println!();
    println!("Tip: Use device index or partial name with --device:");
    println!("  sonic-sight listen --device 0");

    Ok(())
}
