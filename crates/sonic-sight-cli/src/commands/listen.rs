//! Live microphone detection.

use super::common::DetectorOptions;
use clap::Args;
use sonic_sight_detect::{LiveAnalyzer, TickOutcome};
use sonic_sight_io::MicCapture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Args)]
pub struct ListenArgs {
    /// Input device (index or partial name); default input if omitted
    #[arg(short, long)]
    device: Option<String>,

    #[command(flatten)]
    options: DetectorOptions,
}

pub fn run(args: ListenArgs) -> anyhow::Result<()> {
    let config = args.options.detector_config()?;
    let library = args.options.load_library()?;

    let mut capture = MicCapture::open(args.device.as_deref())?;

    if !args.options.json {
        println!("Listening for {} sound(s)", library.len());
        println!(
            "  Input: {} ({} Hz)",
            capture.device_name(),
            capture.sample_rate()
        );
        println!("  Threshold: {:.2}", config.threshold);
        println!("\nPress Ctrl+C to stop...\n");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut analyzer = LiveAnalyzer::new(config)?;
    analyzer.start();
    // Drop whatever arrived while the analyzer was being set up
    let _ = capture.take_chunk();

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(config.analysis_interval());

        let chunk = capture.take_chunk();
        match analyzer.tick(&chunk, &library)? {
            TickOutcome::Detected(event) => args.options.print_event(&event, "")?,
            outcome => tracing::debug!(?outcome, samples = chunk.len(), "tick"),
        }
    }

    analyzer.stop();
    capture.stop();
    if capture.overflowed_samples() > 0 {
        tracing::debug!(
            samples = capture.overflowed_samples(),
            "audio dropped between ticks"
        );
    }
    if !args.options.json {
        println!("\nStopped.");
    }
    Ok(())
}
