//! Offline replay: stream a WAV file through the live analyzer.
//!
//! The file is cut into chunks one analysis interval long and ticked on a
//! manual clock, so cooldowns follow file time rather than wall time.

use super::common::{DetectorOptions, format_offset};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sonic_sight_analysis::AudioChunk;
use sonic_sight_detect::{LiveAnalyzer, ManualClock, TickOutcome};
use sonic_sight_io::read_wav;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct DetectArgs {
    /// Recording to scan (WAV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    options: DetectorOptions,
}

pub fn run(args: DetectArgs) -> anyhow::Result<()> {
    let config = args.options.detector_config()?;
    let library = args.options.load_library()?;
    let (samples, spec) = read_wav(&args.input)?;

    let interval_ms = config.analysis_interval_ms;
    let chunk_len = ((u64::from(spec.sample_rate) * interval_ms) / 1000).max(1) as usize;

    if !args.options.json {
        println!(
            "Scanning {} ({:.2}s) for {} sound(s), threshold {:.2}",
            args.input.display(),
            samples.len() as f64 / f64::from(spec.sample_rate.max(1)),
            library.len(),
            config.threshold
        );
    }

    let clock = ManualClock::new(0);
    let mut analyzer = LiveAnalyzer::with_clock(config, clock.clone())?;
    analyzer.start();

    let pb = if args.options.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(samples.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (i, block) in samples.chunks(chunk_len).enumerate() {
        // Each tick happens when its chunk has fully arrived
        clock.set(((i as u64 + 1) * interval_ms) as i64);

        let chunk = AudioChunk::new(block.to_vec(), spec.sample_rate);
        match analyzer.tick(&chunk, &library)? {
            TickOutcome::Detected(event) => {
                let prefix = format!("[{}] ", format_offset(event.timestamp));
                pb.suspend(|| args.options.print_event(&event, &prefix))?;
                *counts.entry(event.sound_id).or_default() += 1;
            }
            outcome => tracing::trace!(?outcome, "tick"),
        }
        pb.inc(block.len() as u64);
    }
    pb.finish_and_clear();
    analyzer.stop();

    if !args.options.json {
        println!();
        if counts.is_empty() {
            println!("No sounds detected.");
        } else {
            println!("Detections:");
            for (id, count) in &counts {
                println!("  {id}: {count}");
            }
        }
    }

    Ok(())
}
