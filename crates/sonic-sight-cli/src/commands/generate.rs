//! Test signal generation command.

use clap::{Args, Subcommand};
use sonic_sight_io::{WavSpec, write_wav};
use std::f32::consts::PI;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Args)]
struct SignalArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Amplitude (0-1)
    #[arg(long, default_value = "0.5")]
    amplitude: f32,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Sine {
        #[command(flatten)]
        signal: SignalArgs,

        /// Frequency in Hz
        #[arg(long, default_value = "1000.0")]
        freq: f32,
    },

    /// Generate white noise
    Noise {
        #[command(flatten)]
        signal: SignalArgs,

        /// Random seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Generate digital silence
    Silence {
        #[command(flatten)]
        signal: SignalArgs,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (signal, samples, label) = match args.command {
        GenerateCommand::Sine { signal, freq } => {
            let samples = sine(freq, &signal);
            (signal, samples, format!("{freq} Hz sine"))
        }
        GenerateCommand::Noise { signal, seed } => {
            let samples = noise(seed, &signal);
            (signal, samples, "white noise".to_string())
        }
        GenerateCommand::Silence { signal } => {
            let samples = vec![0.0; sample_count(&signal)];
            (signal, samples, "silence".to_string())
        }
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate,
        bits_per_sample: 16,
    };
    write_wav(&signal.output, &samples, spec)?;

    println!(
        "Wrote {} ({:.2}s, {} samples) to {}",
        label,
        signal.duration,
        samples.len(),
        signal.output.display()
    );
    Ok(())
}

fn sample_count(signal: &SignalArgs) -> usize {
    (signal.duration.max(0.0) * signal.sample_rate as f32) as usize
}

fn sine(freq: f32, signal: &SignalArgs) -> Vec<f32> {
    let sr = signal.sample_rate as f32;
    (0..sample_count(signal))
        .map(|i| signal.amplitude * (2.0 * PI * freq * i as f32 / sr).sin())
        .collect()
}

/// Uniform white noise from a xorshift64 generator.
fn noise(seed: u64, signal: &SignalArgs) -> Vec<f32> {
    let mut state = seed.max(1);
    (0..sample_count(signal))
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            signal.amplitude * (unit * 2.0 - 1.0)
        })
        .collect()
}
