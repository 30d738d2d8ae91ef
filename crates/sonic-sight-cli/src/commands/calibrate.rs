//! Calibration: fingerprint a recording and store it in the library.

use super::common::{check_sound_id, library_dir, slugify};
use clap::Args;
use sonic_sight_analysis::compare::MIN_DTW_FRAMES;
use sonic_sight_config::paths::{ensure_dir, sound_path};
use sonic_sight_detect::CalibratedSound;
use sonic_sight_io::{read_wav_info, signature_from_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct CalibrateArgs {
    /// Recording of the sound (WAV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Display name, e.g. "Doorbell"
    #[arg(long)]
    name: String,

    /// Display color
    #[arg(long, default_value = "#4ecdc4")]
    color: String,

    /// Library identifier (derived from the name if omitted)
    #[arg(long)]
    id: Option<String>,

    /// Sound library directory (defaults to the user library)
    #[arg(long, value_name = "DIR")]
    library: Option<PathBuf>,

    /// Replace an existing sound with the same id
    #[arg(long)]
    force: bool,
}

pub fn run(args: CalibrateArgs) -> anyhow::Result<()> {
    let id = args.id.clone().unwrap_or_else(|| slugify(&args.name));
    check_sound_id(&id)?;

    let dir = ensure_dir(library_dir(args.library.as_deref()))?;
    if !args.force && sound_path(&dir, &id).exists() {
        anyhow::bail!("Sound '{id}' already exists; use --force to replace it");
    }

    let info = read_wav_info(&args.input)?;
    let signature = signature_from_wav(&args.input)?;

    println!("Calibrating '{}' from {}", args.name, args.input.display());
    println!(
        "  {:.2}s at {} Hz, {} frames",
        info.duration_secs,
        info.sample_rate,
        signature.frame_count()
    );

    if signature.frame_count() < MIN_DTW_FRAMES {
        println!(
            "  Warning: recording is too short to be matched live (need at least {} frames)",
            MIN_DTW_FRAMES
        );
    }

    let sound = CalibratedSound::new(&id, &args.name, &args.color).with_signature(signature);
    let path = sound.save_to_dir(&dir)?;
    tracing::info!(id = %id, path = %path.display(), "sound calibrated");

    println!("Saved {}", path.display());
    Ok(())
}
