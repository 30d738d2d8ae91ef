//! Sound library management.

use super::common::{check_sound_id, library_dir};
use clap::{Args, Subcommand};
use sonic_sight_config::paths::sound_path;
use sonic_sight_detect::{CalibratedSound, load_library};
use std::path::PathBuf;

#[derive(Args)]
pub struct SoundsArgs {
    /// Sound library directory (defaults to the user library)
    #[arg(long, value_name = "DIR", global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SoundsCommand>,
}

#[derive(Subcommand)]
enum SoundsCommand {
    /// List calibrated sounds
    List,

    /// Show one sound's fingerprint summary
    Show {
        /// Sound id
        id: String,
    },

    /// Delete a sound from the library
    Remove {
        /// Sound id
        id: String,
    },
}

pub fn run(args: SoundsArgs) -> anyhow::Result<()> {
    let dir = library_dir(args.library.as_deref());

    match args.command.unwrap_or(SoundsCommand::List) {
        SoundsCommand::List => {
            let sounds = load_library(&dir);
            if sounds.is_empty() {
                println!("No sounds in {}", dir.display());
                return Ok(());
            }

            println!("Calibrated Sounds ({})", dir.display());
            println!();
            println!("  {:<20} {:<20} {:<9} {:>6}  Status", "ID", "Name", "Color", "Frames");
            for sound in &sounds {
                let frames = sound.signature.as_ref().map_or(0, |s| s.frame_count());
                let status = if sound.is_matchable() {
                    "ready"
                } else if sound.signature.is_some() {
                    "too short"
                } else {
                    "uncalibrated"
                };
                println!(
                    "  {:<20} {:<20} {:<9} {:>6}  {}",
                    sound.id, sound.name, sound.color, frames, status
                );
            }
            println!();
            println!("Total: {} sound(s)", sounds.len());
        }

        SoundsCommand::Show { id } => {
            check_sound_id(&id)?;
            let sound = CalibratedSound::load(sound_path(&dir, &id))?;

            println!("{} ({})", sound.name, sound.id);
            println!("  Color: {}", sound.color);
            match &sound.signature {
                Some(signature) => {
                    println!("  Frames: {}", signature.frame_count());
                    println!("  RMS:    {:.4}", signature.rms());
                    println!("  ZCR:    {:.4}", signature.zcr());
                    let mean: Vec<String> = signature
                        .mfcc_mean()
                        .iter()
                        .map(|c| format!("{c:.1}"))
                        .collect();
                    println!("  MFCC mean: [{}]", mean.join(", "));
                    println!("  Matchable: {}", if sound.is_matchable() { "yes" } else { "no" });
                }
                None => println!("  Not calibrated"),
            }
        }

        SoundsCommand::Remove { id } => {
            check_sound_id(&id)?;
            let path = sound_path(&dir, &id);
            if !path.exists() {
                anyhow::bail!("No sound '{id}' in {}", dir.display());
            }
            std::fs::remove_file(&path)?;
            println!("Removed '{id}'");
        }
    }

    Ok(())
}
