//! Settings file inspection and creation.

use clap::{Args, Subcommand};
use sonic_sight_config::{Sensitivity, Settings, settings_path, user_library_dir};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Settings file (defaults to the user settings file)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Write a settings file with default values
    Init {
        /// Initial sensitivity 0-100
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        sensitivity: Option<u8>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = args.config.unwrap_or_else(settings_path);

    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => {
            let exists = path.exists();
            let settings = Settings::load_or_default(&path)?;
            let detector = settings.detector_config();

            println!(
                "# {}{}",
                path.display(),
                if exists { "" } else { " (not found, defaults)" }
            );
            println!("# library: {}", user_library_dir().display());
            println!("# effective threshold: {:.2}", detector.threshold);
            println!();
            print!("{}", settings.to_toml()?);
        }

        ConfigCommand::Init { sensitivity, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; use --force to overwrite",
                    path.display()
                );
            }

            let mut settings = Settings::default();
            if let Some(value) = sensitivity {
                settings = settings.with_sensitivity(Sensitivity::new(value)?);
            }
            settings.save(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
