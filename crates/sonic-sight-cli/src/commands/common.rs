//! Shared helpers for CLI commands.

use anyhow::Context;
use clap::Args;
use sonic_sight_analysis::Signature;
use sonic_sight_config::{DetectorConfig, Sensitivity, Settings, settings_path, user_library_dir};
use sonic_sight_detect::{CalibratedSound, DetectionEvent, load_library};
use std::path::{Path, PathBuf};

/// Options shared by the commands that run the live analyzer.
#[derive(Args, Debug, Clone)]
pub struct DetectorOptions {
    /// Sound library directory (defaults to the user library)
    #[arg(long, value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Settings file (defaults to the user settings file)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sensitivity 0-100, overrides the settings file
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub sensitivity: Option<u8>,

    /// Print detections as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl DetectorOptions {
    /// Library directory to read sounds from.
    pub fn library_dir(&self) -> PathBuf {
        library_dir(self.library.as_deref())
    }

    /// Effective detector configuration.
    ///
    /// An explicit `--config` must exist; the default settings file may not.
    pub fn detector_config(&self) -> anyhow::Result<DetectorConfig> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::load_or_default(settings_path())?,
        };
        if let Some(value) = self.sensitivity {
            settings = settings.with_sensitivity(Sensitivity::new(value)?);
        }
        Ok(settings.detector_config())
    }

    /// Load the library, failing when nothing in it can be matched.
    pub fn load_library(&self) -> anyhow::Result<Vec<CalibratedSound>> {
        let dir = self.library_dir();
        let library = load_library(&dir);
        let matchable = library.iter().filter(|s| s.is_matchable()).count();
        if matchable == 0 {
            anyhow::bail!(
                "No calibrated sounds in {}. Run `sonic-sight calibrate` first",
                dir.display()
            );
        }
        tracing::debug!(
            sounds = library.len(),
            matchable,
            dir = %dir.display(),
            "library loaded"
        );
        Ok(library)
    }

    /// Print one detection in the selected format.
    pub fn print_event(&self, event: &DetectionEvent, prefix: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{prefix}{event}");
        }
        Ok(())
    }
}

/// `--library` if given, else the user library.
pub fn library_dir(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(user_library_dir, Path::to_path_buf)
}

/// Load a fingerprint from a WAV file, a calibrated sound JSON or a bare
/// signature JSON.
pub fn load_signature(path: &Path) -> anyhow::Result<Signature> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if !is_json {
        return sonic_sight_io::signature_from_wav(path)
            .with_context(|| format!("failed to fingerprint {}", path.display()));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if let Ok(sound) = serde_json::from_str::<CalibratedSound>(&content) {
        return sound
            .signature
            .with_context(|| format!("sound '{}' has not been calibrated", sound.id));
    }
    Signature::from_json(&content)
        .with_context(|| format!("{} is neither a sound nor a signature", path.display()))
}

/// Library identifier derived from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "sound".to_string()
    } else {
        slug.to_string()
    }
}

/// Reject identifiers that would escape the library directory.
pub fn check_sound_id(id: &str) -> anyhow::Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        anyhow::bail!("Invalid sound id '{id}': use letters, digits, '-' and '_'");
    }
    Ok(())
}

/// `mm:ss.mmm` for a millisecond offset.
pub fn format_offset(ms: i64) -> String {
    let ms = ms.max(0);
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}
