//! Platform-specific paths for settings and the calibrated sound library.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/sonic-sight/` (Linux), `~/Library/Application Support/sonic-sight/` (macOS), `%APPDATA%\sonic-sight\` (Windows)
//! - **Settings file**: `<user config>/settings.toml`
//! - **Sound library**: `<user config>/sounds/`, one `<id>.json` per calibrated sound
//!
//! # Example
//!
//! ```rust,no_run
//! use sonic_sight_config::paths;
//!
//! for file in paths::list_library_files(&paths::user_library_dir()) {
//!     println!("{:?}", paths::sound_id_from_path(&file));
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "sonic-sight";

/// Subdirectory name for calibrated sounds.
const LIBRARY_SUBDIR: &str = "sounds";

/// File name of the settings file.
const SETTINGS_FILE: &str = "settings.toml";

/// Extension of calibrated sound files.
pub const SOUND_EXTENSION: &str = "json";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Returns the directory holding calibrated sounds.
pub fn user_library_dir() -> PathBuf {
    user_config_dir().join(LIBRARY_SUBDIR)
}

/// Ensure `dir` exists, creating parents as needed.
pub fn ensure_dir(dir: impl Into<PathBuf>) -> Result<PathBuf, crate::ConfigError> {
    let dir = dir.into();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List calibrated sound files (`*.json`) in `dir`, sorted by name.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_library_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == SOUND_EXTENSION)
        })
        .collect();
    files.sort();
    files
}

/// Path of the file for sound `id` inside `dir`.
pub fn sound_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{SOUND_EXTENSION}"))
}

/// Get the sound identifier from a library file path (the file stem).
///
/// ```rust
/// use sonic_sight_config::paths::sound_id_from_path;
/// use std::path::Path;
///
/// let id = sound_id_from_path(Path::new("/library/doorbell.json"));
/// assert_eq!(id, Some("doorbell".to_string()));
/// ```
pub fn sound_id_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
