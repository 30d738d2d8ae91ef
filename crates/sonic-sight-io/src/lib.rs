//! Audio I/O for sonic-sight.
//!
//! Turns encoded recordings and live microphone input into the mono `f32`
//! buffers the analysis core consumes.
//!
//! - [`wav`] - WAV decode/encode, with [`signature_from_wav`] for calibration
//! - [`capture`] - [`MicCapture`], a cpal input stream drained once per tick

pub mod capture;
pub mod wav;

pub use capture::{InputDevice, MicCapture, list_input_devices};
pub use wav::{
    WavInfo, WavSpec, decode_wav, read_wav, read_wav_info, signature_from_wav,
    signature_from_wav_bytes, write_wav,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The audio container is malformed or unsupported.
    #[error("could not decode audio: {0}")]
    Decode(#[from] hound::Error),

    /// Writing a WAV file failed.
    #[error("could not encode audio: {0}")]
    Encode(#[source] hound::Error),

    /// Decoded audio could not be fingerprinted.
    #[error("analysis error: {0}")]
    Analysis(#[from] sonic_sight_analysis::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
