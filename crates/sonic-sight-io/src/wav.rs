//! WAV file reading and writing.
//!
//! Everything decodes to mono `f32`: multi-channel audio is averaged and
//! integer PCM is scaled by `2^(bits-1)`.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use sonic_sight_analysis::{AudioChunk, Signature};
use std::io::{Cursor, Read};
use std::path::Path;

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// True for IEEE float samples, false for integer PCM.
    pub is_float: bool,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        is_float: spec.sample_format == SampleFormat::Float,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate.max(1)),
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample; 32 is written as float, anything else as PCM.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Full-scale value for integer PCM of `bits` bits.
fn int_scale(bits: u16) -> f32 {
    (1u64 << bits.saturating_sub(1).min(63)) as f32
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<(Vec<f32>, WavSpec)> {
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    // Mix down to mono if multi-channel
    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}

/// Read a WAV file as mono `f32` samples along with its spec.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    decode(WavReader::open(path)?)
}

/// Decode an in-memory WAV blob as mono `f32` samples.
///
/// Malformed or unsupported containers fail with [`Error::Decode`].
pub fn decode_wav(bytes: &[u8]) -> Result<AudioChunk> {
    let (samples, spec) = decode(WavReader::new(Cursor::new(bytes))?)?;
    Ok(AudioChunk::new(samples, spec.sample_rate))
}

/// Write mono samples to a WAV file.
///
/// With `spec.channels > 1` every sample is duplicated across channels.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec).map_err(Error::Encode)?;
    let channels = spec.channels.max(1);

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            for _ in 0..channels {
                writer.write_sample(sample).map_err(Error::Encode)?;
            }
        }
    } else {
        let max_val = int_scale(spec.bits_per_sample);
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            for _ in 0..channels {
                writer.write_sample(int_sample).map_err(Error::Encode)?;
            }
        }
    }

    writer.finalize().map_err(Error::Encode)?;
    Ok(())
}

/// Fingerprint a WAV file.
///
/// # Errors
///
/// [`Error::Decode`] for a malformed file, [`Error::Analysis`] when it
/// contains no audio.
pub fn signature_from_wav<P: AsRef<Path>>(path: P) -> Result<Signature> {
    let (samples, spec) = read_wav(path)?;
    tracing::debug!(
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        "fingerprinting WAV file"
    );
    Ok(Signature::from_samples(&samples, spec.sample_rate)?)
}

/// Fingerprint an in-memory WAV blob.
pub fn signature_from_wav_bytes(bytes: &[u8]) -> Result<Signature> {
    let chunk = decode_wav(bytes)?;
    Ok(Signature::from_samples(&chunk.samples, chunk.sample_rate)?)
}
