//! Microphone capture over cpal.
//!
//! The input callback mixes every hardware buffer down to mono and appends it
//! to a shared ring that holds the most recent [`DEFAULT_RING_SAMPLES`]
//! samples. The analysis loop drains the ring once per tick with
//! [`MicCapture::take_chunk`], so a slow tick loses the oldest audio rather
//! than stalling the audio thread.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};
use parking_lot::Mutex;
use sonic_sight_analysis::AudioChunk;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Samples kept between ticks (about 0.7 s at 44.1 kHz).
pub const DEFAULT_RING_SAMPLES: usize = 32768;

fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// An available capture device.
#[derive(Debug, Clone)]
pub struct InputDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
    /// True for the host's default input.
    pub is_default: bool,
}

/// List the input devices of the default host.
pub fn list_input_devices() -> Result<Vec<InputDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| device_name(&d).ok());

    let devices = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    let mut found = Vec::new();
    for device in devices {
        let Ok(name) = device_name(&device) else {
            continue;
        };
        let (default_sample_rate, channels) = device
            .default_input_config()
            .map(|c| (c.sample_rate(), c.channels()))
            .unwrap_or((48000, 1));
        let is_default = default_name.as_deref() == Some(name.as_str());
        found.push(InputDevice {
            name,
            default_sample_rate,
            channels,
            is_default,
        });
    }
    Ok(found)
}

/// Find an input device by index or case-insensitive partial name.
fn find_input_device(host: &Host, search: &str) -> Result<Device> {
    let devices: Vec<Device> = host
        .input_devices()
        .map_err(|e| Error::Stream(e.to_string()))?
        .collect();

    if let Ok(index) = search.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "input device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    let search_lower = search.to_lowercase();
    devices
        .into_iter()
        .find(|device| {
            device_name(device)
                .map(|name| name.to_lowercase().contains(search_lower.as_str()))
                .unwrap_or(false)
        })
        .ok_or_else(|| Error::DeviceNotFound(search.to_string()))
}

/// Mono ring shared between the audio callback and the analysis loop.
#[derive(Debug)]
struct SampleRing {
    samples: Mutex<VecDeque<f32>>,
    capacity: usize,
    overflowed: AtomicU64,
}

impl SampleRing {
    fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            overflowed: AtomicU64::new(0),
        }
    }

    /// Append interleaved frames, averaging channels.
    fn push_interleaved(&self, data: &[f32], channels: usize) {
        let channels = channels.max(1);
        let mut ring = self.samples.lock();
        for frame in data.chunks(channels) {
            ring.push_back(frame.iter().sum::<f32>() / frame.len() as f32);
        }
        let excess = ring.len().saturating_sub(self.capacity);
        if excess > 0 {
            ring.drain(..excess);
            self.overflowed.fetch_add(excess as u64, Ordering::Relaxed);
        }
    }

    fn drain(&self) -> Vec<f32> {
        self.samples.lock().drain(..).collect()
    }
}

/// A running microphone stream.
///
/// Capture stops when the value is dropped.
pub struct MicCapture {
    stream: Option<Stream>,
    ring: Arc<SampleRing>,
    sample_rate: u32,
    channels: u16,
    device_name: String,
}

impl MicCapture {
    /// Open `device` (index or partial name), or the default input.
    pub fn open(device: Option<&str>) -> Result<Self> {
        Self::open_with_capacity(device, DEFAULT_RING_SAMPLES)
    }

    /// Open with an explicit ring size in samples.
    pub fn open_with_capacity(device: Option<&str>, capacity: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device {
            Some(search) => find_input_device(&host, search)?,
            None => host.default_input_device().ok_or(Error::NoDevice)?,
        };
        let name = device_name(&device).unwrap_or_else(|_| "unknown".to_string());

        let config = device
            .default_input_config()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let sample_rate = config.sample_rate();
        let channels = config.channels();

        let ring = Arc::new(SampleRing::new(capacity.max(1)));
        let callback_ring = Arc::clone(&ring);
        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    callback_ring.push_interleaved(data, usize::from(channels));
                },
                |err| tracing::error!(error = %err, "input stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;
        stream.play().map_err(|e| Error::Stream(e.to_string()))?;

        tracing::info!(
            device = %name,
            channels,
            sample_rate,
            "input stream started"
        );

        Ok(Self {
            stream: Some(stream),
            ring,
            sample_rate,
            channels,
            device_name: name,
        })
    }

    /// Everything captured since the previous call, as one mono chunk.
    pub fn take_chunk(&self) -> AudioChunk {
        AudioChunk::new(self.ring.drain(), self.sample_rate)
    }

    /// Stream sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Hardware channel count before mixdown.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Name of the open device.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Samples discarded because the ring was full between drains.
    pub fn overflowed_samples(&self) -> u64 {
        self.ring.overflowed.load(Ordering::Relaxed)
    }

    /// True until [`stop`](Self::stop) is called.
    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Release the device. Later [`take_chunk`](Self::take_chunk) calls
    /// return whatever was left in the ring, then empty chunks.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::info!(device = %self.device_name, "input stream stopped");
        }
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
