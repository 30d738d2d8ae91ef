//! Sonic Sight Detect - continuous recognition of calibrated household sounds
//!
//! Builds on [`sonic_sight_analysis`] to run matching against a live stream:
//!
//! - [`analyzer`] - [`LiveAnalyzer`] and its per-tick [`TickOutcome`]
//! - [`buffer`] - Bounded rolling [`FrameBuffer`] of recent MFCC frames
//! - [`matching`] - Scoring the buffer against each calibrated sound
//! - [`sound`] - [`CalibratedSound`] and the on-disk library
//! - [`event`] - [`DetectionEvent`], what consumers receive
//! - [`clock`] - Wall-clock and manual time sources for cooldowns
//!
//! ## Running a session
//!
//! ```rust,ignore
//! use sonic_sight_config::DetectorConfig;
//! use sonic_sight_detect::{LiveAnalyzer, load_library};
//!
//! let library = load_library(sonic_sight_config::user_library_dir());
//! let mut analyzer = LiveAnalyzer::new(DetectorConfig::default())?;
//! analyzer.start();
//!
//! loop {
//!     let chunk = capture.take_chunk();
//!     if let Some(event) = analyzer.tick(&chunk, &library)?.event() {
//!         println!("{event}");
//!     }
//!     std::thread::sleep(analyzer.config().analysis_interval());
//! }
//! ```

pub mod analyzer;
pub mod buffer;
pub mod clock;
pub mod error;
pub mod event;
pub mod matching;
pub mod sound;

pub use analyzer::{LiveAnalyzer, LiveAnalyzerState, MIN_BUFFERED_FRAMES, TickOutcome};
pub use buffer::{FRAME_BUFFER_CAPACITY, FrameBuffer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use event::DetectionEvent;
pub use matching::{SoundScore, best_match_from_buffer, score_buffer};
pub use sound::{CalibratedSound, load_library};
