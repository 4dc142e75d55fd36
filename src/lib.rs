//! # timelapse
//!
//! Assemble a directory of numbered still images into a time-lapse video,
//! holding a closing frame at the end.
//!
//! Frames named `image_0001.png`, `image_0002.png`, … are discovered,
//! ordered by their sequence number and encoded with FFmpeg (via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)) at a frame rate
//! chosen so the sequence plays for a target number of seconds. A closing
//! image is then repeated for a hold duration before the file is finalized.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use timelapse::{InputProfile, TimelapseAssembler, TimelapseConfig};
//!
//! let config = TimelapseConfig::from_profile(Path::new("renders"), InputProfile::Rendered)
//!     .unwrap()
//!     .with_video_length(7.0)
//!     .with_hold_seconds(4.0);
//! let report = TimelapseAssembler::new(config).run().unwrap();
//! println!("wrote {:?}", report.output_path);
//! ```
//!
//! ## Timing
//!
//! With `n` frames and a target length of `L` seconds the frame rate is
//! `floor(n / L)`; the closing image is written `floor(hold * rate)` times.
//! 140 frames over 7 seconds give 20 fps, and a 4 second hold adds 80
//! frames for 220 in total.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod assembler;
pub mod configuration;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod sequence;
pub mod sink;
pub mod timing;

pub use assembler::{AssemblyReport, TimelapseAssembler, decode_image};
pub use configuration::{
    DEFAULT_HOLD_IMAGE_NAME, DEFAULT_OUTPUT_FILE_NAME, HoldFrameSource, InputProfile,
    TimelapseConfig,
};
pub use encode::{EncoderSettings, VideoCodec, VideoEncoder};
pub use error::TimelapseError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use sequence::{FramePattern, ImageSequence, SequenceEntry};
pub use sink::FrameSink;
pub use timing::Timing;
