//! Assembly configuration.
//!
//! [`TimelapseConfig`] is a builder carrying everything a run needs: where
//! the frames are, how they are named, where the video goes, how long it
//! plays, which codec it uses and which image is held at the end.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use timelapse::{HoldFrameSource, InputProfile, TimelapseConfig, TimelapseError, VideoCodec};
//!
//! let config = TimelapseConfig::from_profile(Path::new("renders"), InputProfile::Rendered)?
//!     .with_video_length(10.0)
//!     .with_hold_seconds(2.5)
//!     .with_codec(VideoCodec::H264)
//!     .with_hold_frame(HoldFrameSource::LastInSequence);
//! # Ok::<(), TimelapseError>(())
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::encode::VideoCodec;
use crate::error::TimelapseError;
use crate::sequence::FramePattern;
use crate::timing::Timing;

/// File name of the video written into the input directory by default.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "time_lapse_video.mp4";

/// File name of the closing image read from the input directory by default.
pub const DEFAULT_HOLD_IMAGE_NAME: &str = "image.png";

/// Literal prefix of every frame file name.
pub const DEFAULT_FRAME_PREFIX: &str = "image_";

/// Width of the zero-padded sequence number.
pub const DEFAULT_FRAME_DIGITS: usize = 4;

/// Named input layouts.
///
/// A profile pins the sub-directory (relative to a root) and the frame file
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputProfile {
    /// Shuffled render passes: `<root>/shuffle/image_NNNN.bmp`.
    #[default]
    Shuffle,
    /// Final renders: `<root>/image_NNNN.png`.
    Rendered,
}

impl InputProfile {
    /// Directory holding this profile's frames.
    pub fn directory(self, root: &Path) -> PathBuf {
        match self {
            InputProfile::Shuffle => root.join("shuffle"),
            InputProfile::Rendered => root.to_path_buf(),
        }
    }

    /// Frame file extension.
    pub fn extension(self) -> &'static str {
        match self {
            InputProfile::Shuffle => "bmp",
            InputProfile::Rendered => "png",
        }
    }

    /// `image_NNNN.<extension>`.
    pub fn pattern(self) -> Result<FramePattern, TimelapseError> {
        FramePattern::numbered(DEFAULT_FRAME_PREFIX, DEFAULT_FRAME_DIGITS, self.extension())
    }
}

impl FromStr for InputProfile {
    type Err = TimelapseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "shuffle" | "bmp" => Ok(InputProfile::Shuffle),
            "rendered" | "render" | "png" => Ok(InputProfile::Rendered),
            _ => Err(TimelapseError::InvalidConfiguration(format!(
                "unknown input profile: {value}"
            ))),
        }
    }
}

/// Where the closing frame comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldFrameSource {
    /// A separately supplied image, e.g. an end card.
    Image(PathBuf),
    /// The last file of the discovered sequence.
    LastInSequence,
}

/// Configuration for one assembly run.
#[derive(Debug, Clone)]
pub struct TimelapseConfig {
    pub(crate) input_directory: PathBuf,
    pub(crate) pattern: FramePattern,
    pub(crate) output_path: PathBuf,
    pub(crate) timing: Timing,
    pub(crate) codec: VideoCodec,
    pub(crate) hold_frame: HoldFrameSource,
}

impl TimelapseConfig {
    /// Read frames matching `pattern` from `input_directory`.
    ///
    /// The output defaults to `time_lapse_video.mp4` and the closing image to
    /// `image.png`, both inside `input_directory`.
    pub fn new(input_directory: impl Into<PathBuf>, pattern: FramePattern) -> Self {
        let input_directory = input_directory.into();
        Self {
            output_path: input_directory.join(DEFAULT_OUTPUT_FILE_NAME),
            hold_frame: HoldFrameSource::Image(input_directory.join(DEFAULT_HOLD_IMAGE_NAME)),
            input_directory,
            pattern,
            timing: Timing::default(),
            codec: VideoCodec::default(),
        }
    }

    /// Configuration for a named profile under `root`.
    pub fn from_profile(root: &Path, profile: InputProfile) -> Result<Self, TimelapseError> {
        Ok(Self::new(profile.directory(root), profile.pattern()?))
    }

    /// Set the output video path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set both timing parameters.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Set the target sequence length in seconds.
    pub fn with_video_length(mut self, seconds: f64) -> Self {
        self.timing.video_length_seconds = seconds;
        self
    }

    /// Set how long the closing frame is held, in seconds.
    pub fn with_hold_seconds(mut self, seconds: f64) -> Self {
        self.timing.last_frame_seconds = seconds;
        self
    }

    /// Set the output codec.
    pub fn with_codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Set the closing frame source.
    pub fn with_hold_frame(mut self, source: HoldFrameSource) -> Self {
        self.hold_frame = source;
        self
    }

    /// Directory the frames are read from.
    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Frame filename pattern.
    pub fn pattern(&self) -> &FramePattern {
        &self.pattern
    }

    /// Output video path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Timing parameters.
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Output codec.
    pub fn codec(&self) -> VideoCodec {
        self.codec
    }

    /// Closing frame source.
    pub fn hold_frame(&self) -> &HoldFrameSource {
        &self.hold_frame
    }
}
