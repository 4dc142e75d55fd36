//! Frame-rate and hold-duration arithmetic.
//!
//! The output frame rate is not configured directly. It is derived so that
//! the whole sequence plays in roughly `video_length_seconds`, truncating
//! toward zero, and the closing frame is then repeated for
//! `last_frame_seconds` at that rate.

use crate::error::TimelapseError;

/// Default target duration of the sequence, excluding the hold.
pub const DEFAULT_VIDEO_LENGTH_SECONDS: f64 = 7.0;

/// Default hold duration of the closing frame.
pub const DEFAULT_LAST_FRAME_SECONDS: f64 = 4.0;

/// Timing parameters for a time-lapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Target playback length of the image sequence in seconds.
    pub video_length_seconds: f64,
    /// How long the closing frame is held, in seconds.
    pub last_frame_seconds: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            video_length_seconds: DEFAULT_VIDEO_LENGTH_SECONDS,
            last_frame_seconds: DEFAULT_LAST_FRAME_SECONDS,
        }
    }
}

impl Timing {
    /// Create timing parameters.
    pub fn new(video_length_seconds: f64, last_frame_seconds: f64) -> Self {
        Self {
            video_length_seconds,
            last_frame_seconds,
        }
    }

    /// Reject non-finite, non-positive lengths and negative holds.
    pub fn validate(&self) -> Result<(), TimelapseError> {
        if !self.video_length_seconds.is_finite() || self.video_length_seconds <= 0.0 {
            return Err(TimelapseError::InvalidConfiguration(format!(
                "video length must be a positive number of seconds, got {}",
                self.video_length_seconds,
            )));
        }
        if !self.last_frame_seconds.is_finite() || self.last_frame_seconds < 0.0 {
            return Err(TimelapseError::InvalidConfiguration(format!(
                "hold duration must be zero or more seconds, got {}",
                self.last_frame_seconds,
            )));
        }
        Ok(())
    }

    /// `floor(frame_count / video_length_seconds)`.
    ///
    /// Zero when there are fewer frames than seconds.
    pub fn frame_rate(&self, frame_count: usize) -> u32 {
        (frame_count as f64 / self.video_length_seconds).floor() as u32
    }

    /// `floor(last_frame_seconds * frame_rate)`.
    pub fn hold_frame_count(&self, frame_rate: u32) -> u64 {
        (self.last_frame_seconds * frame_rate as f64).floor() as u64
    }

    /// Frames written in total: the sequence plus the hold.
    pub fn total_frames(&self, frame_count: usize) -> u64 {
        frame_count as u64 + self.hold_frame_count(self.frame_rate(frame_count))
    }
}
