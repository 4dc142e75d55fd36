//! The seam between the assembly pipeline and the video encoder.
//!
//! [`TimelapseAssembler`](crate::TimelapseAssembler) only talks to a
//! [`FrameSink`]. The production sink is [`VideoEncoder`](crate::VideoEncoder);
//! tests substitute a recording sink to observe exactly which frames the
//! pipeline emits.

use image::DynamicImage;

use crate::error::TimelapseError;

/// Receives frames in playback order and finalizes the output.
pub trait FrameSink {
    /// Append one frame.
    fn write_frame(&mut self, frame: &DynamicImage) -> Result<(), TimelapseError>;

    /// Append the same frame `count` times.
    fn write_repeated(&mut self, frame: &DynamicImage, count: u64) -> Result<(), TimelapseError> {
        for _ in 0..count {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    /// Flush and close the output. Called once, after the last frame.
    fn finish(self) -> Result<(), TimelapseError>
    where
        Self: Sized;
}
