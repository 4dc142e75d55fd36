//! The time-lapse assembly pipeline.
//!
//! [`TimelapseAssembler::run`] performs the whole conversion in one
//! synchronous pass:
//!
//! 1. list the input directory and keep the files matching the pattern,
//! 2. order them by sequence number,
//! 3. decode the first frame to fix the output geometry,
//! 4. derive the frame rate from the frame count and target length,
//! 5. open the encoder,
//! 6. write every frame in order,
//! 7. write the closing image `floor(hold_seconds * frame_rate)` times,
//! 8. finalize the container.
//!
//! Every step is fail-fast. If a step fails after the encoder is open, the
//! encoder is still released so the partial file is a valid container.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use timelapse::{InputProfile, TimelapseAssembler, TimelapseConfig, TimelapseError};
//!
//! let config = TimelapseConfig::from_profile(Path::new("renders"), InputProfile::Shuffle)?;
//! let report = TimelapseAssembler::new(config).run()?;
//! println!("{} frames at {} fps", report.total_frames(), report.frame_rate);
//! # Ok::<(), TimelapseError>(())
//! ```

use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::imageops::FilterType;

use crate::configuration::{HoldFrameSource, TimelapseConfig};
use crate::encode::{EncoderSettings, VideoEncoder};
use crate::error::TimelapseError;
use crate::sequence::ImageSequence;
use crate::sink::FrameSink;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Path of the written video.
    pub output_path: PathBuf,
    /// Frame width, taken from the first frame of the sequence.
    pub width: u32,
    /// Frame height, taken from the first frame of the sequence.
    pub height: u32,
    /// Output frames per second.
    pub frame_rate: u32,
    /// Frames written from the image sequence.
    pub sequence_frames: u64,
    /// Copies of the closing image appended after the sequence.
    pub hold_frames: u64,
}

impl AssemblyReport {
    /// Every frame written to the encoder.
    pub fn total_frames(&self) -> u64 {
        self.sequence_frames + self.hold_frames
    }
}

/// Turns a directory of numbered images into a video.
pub struct TimelapseAssembler {
    config: TimelapseConfig,
}

impl TimelapseAssembler {
    /// Create an assembler for `config`.
    pub fn new(config: TimelapseConfig) -> Self {
        Self { config }
    }

    /// The configuration this assembler runs with.
    pub fn config(&self) -> &TimelapseConfig {
        &self.config
    }

    /// Run the pipeline, encoding with FFmpeg.
    ///
    /// # Errors
    ///
    /// Any [`TimelapseError`]; see [`run_with`](Self::run_with).
    pub fn run(&self) -> Result<AssemblyReport, TimelapseError> {
        self.run_with(VideoEncoder::open)
    }

    /// Run the pipeline against a caller-supplied sink.
    ///
    /// `open_sink` is called exactly once, after the frame geometry and rate
    /// are known, and never if discovery, the first decode or the rate
    /// computation fails.
    ///
    /// # Errors
    ///
    /// - [`TimelapseError::InvalidConfiguration`] for bad timing values, or a
    ///   derived frame rate above `i32::MAX`.
    /// - [`TimelapseError::DirectoryNotFound`] / [`TimelapseError::NoMatchingFiles`]
    ///   from discovery.
    /// - [`TimelapseError::DecodeFailure`] for the first unreadable image.
    /// - [`TimelapseError::FrameRateTooLow`] when there are fewer frames than
    ///   seconds of video.
    /// - Whatever `open_sink` or the sink itself returns.
    pub fn run_with<S, F>(&self, open_sink: F) -> Result<AssemblyReport, TimelapseError>
    where
        S: FrameSink,
        F: FnOnce(&EncoderSettings) -> Result<S, TimelapseError>,
    {
        let config = &self.config;
        let timing = config.timing;
        timing.validate()?;

        let sequence = ImageSequence::discover(&config.input_directory, &config.pattern)?;
        let first_entry = sequence
            .first()
            .ok_or_else(|| TimelapseError::NoMatchingFiles {
                directory: config.input_directory.clone(),
                pattern: config.pattern.to_string(),
            })?;

        let first_frame = decode_image(&first_entry.path)?;
        let (width, height) = (first_frame.width(), first_frame.height());
        log::debug!("Geometry {width}x{height} from {:?}", first_entry.path);

        let frame_rate = timing.frame_rate(sequence.len());
        if frame_rate == 0 {
            return Err(TimelapseError::FrameRateTooLow {
                frame_count: sequence.len(),
                video_length_seconds: timing.video_length_seconds,
            });
        }
        if i32::try_from(frame_rate).is_err() {
            return Err(TimelapseError::InvalidConfiguration(format!(
                "{} frames over {}s gives {frame_rate} fps, more than FFmpeg can represent",
                sequence.len(),
                timing.video_length_seconds,
            )));
        }
        let hold_frames = timing.hold_frame_count(frame_rate);
        log::info!(
            "{} frames over {}s -> {} fps, holding closing frame for {} frames",
            sequence.len(), timing.video_length_seconds, frame_rate, hold_frames,
        );

        let settings = EncoderSettings {
            output_path: config.output_path.clone(),
            width,
            height,
            frame_rate,
            codec: config.codec,
        };
        let mut sink = open_sink(&settings)?;

        let mut pending_first = Some(first_frame);
        for entry in sequence.entries() {
            let frame = match pending_first.take() {
                Some(frame) => frame,
                None => decode_image(&entry.path)?,
            };
            log::debug!("Writing {}", entry.file_name);
            sink.write_frame(&fit_to_geometry(frame, width, height, &entry.path))?;
        }

        if hold_frames > 0 {
            let hold_path = match &config.hold_frame {
                HoldFrameSource::Image(path) => path.as_path(),
                HoldFrameSource::LastInSequence => sequence
                    .last()
                    .map(|entry| entry.path.as_path())
                    .unwrap_or(first_entry.path.as_path()),
            };
            log::debug!("Holding {hold_path:?} for {hold_frames} frames");
            let hold_frame = fit_to_geometry(decode_image(hold_path)?, width, height, hold_path);
            sink.write_repeated(&hold_frame, hold_frames)?;
        }

        sink.finish()?;

        Ok(AssemblyReport {
            output_path: settings.output_path,
            width,
            height,
            frame_rate,
            sequence_frames: sequence.len() as u64,
            hold_frames,
        })
    }
}

/// Read and decode one image file.
///
/// # Errors
///
/// [`TimelapseError::DecodeFailure`] carrying `path` if the file is missing,
/// unreadable, or not a decodable image.
pub fn decode_image(path: &Path) -> Result<DynamicImage, TimelapseError> {
    image::open(path).map_err(|e| TimelapseError::DecodeFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Resize frames that disagree with the sequence geometry.
fn fit_to_geometry(frame: DynamicImage, width: u32, height: u32, path: &Path) -> DynamicImage {
    if frame.width() == width && frame.height() == height {
        return frame;
    }
    log::warn!(
        "{path:?} is {}x{}, resizing to {width}x{height}",
        frame.width(),
        frame.height(),
    );
    frame.resize_exact(width, height, FilterType::Lanczos3)
}
