//! Error types for the `timelapse` crate.
//!
//! This module defines [`TimelapseError`], the unified error type returned by
//! every fallible operation in the crate. Each variant names the offending
//! path or parameter so a failed run can be diagnosed from the message alone.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `timelapse` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimelapseError {
    /// The input directory does not exist or could not be listed.
    #[error("Input directory not found at {path}: {reason}")]
    DirectoryNotFound {
        /// Directory that was passed in the configuration.
        path: PathBuf,
        /// Underlying reason the listing failed.
        reason: String,
    },

    /// The input directory contains no file matching the frame pattern.
    #[error("No files matching {pattern} found in {directory}")]
    NoMatchingFiles {
        /// Directory that was searched.
        directory: PathBuf,
        /// Human-readable form of the pattern, e.g. `image_NNNN.png`.
        pattern: String,
    },

    /// An image file could not be read or decoded.
    #[error("Failed to decode image at {path}: {reason}")]
    DecodeFailure {
        /// Path of the image that failed.
        path: PathBuf,
        /// Upstream decoder message.
        reason: String,
    },

    /// The computed frame rate is zero because there are fewer frames than
    /// seconds of target video.
    #[error(
        "Frame rate would be zero: {frame_count} frames cannot fill {video_length_seconds}s of video"
    )]
    FrameRateTooLow {
        /// Number of frames discovered.
        frame_count: usize,
        /// Requested video length, excluding the hold.
        video_length_seconds: f64,
    },

    /// The video encoder or output container could not be opened.
    #[error("Failed to open encoder for {path}: {reason}")]
    EncoderOpenFailure {
        /// Output path.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// A frame could not be encoded or written, or the output could not be
    /// finalized.
    #[error("Failed to write frame {frame_index} to {path}: {reason}")]
    EncoderWriteFailure {
        /// Output path.
        path: PathBuf,
        /// Zero-based index of the frame being written.
        frame_index: u64,
        /// Underlying reason.
        reason: String,
    },

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested codec tag is not recognised.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// An I/O error occurred while reading the input directory.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}
