//! FFmpeg log level configuration.
//!
//! FFmpeg prints its own warnings to stderr independently of the Rust
//! [`log`](https://crates.io/crates/log) facade. [`set_ffmpeg_log_level`]
//! tunes that output without callers having to import `ffmpeg-next`.
//!
//! ```no_run
//! use timelapse::FfmpegLogLevel;
//!
//! timelapse::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

use crate::error::TimelapseError;

/// FFmpeg internal log verbosity, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// No output at all.
    Quiet,
    /// Only conditions that abort the process.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Everything.
    Trace,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = TimelapseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "panic" => Ok(FfmpegLogLevel::Panic),
            "fatal" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "verbose" => Ok(FfmpegLogLevel::Verbose),
            "debug" => Ok(FfmpegLogLevel::Debug),
            "trace" => Ok(FfmpegLogLevel::Trace),
            _ => Err(TimelapseError::InvalidConfiguration(format!(
                "unknown FFmpeg log level: {value}"
            ))),
        }
    }
}

/// Set what FFmpeg itself prints to stderr.
///
/// Does not affect messages emitted through the `log` crate.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
