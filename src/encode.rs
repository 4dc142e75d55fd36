//! Video encoder — stream frames into an MP4 file.
//!
//! [`VideoEncoder`] is opened once the output geometry is known, receives
//! frames one at a time, and is released exactly once: either explicitly via
//! [`FrameSink::finish`] or, on an early error, when it is dropped. Either
//! way the encoder is flushed and the container trailer is written.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use timelapse::{EncoderSettings, FrameSink, TimelapseError, VideoCodec, VideoEncoder};
//!
//! let frame = image::open("image_0001.png").unwrap();
//! let settings = EncoderSettings {
//!     output_path: PathBuf::from("out.mp4"),
//!     width: frame.width(),
//!     height: frame.height(),
//!     frame_rate: 20,
//!     codec: VideoCodec::Mpeg4,
//! };
//! let mut encoder = VideoEncoder::open(&settings)?;
//! encoder.write_repeated(&frame, 40)?;
//! encoder.finish()?;
//! # Ok::<(), TimelapseError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use ffmpeg_next::codec::Id;
use ffmpeg_next::codec::context::Context as CodecContext;
use ffmpeg_next::codec::encoder::video::Encoder as OpenedVideoEncoder;
use ffmpeg_next::format::context::Output;
use ffmpeg_next::format::{Flags as FormatFlags, Pixel};
use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_next::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg_next::{Packet, Rational};
use image::DynamicImage;

use crate::error::TimelapseError;
use crate::sink::FrameSink;

/// Supported output video codecs, identified by their MP4 codec tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoCodec {
    /// MPEG-4 Part 2, tag `mp4v`. This is the default.
    #[default]
    Mpeg4,
    /// H.264 / AVC, tag `avc1`.
    H264,
    /// H.265 / HEVC, tag `hvc1`.
    H265,
}

impl VideoCodec {
    fn to_codec_id(self) -> Id {
        match self {
            VideoCodec::Mpeg4 => Id::MPEG4,
            VideoCodec::H264 => Id::H264,
            VideoCodec::H265 => Id::HEVC,
        }
    }

    /// The four-character codec tag written into the container.
    pub fn fourcc(self) -> &'static str {
        match self {
            VideoCodec::Mpeg4 => "mp4v",
            VideoCodec::H264 => "avc1",
            VideoCodec::H265 => "hvc1",
        }
    }

    fn codec_tag(self) -> u32 {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(self.fourcc().as_bytes());
        u32::from_le_bytes(tag)
    }
}

impl Display for VideoCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.fourcc())
    }
}

impl FromStr for VideoCodec {
    type Err = TimelapseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mp4v" | "mpeg4" => Ok(VideoCodec::Mpeg4),
            "avc1" | "h264" | "avc" => Ok(VideoCodec::H264),
            "hvc1" | "h265" | "hevc" => Ok(VideoCodec::H265),
            _ => Err(TimelapseError::UnsupportedCodec(value.to_string())),
        }
    }
}

/// Everything needed to open a [`VideoEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Output file. The container is chosen from the extension.
    pub output_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second, at least 1.
    pub frame_rate: u32,
    /// Output codec.
    pub codec: VideoCodec,
}

/// An open FFmpeg encoder bound to one output file.
///
/// Frames must match the configured width and height. The encoder and muxer
/// run with FFmpeg's bit-exact flags so identical input produces identical
/// output bytes.
pub struct VideoEncoder {
    settings: EncoderSettings,
    output: Output,
    encoder: OpenedVideoEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    frames_written: u64,
    finished: bool,
}

impl VideoEncoder {
    /// Create the output file, configure the codec and write the container
    /// header.
    ///
    /// # Errors
    ///
    /// [`TimelapseError::EncoderOpenFailure`] if the settings are degenerate,
    /// the codec is unavailable, or the file cannot be created.
    ///
    /// Degenerate settings and a missing codec are caught before the output
    /// file is touched. A codec that is present but refuses the settings
    /// fails after the file has been created, leaving it empty.
    pub fn open(settings: &EncoderSettings) -> Result<Self, TimelapseError> {
        let fail = |reason: String| TimelapseError::EncoderOpenFailure {
            path: settings.output_path.clone(),
            reason,
        };

        let frame_rate = match i32::try_from(settings.frame_rate) {
            Ok(0) => return Err(fail("frame rate must be at least 1".to_string())),
            Ok(rate) => rate,
            Err(_) => {
                return Err(fail(format!(
                    "frame rate {} exceeds {}",
                    settings.frame_rate,
                    i32::MAX,
                )));
            }
        };
        if settings.width == 0 || settings.height == 0 {
            return Err(fail(format!(
                "invalid frame size {}x{}",
                settings.width, settings.height,
            )));
        }

        log::info!(
            "Opening {:?} (codec={}, fps={}, {}x{})",
            settings.output_path, settings.codec, settings.frame_rate,
            settings.width, settings.height,
        );

        ffmpeg_next::init().map_err(|e| fail(format!("cannot initialise FFmpeg: {e}")))?;

        let codec_id = settings.codec.to_codec_id();
        let target_pixel = Pixel::YUV420P;
        let encoder_time_base = Rational::new(1, frame_rate);

        // Look the codec up before the output file is created or truncated.
        let encoder_codec = ffmpeg_next::encoder::find(codec_id)
            .ok_or_else(|| fail(format!("codec {codec_id:?} not available")))?;

        let mut output = ffmpeg_next::format::output(&settings.output_path)
            .map_err(|e| fail(format!("cannot open output: {e}")))?;

        // Keep the muxer from embedding version strings and timestamps.
        unsafe {
            (*output.as_mut_ptr()).flags |= ffmpeg_sys_next::AVFMT_FLAG_BITEXACT as i32;
        }

        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let mut stream = output
            .add_stream(encoder_codec)
            .map_err(|e| fail(format!("cannot add stream: {e}")))?;
        let stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .map_err(|e| fail(format!("cannot create codec context: {e}")))?
            .encoder()
            .video()
            .map_err(|e| fail(format!("cannot create video encoder: {e}")))?;

        encoder.set_width(settings.width);
        encoder.set_height(settings.height);
        encoder.set_format(target_pixel);
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(Rational::new(frame_rate, 1)));

        unsafe {
            let context = encoder.as_mut_ptr();
            (*context).codec_tag = settings.codec.codec_tag();
            (*context).flags |= ffmpeg_sys_next::AV_CODEC_FLAG_BITEXACT as i32;
            if needs_global_header {
                (*context).flags |= ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let encoder = encoder
            .open_as(encoder_codec)
            .map_err(|e| fail(format!("cannot open encoder: {e}")))?;

        stream.set_parameters(&encoder);

        output
            .write_header()
            .map_err(|e| fail(format!("cannot write header: {e}")))?;

        // The muxer may replace the stream time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .ok_or_else(|| fail(format!("stream {stream_index} missing after header")))?;

        let scaler = ScalingContext::get(
            Pixel::RGB24,
            settings.width,
            settings.height,
            target_pixel,
            settings.width,
            settings.height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| fail(format!("cannot create scaler: {e}")))?;

        Ok(Self {
            settings: settings.clone(),
            output,
            encoder,
            scaler,
            stream_index,
            encoder_time_base,
            stream_time_base,
            frames_written: 0,
            finished: false,
        })
    }

    /// Settings this encoder was opened with.
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Number of frames handed to the codec so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn write_error(&self, reason: String) -> TimelapseError {
        TimelapseError::EncoderWriteFailure {
            path: self.settings.output_path.clone(),
            frame_index: self.frames_written,
            reason,
        }
    }

    /// Convert an image to a YUV frame in the encoder's pixel format.
    fn convert(&mut self, image: &DynamicImage) -> Result<VideoFrame, TimelapseError> {
        let (width, height) = (self.settings.width, self.settings.height);
        if image.width() != width || image.height() != height {
            return Err(self.write_error(format!(
                "frame is {}x{} but the encoder expects {width}x{height}",
                image.width(),
                image.height(),
            )));
        }

        let rgb = image.to_rgb8();
        let mut source = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = source.stride(0);
        let row_len = (width as usize) * 3;
        let destination = source.data_mut(0);
        for (y, row) in rgb.as_raw().chunks_exact(row_len).enumerate() {
            let start = y * stride;
            destination[start..start + row_len].copy_from_slice(row);
        }

        let mut converted = VideoFrame::empty();
        self.scaler
            .run(&source, &mut converted)
            .map_err(|e| self.write_error(format!("scaling failed: {e}")))?;
        Ok(converted)
    }

    fn send(&mut self, frame: &mut VideoFrame) -> Result<(), TimelapseError> {
        frame.set_pts(Some(self.frames_written as i64));
        self.encoder
            .send_frame(&*frame)
            .map_err(|e| self.write_error(format!("send_frame failed: {e}")))?;
        self.frames_written += 1;
        self.drain_packets()
    }

    fn drain_packets(&mut self) -> Result<(), TimelapseError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| self.write_error(format!("write packet failed: {e}")))?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), TimelapseError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        self.encoder
            .send_eof()
            .map_err(|e| self.write_error(format!("send_eof failed: {e}")))?;
        self.drain_packets()?;
        self.output
            .write_trailer()
            .map_err(|e| self.write_error(format!("cannot write trailer: {e}")))?;

        log::info!(
            "Finalized {:?} with {} frames",
            self.settings.output_path, self.frames_written,
        );
        Ok(())
    }
}

impl FrameSink for VideoEncoder {
    fn write_frame(&mut self, frame: &DynamicImage) -> Result<(), TimelapseError> {
        let mut converted = self.convert(frame)?;
        self.send(&mut converted)
    }

    fn write_repeated(&mut self, frame: &DynamicImage, count: u64) -> Result<(), TimelapseError> {
        let mut converted = self.convert(frame)?;
        for _ in 0..count {
            self.send(&mut converted)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(), TimelapseError> {
        self.finalize()
    }
}

impl Drop for VideoEncoder {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!(
            "Encoder for {:?} dropped before finish; finalizing after {} frames",
            self.settings.output_path, self.frames_written,
        );
        if let Err(error) = self.finalize() {
            log::warn!("{error}");
        }
    }
}
