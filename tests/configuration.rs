//! TimelapseConfig, InputProfile, and VideoCodec tests.

use std::path::Path;

use timelapse::{
    FfmpegLogLevel, FramePattern, HoldFrameSource, InputProfile, TimelapseConfig,
    TimelapseError, Timing, VideoCodec,
};

// ── InputProfile ─────────────────────────────────────────────────

#[test]
fn shuffle_profile_reads_bmp_from_subdirectory() {
    let profile = InputProfile::Shuffle;

    assert_eq!(profile.directory(Path::new("renders")), Path::new("renders").join("shuffle"));
    assert_eq!(profile.extension(), "bmp");

    let pattern = profile.pattern().unwrap();
    assert!(pattern.is_match("image_0001.bmp"));
    assert!(!pattern.is_match("image_0001.png"));
}

#[test]
fn rendered_profile_reads_png_from_root() {
    let profile = InputProfile::Rendered;

    assert_eq!(profile.directory(Path::new("renders")), Path::new("renders"));
    assert_eq!(profile.pattern().unwrap().to_string(), "image_NNNN.png");
}

#[test]
fn profile_defaults_to_shuffle() {
    assert_eq!(InputProfile::default(), InputProfile::Shuffle);
}

#[test]
fn profile_from_str() {
    assert_eq!("Shuffle".parse::<InputProfile>().unwrap(), InputProfile::Shuffle);
    assert_eq!("rendered".parse::<InputProfile>().unwrap(), InputProfile::Rendered);
    assert!(matches!(
        "gif".parse::<InputProfile>(),
        Err(TimelapseError::InvalidConfiguration(_))
    ));
}

// ── TimelapseConfig builder ──────────────────────────────────────

#[test]
fn config_defaults_live_in_input_directory() {
    let pattern = FramePattern::numbered("image_", 4, "png").unwrap();
    let config = TimelapseConfig::new("frames", pattern);

    assert_eq!(config.input_directory(), Path::new("frames"));
    assert_eq!(
        config.output_path(),
        Path::new("frames").join("time_lapse_video.mp4")
    );
    assert_eq!(
        config.hold_frame(),
        &HoldFrameSource::Image(Path::new("frames").join("image.png"))
    );
    assert_eq!(config.timing(), Timing::default());
    assert_eq!(config.codec(), VideoCodec::Mpeg4);
}

#[test]
fn config_from_profile() {
    let config = TimelapseConfig::from_profile(Path::new("root"), InputProfile::Shuffle).unwrap();

    assert_eq!(config.input_directory(), Path::new("root").join("shuffle"));
    assert_eq!(config.pattern().extension(), "bmp");
    assert_eq!(
        config.output_path(),
        Path::new("root").join("shuffle").join("time_lapse_video.mp4")
    );
}

#[test]
fn config_builder_overrides() {
    let pattern = FramePattern::numbered("image_", 4, "png").unwrap();
    let config = TimelapseConfig::new("frames", pattern)
        .with_output("out/video.mp4")
        .with_video_length(10.0)
        .with_hold_seconds(1.5)
        .with_codec(VideoCodec::H264)
        .with_hold_frame(HoldFrameSource::LastInSequence);

    assert_eq!(config.output_path(), Path::new("out/video.mp4"));
    assert_eq!(config.timing(), Timing::new(10.0, 1.5));
    assert_eq!(config.codec(), VideoCodec::H264);
    assert_eq!(config.hold_frame(), &HoldFrameSource::LastInSequence);

    let replaced = config.with_timing(Timing::new(3.0, 0.0));
    assert_eq!(replaced.timing(), Timing::new(3.0, 0.0));
}

// ── VideoCodec ───────────────────────────────────────────────────

#[test]
fn codec_fourcc_tags() {
    assert_eq!(VideoCodec::default(), VideoCodec::Mpeg4);
    assert_eq!(VideoCodec::Mpeg4.fourcc(), "mp4v");
    assert_eq!(VideoCodec::H264.fourcc(), "avc1");
    assert_eq!(VideoCodec::H265.fourcc(), "hvc1");
    assert_eq!(VideoCodec::Mpeg4.to_string(), "mp4v");
}

#[test]
fn codec_from_str() {
    assert_eq!("mp4v".parse::<VideoCodec>().unwrap(), VideoCodec::Mpeg4);
    assert_eq!("MPEG4".parse::<VideoCodec>().unwrap(), VideoCodec::Mpeg4);
    assert_eq!("h264".parse::<VideoCodec>().unwrap(), VideoCodec::H264);
    assert_eq!("hevc".parse::<VideoCodec>().unwrap(), VideoCodec::H265);

    match "xvid".parse::<VideoCodec>() {
        Err(TimelapseError::UnsupportedCodec(name)) => assert_eq!(name, "xvid"),
        other => panic!("expected UnsupportedCodec, got {other:?}"),
    }
}

// ── FfmpegLogLevel ───────────────────────────────────────────────

#[test]
fn ffmpeg_log_level_from_str() {
    assert_eq!("quiet".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Quiet);
    assert_eq!("WARN".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Warning);
    assert_eq!("trace".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Trace);
    assert!("loud".parse::<FfmpegLogLevel>().is_err());
}
