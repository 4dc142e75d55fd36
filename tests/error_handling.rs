//! Error handling integration tests.
//!
//! These tests verify that failures name the offending path or parameter.

use std::path::PathBuf;

use timelapse::{FramePattern, TimelapseAssembler, TimelapseConfig, TimelapseError, decode_image};

#[test]
fn missing_directory_message_names_path() {
    let pattern = FramePattern::numbered("image_", 4, "bmp").expect("pattern");
    let config = TimelapseConfig::new("this_directory_does_not_exist/shuffle", pattern);

    let error = TimelapseAssembler::new(config).run().unwrap_err();
    let message = error.to_string();

    assert!(
        message.contains("Input directory not found"),
        "Error message should mention the missing directory: {message}",
    );
    assert!(message.contains("this_directory_does_not_exist"), "{message}");
}

#[test]
fn empty_directory_message_names_pattern() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::numbered("image_", 4, "png").expect("pattern");
    let config = TimelapseConfig::new(temporary_directory.path(), pattern);

    let message = TimelapseAssembler::new(config).run().unwrap_err().to_string();

    assert!(
        message.contains("No files matching image_NNNN.png"),
        "Error message should mention the pattern: {message}",
    );
}

#[test]
fn decode_failure_names_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_image_path = temporary_directory.path().join("image_0001.png");
    std::fs::write(&invalid_image_path, b"this is not an image")
        .expect("Failed to write invalid file");

    let error = decode_image(&invalid_image_path).unwrap_err();

    match &error {
        TimelapseError::DecodeFailure { path, .. } => assert_eq!(path, &invalid_image_path),
        other => panic!("expected DecodeFailure, got {other:?}"),
    }
    assert!(error.to_string().contains("image_0001.png"));
}

#[test]
fn missing_image_is_a_decode_failure() {
    let error = decode_image(&PathBuf::from("no_such_image.png")).unwrap_err();
    assert!(matches!(error, TimelapseError::DecodeFailure { .. }));
}

#[test]
fn frame_rate_message_explains_shortfall() {
    let error = TimelapseError::FrameRateTooLow {
        frame_count: 3,
        video_length_seconds: 7.0,
    };
    let message = error.to_string();

    assert!(message.contains("3 frames"), "{message}");
    assert!(message.contains("7s"), "{message}");
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: TimelapseError = io.into();
    assert!(error.to_string().starts_with("I/O error"));
}
