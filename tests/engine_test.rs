//! Engine façade behavior that does not require a working ffmpeg install.

use assert_matches::assert_matches;
use mediaforge::{ConversionOptions, Engine, Error, MediaFile};
use std::io::Write;
use std::path::Path;

fn write_dummy_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("input.m4v");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"not really a movie").unwrap();
    path
}

/// A stand-in ffmpeg: a shell script that replays a canned status stream on
/// stderr and exits 0, so engine behavior can be exercised without a real
/// encoder.
#[cfg(unix)]
fn write_fake_ffmpeg(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.path().join("ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn ffprobe_lives_next_to_ffmpeg() {
    let engine = Engine::with_ffmpeg_path("/some/folder/path/ffmpeg");
    assert_eq!(
        engine.ffprobe_path(),
        Path::new("/some/folder/path/ffprobe")
    );
}

#[tokio::test]
async fn probe_of_missing_file_fails_before_spawning() {
    // The ffmpeg path is bogus on purpose: the existence check must fire
    // first, so no spawn is ever attempted.
    let engine = Engine::with_ffmpeg_path("/nonexistent/bin/ffmpeg");
    let mut input = MediaFile::new("/no/such/file.m4v");

    let result = engine.get_metadata(&mut input).await;
    assert_matches!(result, Err(Error::FileNotFound { .. }));
    assert!(input.metadata().is_none());
}

#[tokio::test]
async fn convert_reports_missing_tool() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_dummy_input(&dir);

    let engine = Engine::with_ffmpeg_path("/nonexistent/bin/ffmpeg");
    let input = MediaFile::new(&input_path);
    let output = MediaFile::new(dir.path().join("output.mp4"));

    let result = engine
        .convert(&input, &output, &ConversionOptions::default())
        .await;
    assert_matches!(result, Err(Error::ToolNotFound { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn completion_carries_final_status_values() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_dummy_input(&dir);

    // In-flight updates separated by bare carriage returns, the way ffmpeg
    // writes them to a terminal; only the mux summary ends with a newline.
    let ffmpeg = write_fake_ffmpeg(
        &dir,
        r"printf 'Press [q] to stop, [?] for help\nframe=   87 fps=0.0 q=28.0 size=     256kB time=00:00:03.41 bitrate= 614.2kbits/s speed=6.81x\rframe= 1497 fps=180 q=28.0 size=    8960kB time=00:00:59.84 bitrate=1226.5kbits/s speed=7.2x\rframe= 1498 fps=179 q=-1.0 Lsize=    9074kB time=00:00:59.84 bitrate=1242.1kbits/s speed=7.17x\n' >&2",
    );

    let engine = Engine::with_ffmpeg_path(ffmpeg);
    let input = MediaFile::new(&input_path);
    let output = MediaFile::new(dir.path().join("output.mp4"));
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    let done = engine
        .convert_with_progress(&input, &output, &ConversionOptions::default(), tx)
        .await
        .unwrap();

    // The terminal event reflects the last update, not the first.
    assert_eq!(done.frame, Some(1498));
    assert_eq!(done.size_kb, Some(9074));
    assert_eq!(done.bit_rate_kbps, Some(1242.1));

    let mut frames = Vec::new();
    while let Ok(event) = rx.try_recv() {
        frames.push(event.frame);
    }
    assert_eq!(frames, vec![Some(87), Some(1497)]);
}

#[cfg(unix)]
#[tokio::test]
async fn truncated_status_stream_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_dummy_input(&dir);

    // Clean exit, but the stream ends without a mux summary line.
    let ffmpeg = write_fake_ffmpeg(
        &dir,
        r"printf 'frame=   87 fps=0.0 q=28.0 size=     256kB time=00:00:03.41 bitrate= 614.2kbits/s speed=6.81x\rframe=  177 fps=176 q=28.0 size=     512kB time=00:00:07.01 bitrate= 598.3kbits/s speed=6.99x\n' >&2",
    );

    let engine = Engine::with_ffmpeg_path(ffmpeg);
    let input = MediaFile::new(&input_path);
    let output = MediaFile::new(dir.path().join("output.mp4"));

    let result = engine
        .convert(&input, &output, &ConversionOptions::default())
        .await;
    assert_matches!(result, Err(Error::Incomplete));
}

#[tokio::test]
async fn thumbnail_reports_missing_tool() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = write_dummy_input(&dir);

    let engine = Engine::with_ffmpeg_path("/nonexistent/bin/ffmpeg");
    let input = MediaFile::new(&input_path);
    let output = MediaFile::new(dir.path().join("thumb.jpg"));

    let result = engine
        .get_thumbnail(&input, &output, &ConversionOptions::default())
        .await;
    assert_matches!(result, Err(Error::ToolNotFound { .. }));
}
