//! Tolerant field extractors for ffmpeg status lines.
//!
//! One matcher per field family. Each extractor independently returns the
//! extracted value or `None`; malformed submatches degrade to `None` for that
//! field only and never abort processing of the line. Numbers are parsed with
//! a fixed ASCII decimal-point convention regardless of host locale.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Duration:\s*(\d+:\d{2}:\d{2}(?:\.\d+)?)").unwrap());

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})(?:\.(\d+))?$").unwrap());

static VIDEO_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Video:\s*([^,]+)").unwrap());

static VIDEO_COLOR_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Video:\s*[^,]+,\s*([^,]+)").unwrap());

// Two to five digits per side keeps codec tags like `0x31637661` from
// masquerading as a frame size.
static FRAME_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,5})x(\d{2,5})").unwrap());

// A numeric token directly before ` fps`. Rate descriptors without a numeric
// fps value (`90k tbr`, `90k tbn`) must not match.
static FPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?) fps").unwrap());

static BIT_RATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*kb/s").unwrap());

static AUDIO_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Audio:\s*([^,]+)").unwrap());

static SAMPLE_RATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+ Hz)").unwrap());

static CHANNEL_OUTPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Audio:\s*[^,]+,\s*[^,]+,\s*([^,]+)").unwrap());

static PROGRESS_FRAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"frame=\s*(\d+)").unwrap());

static PROGRESS_FPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fps=\s*(\d+(?:\.\d+)?)").unwrap());

// `\b` rejects the `size=` inside `Lsize=`.
static PROGRESS_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bsize=\s*(\d+)kB").unwrap());

static FINAL_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Lsize=\s*(\d+)kB").unwrap());

static PROGRESS_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time=\s*(\d+:\d{2}:\d{2}(?:\.\d+)?)").unwrap());

static PROGRESS_BIT_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bitrate=\s*(\d+(?:\.\d+)?)\s*kbits/s").unwrap());

/// Parse a `HH:MM:SS.ff` timestamp into a [`Duration`].
///
/// A missing fractional part defaults to zero fractional seconds.
pub fn parse_timestamp(text: &str) -> Option<Duration> {
    let caps = TIMESTAMP.captures(text.trim())?;

    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;

    // Fractional digits scale to nanoseconds exactly; going through a float
    // here would lose the round-trip with `format_timestamp`.
    let nanos = match caps.get(4) {
        Some(frac) => {
            let digits: String = frac.as_str().chars().take(9).collect();
            let value: u32 = digits.parse().ok()?;
            value * 10u32.pow(9 - digits.len() as u32)
        }
        None => 0,
    };

    let whole = hours * 3600 + minutes * 60 + seconds;
    Some(Duration::new(whole, nanos))
}

/// Format a [`Duration`] as `HH:MM:SS.ff`, the convention ffmpeg uses.
pub fn format_timestamp(duration: Duration) -> String {
    let total = duration.as_secs();
    let centis = duration.subsec_millis() / 10;
    format!(
        "{:02}:{:02}:{:02}.{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60,
        centis
    )
}

/// Container duration from a duration-header line.
pub fn duration(line: &str) -> Option<Duration> {
    parse_timestamp(&DURATION.captures(line)?[1])
}

/// Codec/format name from a video-stream line.
pub fn video_format(line: &str) -> Option<String> {
    Some(VIDEO_FORMAT.captures(line)?[1].trim().to_string())
}

/// Color model from a video-stream line.
pub fn video_color_model(line: &str) -> Option<String> {
    Some(VIDEO_COLOR_MODEL.captures(line)?[1].trim().to_string())
}

/// Frame size as `(width, height)`.
///
/// The pair is atomic: unless both sides parse, the result is `None`.
pub fn frame_size(line: &str) -> Option<(u32, u32)> {
    let caps = FRAME_SIZE.captures(line)?;
    let width: u32 = caps[1].parse().ok()?;
    let height: u32 = caps[2].parse().ok()?;
    Some((width, height))
}

/// Frame rate from a video-stream line.
pub fn video_fps(line: &str) -> Option<f64> {
    FPS.captures(line)?[1].parse().ok()
}

/// Stream bit rate in kb/s from a stream descriptor line.
pub fn stream_bit_rate(line: &str) -> Option<u32> {
    BIT_RATE.captures(line)?[1].parse().ok()
}

/// Codec/format name from an audio-stream line.
pub fn audio_format(line: &str) -> Option<String> {
    Some(AUDIO_FORMAT.captures(line)?[1].trim().to_string())
}

/// Sample rate, kept as reported (`44100 Hz`).
pub fn sample_rate(line: &str) -> Option<String> {
    Some(SAMPLE_RATE.captures(line)?[1].to_string())
}

/// Channel layout token from an audio-stream line (`stereo`, `5.1(side)`).
pub fn channel_output(line: &str) -> Option<String> {
    Some(CHANNEL_OUTPUT.captures(line)?[1].trim().to_string())
}

/// Current frame number from a progress-status line.
pub fn progress_frame(line: &str) -> Option<u64> {
    PROGRESS_FRAME.captures(line)?[1].parse().ok()
}

/// Encoding speed in fps from a progress-status line.
pub fn progress_fps(line: &str) -> Option<f64> {
    PROGRESS_FPS.captures(line)?[1].parse().ok()
}

/// Output size written so far, in kB.
pub fn progress_size_kb(line: &str) -> Option<u64> {
    PROGRESS_SIZE.captures(line)?[1].parse().ok()
}

/// Final output size from the mux summary line, in kB.
///
/// The `Lsize=` field only ever appears on the last status line ffmpeg
/// writes; its presence is the completion marker for a conversion.
pub fn final_size_kb(line: &str) -> Option<u64> {
    FINAL_SIZE.captures(line)?[1].parse().ok()
}

/// Processed input duration from a progress-status line.
pub fn progress_time(line: &str) -> Option<Duration> {
    parse_timestamp(&PROGRESS_TIME.captures(line)?[1])
}

/// Output bit rate in kbit/s from a progress-status line.
pub fn progress_bit_rate(line: &str) -> Option<f64> {
    PROGRESS_BIT_RATE.captures(line)?[1].parse().ok()
}
