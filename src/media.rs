//! Domain model: files, metadata snapshots, and progress events.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A media file on disk, identified by its path.
///
/// A metadata snapshot is attached at most once, by the first successful
/// probe; later probes of the same handle reuse the attached snapshot.
#[derive(Debug, Clone)]
pub struct MediaFile {
    path: PathBuf,
    metadata: Option<Metadata>,
}

impl MediaFile {
    /// Create a handle for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: None,
        }
    }

    /// Path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The probed metadata snapshot, if one has been attached.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Attach a probed snapshot. The first snapshot wins; the handle is
    /// append-once and never mutated afterward.
    pub(crate) fn attach_metadata(&mut self, metadata: Metadata) {
        if self.metadata.is_none() {
            self.metadata = Some(metadata);
        }
    }
}

/// Immutable metadata snapshot for one media file.
///
/// Duration is always present when assembly succeeded; the stream descriptors
/// are independently optional since a file may carry only audio, only video,
/// or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Container duration.
    pub duration: Duration,
    /// Video stream descriptor, if the file has a video stream.
    pub video_stream: Option<VideoStreamInfo>,
    /// Audio stream descriptor, if the file has an audio stream.
    pub audio_stream: Option<AudioStreamInfo>,
}

/// Video stream descriptor.
///
/// Every field is independently optional: absence means the value was not
/// found in the source text, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    /// Codec/format name, e.g. `h264 (High) (avc1 / 0x31637661)`.
    pub format: Option<String>,
    /// Pixel format / color model, e.g. `yuv420p`.
    pub color_model: Option<String>,
    /// Frame size as `(width, height)`. Atomic: both or neither.
    pub frame_size: Option<(u32, u32)>,
    /// Frame rate in frames per second.
    pub fps: Option<f64>,
    /// Bit rate in kb/s.
    pub bit_rate_kbps: Option<u32>,
}

/// Audio stream descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    /// Codec/format name, e.g. `aac (LC) (mp4a / 0x6134706D)`.
    pub format: Option<String>,
    /// Sample rate as reported, e.g. `44100 Hz`.
    pub sample_rate: Option<String>,
    /// Channel layout as reported, e.g. `stereo` or `5.1(side)`.
    pub channel_output: Option<String>,
    /// Bit rate in kb/s.
    pub bit_rate_kbps: Option<u32>,
}

/// A point-in-time progress sample for an in-flight conversion.
///
/// One event is emitted per recognized status line and discarded after
/// delivery; no history is retained beyond the latest values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Current output frame number.
    pub frame: Option<u64>,
    /// Current encoding speed in frames per second.
    pub fps: Option<f64>,
    /// Output size written so far, in kB.
    pub size_kb: Option<u64>,
    /// Input duration processed so far.
    pub processed_duration: Duration,
    /// Total input duration, zero when no probe preceded the conversion.
    pub total_duration: Duration,
    /// Current output bit rate in kbit/s.
    pub bit_rate_kbps: Option<f64>,
}

impl ProgressEvent {
    /// Fraction of the input processed so far, in `0.0..=1.0`.
    ///
    /// `None` when the total duration is unknown; status lines only ever
    /// report elapsed time, so a ratio needs a prior metadata probe.
    pub fn ratio(&self) -> Option<f64> {
        if self.total_duration.is_zero() {
            return None;
        }
        let ratio = self.processed_duration.as_secs_f64() / self.total_duration.as_secs_f64();
        Some(ratio.min(1.0))
    }
}

/// Terminal signal for a conversion whose status stream ended normally.
///
/// Carries the final values of the progress fields. Exactly one completion
/// event exists per conversion, and it is always the last event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Final output frame count.
    pub frame: Option<u64>,
    /// Final encoding speed in frames per second.
    pub fps: Option<f64>,
    /// Final output size in kB.
    pub size_kb: Option<u64>,
    /// Input duration processed.
    pub processed_duration: Duration,
    /// Total input duration, zero when no probe preceded the conversion.
    pub total_duration: Duration,
    /// Final output bit rate in kbit/s.
    pub bit_rate_kbps: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_attaches_once() {
        let mut file = MediaFile::new("/movies/movie.mkv");
        assert!(file.metadata().is_none());

        let first = Metadata {
            duration: Duration::from_secs(60),
            video_stream: None,
            audio_stream: None,
        };
        file.attach_metadata(first.clone());

        let second = Metadata {
            duration: Duration::from_secs(120),
            video_stream: None,
            audio_stream: None,
        };
        file.attach_metadata(second);

        assert_eq!(file.metadata(), Some(&first));
    }

    #[test]
    fn ratio_requires_total_duration() {
        let event = ProgressEvent {
            frame: Some(10),
            fps: None,
            size_kb: None,
            processed_duration: Duration::from_secs(5),
            total_duration: Duration::ZERO,
            bit_rate_kbps: None,
        };
        assert_eq!(event.ratio(), None);
    }

    #[test]
    fn ratio_is_clamped() {
        let event = ProgressEvent {
            frame: None,
            fps: None,
            size_kb: None,
            processed_duration: Duration::from_secs(15),
            total_duration: Duration::from_secs(10),
            bit_rate_kbps: None,
        };
        assert_eq!(event.ratio(), Some(1.0));
    }
}
