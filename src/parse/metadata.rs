//! Folds a probe's status lines into one metadata snapshot.

use std::time::Duration;

use crate::media::{AudioStreamInfo, Metadata, VideoStreamInfo};
use crate::parse::{classify, extract, LineKind};

/// Accumulates classified lines from one probe into a [`Metadata`] snapshot.
///
/// Three accumulators run in parallel: the container duration, a video
/// descriptor in progress, and an audio descriptor in progress. ffmpeg may
/// report a stream across multiple lines, so later lines merge into the same
/// accumulator and overwrite earlier values for the same field. Operates
/// purely on text already captured; no process or file access.
#[derive(Debug, Default)]
pub struct MetadataAssembler {
    duration: Option<Duration>,
    video: Option<VideoStreamInfo>,
    audio: Option<AudioStreamInfo>,
}

impl MetadataAssembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one status line.
    ///
    /// Unclassified lines and malformed fields are dropped silently; a push
    /// never fails.
    pub fn push(&mut self, line: &str) {
        match classify(line) {
            LineKind::DurationHeader => {
                if let Some(d) = extract::duration(line) {
                    self.duration = Some(d);
                }
            }
            LineKind::VideoStream => {
                let video = self.video.get_or_insert_with(VideoStreamInfo::default);
                if let Some(v) = extract::video_format(line) {
                    video.format = Some(v);
                }
                if let Some(v) = extract::video_color_model(line) {
                    video.color_model = Some(v);
                }
                if let Some(v) = extract::frame_size(line) {
                    video.frame_size = Some(v);
                }
                if let Some(v) = extract::video_fps(line) {
                    video.fps = Some(v);
                }
                if let Some(v) = extract::stream_bit_rate(line) {
                    video.bit_rate_kbps = Some(v);
                }
            }
            LineKind::AudioStream => {
                let audio = self.audio.get_or_insert_with(AudioStreamInfo::default);
                if let Some(v) = extract::audio_format(line) {
                    audio.format = Some(v);
                }
                if let Some(v) = extract::sample_rate(line) {
                    audio.sample_rate = Some(v);
                }
                if let Some(v) = extract::channel_output(line) {
                    audio.channel_output = Some(v);
                }
                if let Some(v) = extract::stream_bit_rate(line) {
                    audio.bit_rate_kbps = Some(v);
                }
            }
            LineKind::ProgressStatus | LineKind::Unclassified => {}
        }
    }

    /// Finish the fold and emit the snapshot.
    ///
    /// Returns `None` when no container duration was ever seen; a snapshot
    /// without a duration would be unusable for progress correlation, so
    /// assembly is only considered successful once one has been parsed.
    pub fn finish(self) -> Option<Metadata> {
        Some(Metadata {
            duration: self.duration?,
            video_stream: self.video,
            audio_stream: self.audio,
        })
    }
}
