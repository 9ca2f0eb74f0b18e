//! Folds a live conversion's status lines into progress events.

use std::time::Duration;

use crate::media::{CompletionEvent, ProgressEvent};
use crate::parse::{classify, extract, LineKind};

/// Event produced by one step of the [`ProgressTracker`] fold.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A fresh progress sample.
    Progress(ProgressEvent),
    /// The terminal event: the status stream's completion marker was seen.
    Completed(CompletionEvent),
}

/// Stateful fold over the status lines of an in-flight conversion.
///
/// ffmpeg does not repeat every field on every status update, so the most
/// recent successfully parsed value of each field persists across lines that
/// omit it. The total duration comes from a prior metadata probe of the input
/// (status lines only report elapsed time); without one, derived ratio fields
/// are simply unavailable.
///
/// The final mux summary line (the one carrying `Lsize=`) is the completion
/// marker: it produces exactly one [`TrackerEvent::Completed`], after which
/// further lines are ignored. The tracker holds no resources; dropping it
/// mid-conversion is always safe.
#[derive(Debug)]
pub struct ProgressTracker {
    total_duration: Duration,
    frame: Option<u64>,
    fps: Option<f64>,
    size_kb: Option<u64>,
    processed: Duration,
    bit_rate_kbps: Option<f64>,
    completed: bool,
}

impl ProgressTracker {
    /// Create a tracker.
    ///
    /// `total_duration` is the previously probed duration of the input, or
    /// `None` when no probe preceded the conversion.
    pub fn new(total_duration: Option<Duration>) -> Self {
        Self {
            total_duration: total_duration.unwrap_or_default(),
            frame: None,
            fps: None,
            size_kb: None,
            processed: Duration::ZERO,
            bit_rate_kbps: None,
            completed: false,
        }
    }

    /// Consume one status line.
    ///
    /// Returns a [`TrackerEvent`] for every recognized progress-status line
    /// and `None` for everything else. After the completion marker has been
    /// seen, all further lines yield `None`.
    pub fn push(&mut self, line: &str) -> Option<TrackerEvent> {
        if self.completed || classify(line) != LineKind::ProgressStatus {
            return None;
        }

        if let Some(v) = extract::progress_frame(line) {
            self.frame = Some(v);
        }
        if let Some(v) = extract::progress_fps(line) {
            self.fps = Some(v);
        }
        if let Some(v) = extract::progress_size_kb(line) {
            self.size_kb = Some(v);
        }
        if let Some(v) = extract::progress_time(line) {
            self.processed = v;
        }
        if let Some(v) = extract::progress_bit_rate(line) {
            self.bit_rate_kbps = Some(v);
        }

        if let Some(final_kb) = extract::final_size_kb(line) {
            self.size_kb = Some(final_kb);
            self.completed = true;
            return Some(TrackerEvent::Completed(self.completion()));
        }

        Some(TrackerEvent::Progress(self.snapshot()))
    }

    /// Whether the completion marker has been observed.
    ///
    /// A status stream that closes while this is still `false` did not end
    /// normally; the consumer must treat that as a fatal failure.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Current progress sample from the persisted state.
    pub fn snapshot(&self) -> ProgressEvent {
        ProgressEvent {
            frame: self.frame,
            fps: self.fps,
            size_kb: self.size_kb,
            processed_duration: self.processed,
            total_duration: self.total_duration,
            bit_rate_kbps: self.bit_rate_kbps,
        }
    }

    /// Terminal event built from the last persisted state.
    pub fn completion(&self) -> CompletionEvent {
        CompletionEvent {
            frame: self.frame,
            fps: self.fps,
            size_kb: self.size_kb,
            processed_duration: self.processed,
            total_duration: self.total_duration,
            bit_rate_kbps: self.bit_rate_kbps,
        }
    }
}
