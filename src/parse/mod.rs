//! Streaming parser for ffmpeg's diagnostic output.
//!
//! ffmpeg reports everything on its stderr status stream: a banner describing
//! each input (container duration, per-stream codec, resolution, bit rate),
//! then one status line per encoded frame batch while a conversion runs, and
//! finally a mux summary when it finishes writing output.
//!
//! That text has no schema. Formats drift between tool versions, fields come
//! and go per line, and unrelated log lines are interleaved throughout. The
//! modules here therefore avoid any all-or-nothing grammar:
//!
//! - [`classify`] tags each raw line with the record family it belongs to.
//! - [`extract`] holds one tolerant matcher per field; each independently
//!   yields a value or absence, and malformed text degrades to absence.
//! - [`MetadataAssembler`] folds a probe's lines into one [`Metadata`]
//!   snapshot.
//! - [`ProgressTracker`] folds a live conversion's lines into
//!   [`ProgressEvent`]s and a single terminal [`CompletionEvent`].
//!
//! Everything in this module is synchronous and side-effect free; blocking
//! and process I/O live in [`crate::command`] and [`crate::engine`].
//!
//! [`Metadata`]: crate::media::Metadata
//! [`ProgressEvent`]: crate::media::ProgressEvent
//! [`CompletionEvent`]: crate::media::CompletionEvent

pub mod classify;
pub mod extract;

mod metadata;
mod progress;

pub use classify::{classify, LineKind};
pub use metadata::MetadataAssembler;
pub use progress::{ProgressTracker, TrackerEvent};
