//! # mediaforge
//!
//! A programmatic front-end for the ffmpeg command-line tool.
//!
//! This crate spawns ffmpeg to transcode media files, extract thumbnails,
//! and probe media metadata, and turns the tool's textual status stream into
//! structured data: immutable [`Metadata`] snapshots for probes, and live
//! [`ProgressEvent`]s plus one terminal [`CompletionEvent`] for conversions.
//!
//! The heart of the crate is the streaming parser in [`parse`]: a
//! line-oriented, tolerant reconstruction of ffmpeg's unstructured
//! diagnostic output that never fails on malformed fields and keeps working
//! while the producing process is still writing.
//!
//! ## Example
//!
//! ```no_run
//! use mediaforge::{ConversionOptions, Engine, MediaFile};
//! use std::time::Duration;
//!
//! # async fn example() -> mediaforge::Result<()> {
//! let engine = Engine::new()?;
//!
//! let mut input = MediaFile::new("/movies/input.m4v");
//! let output = MediaFile::new("/movies/clip.mp4");
//!
//! engine.get_metadata(&mut input).await?;
//!
//! let mut options = ConversionOptions::default();
//! options.cut(Duration::from_secs(30), Duration::from_secs(25));
//!
//! let done = engine.convert(&input, &output, &options).await?;
//! println!("finished at frame {:?}", done.frame);
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;

pub mod command;
pub mod media;
pub mod options;
pub mod parse;
pub mod tools;

// Re-exports
pub use command::{StatusLines, ToolCommand};
pub use engine::Engine;
pub use error::{Error, Result};
pub use media::{
    AudioStreamInfo, CompletionEvent, MediaFile, Metadata, ProgressEvent, VideoStreamInfo,
};
pub use options::{
    AspectRatio, AudioSampleRate, ConversionOptions, CropRectangle, Target, TargetStandard,
    VideoSize,
};
pub use parse::{classify, LineKind, MetadataAssembler, ProgressTracker, TrackerEvent};
