//! The engine façade: owns the ffmpeg process lifecycle and routes its
//! status stream through the parser components.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::command::ToolCommand;
use crate::media::{CompletionEvent, MediaFile, Metadata, ProgressEvent};
use crate::options::ConversionOptions;
use crate::parse::extract::format_timestamp;
use crate::parse::{MetadataAssembler, ProgressTracker, TrackerEvent};
use crate::{tools, Error, Result};

/// How long a metadata probe may run before the process is killed.
/// Conversions have no limit; their runtime scales with the input.
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Façade over the ffmpeg command-line tool.
///
/// Spawns ffmpeg for probing, transcoding, and thumbnail extraction, and
/// turns its textual status stream into structured metadata and progress
/// events.
///
/// # Example
///
/// ```no_run
/// use mediaforge::{ConversionOptions, Engine, MediaFile};
///
/// # async fn example() -> mediaforge::Result<()> {
/// let engine = Engine::new()?;
///
/// let mut input = MediaFile::new("/movies/input.m4v");
/// let output = MediaFile::new("/movies/output.mp4");
///
/// let metadata = engine.get_metadata(&mut input).await?;
/// println!("duration: {:?}", metadata.duration);
///
/// let done = engine
///     .convert(&input, &output, &ConversionOptions::default())
///     .await?;
/// println!("wrote {:?} kB", done.size_kb);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl Engine {
    /// Create an engine using the ffmpeg found on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when ffmpeg is not installed.
    pub fn new() -> Result<Self> {
        Ok(Self::with_ffmpeg_path(tools::require_tool("ffmpeg")?))
    }

    /// Create an engine for an explicit ffmpeg binary.
    ///
    /// The companion ffprobe binary is resolved from the same directory.
    pub fn with_ffmpeg_path(path: impl Into<PathBuf>) -> Self {
        let ffmpeg_path = path.into();
        let ffprobe_path = tools::sibling_tool(&ffmpeg_path, "ffprobe");
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    /// Path of the ffmpeg binary this engine drives.
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Path of the companion ffprobe binary.
    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// Probe `file` and attach a metadata snapshot to it.
    ///
    /// Runs `ffmpeg -i <file>` and assembles the input banner from the
    /// status stream. If the file already carries a snapshot it is returned
    /// as-is without spawning anything.
    ///
    /// # Errors
    ///
    /// Fails when the file does not exist, the process cannot be spawned,
    /// the probe times out, or no duration could be assembled from the
    /// output.
    pub async fn get_metadata(&self, file: &mut MediaFile) -> Result<Metadata> {
        if let Some(metadata) = file.metadata() {
            return Ok(metadata.clone());
        }
        if !file.path().exists() {
            return Err(Error::file_not_found(file.path()));
        }

        let mut cmd = ToolCommand::new(&self.ffmpeg_path);
        cmd.arg("-nostdin")
            .arg("-i")
            .arg(file.path().to_string_lossy());

        let mut stream = cmd.spawn()?;
        let mut assembler = MetadataAssembler::new();

        let drain = async {
            while let Some(line) = stream.next_line().await? {
                assembler.push(&line);
            }
            Ok::<_, Error>(())
        };

        match tokio::time::timeout(PROBE_TIMEOUT, drain).await {
            Ok(result) => result?,
            Err(_) => {
                stream.kill().await.ok();
                return Err(Error::Timeout {
                    tool: "ffmpeg".to_string(),
                    seconds: PROBE_TIMEOUT.as_secs(),
                });
            }
        }

        // ffmpeg exits non-zero when invoked without an output file; the
        // probe needs only the input banner, so the exit status is ignored.
        let _ = stream.wait().await;

        let metadata = assembler
            .finish()
            .ok_or_else(|| Error::parse_error("ffmpeg", "no duration found in probe output"))?;

        tracing::debug!(
            path = %file.path().display(),
            duration = ?metadata.duration,
            "probed"
        );

        file.attach_metadata(metadata.clone());
        Ok(metadata)
    }

    /// Convert `input` to `output`.
    ///
    /// Returns the terminal [`CompletionEvent`] once ffmpeg has written its
    /// mux summary and exited cleanly.
    pub async fn convert(
        &self,
        input: &MediaFile,
        output: &MediaFile,
        options: &ConversionOptions,
    ) -> Result<CompletionEvent> {
        self.run_conversion(input, output, options, None).await
    }

    /// Convert `input` to `output`, publishing progress while in flight.
    ///
    /// One [`ProgressEvent`] is sent per recognized status line, in arrival
    /// order. The terminal [`CompletionEvent`] is the return value, so it
    /// always follows every progress event, exactly once. Probe the input
    /// first if ratio/percentage fields should be populated; without a prior
    /// snapshot the events carry a zero total duration.
    pub async fn convert_with_progress(
        &self,
        input: &MediaFile,
        output: &MediaFile,
        options: &ConversionOptions,
        progress_tx: mpsc::Sender<ProgressEvent>,
    ) -> Result<CompletionEvent> {
        self.run_conversion(input, output, options, Some(progress_tx))
            .await
    }

    /// Extract a single frame from `input` into `output`.
    ///
    /// The frame is taken at `options.seek` (start of file when unset); the
    /// output format is ffmpeg's `image2`, so the output extension picks the
    /// image codec.
    pub async fn get_thumbnail(
        &self,
        input: &MediaFile,
        output: &MediaFile,
        options: &ConversionOptions,
    ) -> Result<()> {
        if !input.path().exists() {
            return Err(Error::file_not_found(input.path()));
        }

        let seek = options.seek.unwrap_or_default();

        let mut cmd = ToolCommand::new(&self.ffmpeg_path);
        cmd.arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(input.path().to_string_lossy())
            .arg("-ss")
            .arg(format_timestamp(seek))
            .arg("-vframes")
            .arg("1")
            .arg("-f")
            .arg("image2")
            .arg(output.path().to_string_lossy());

        let mut stream = cmd.spawn()?;
        let mut error_output = String::new();

        while let Some(line) = stream.next_line().await? {
            collect_error_line(&mut error_output, &line);
        }

        let status = stream.wait().await?;
        if !status.success() {
            return Err(Error::tool_failed(
                "ffmpeg",
                exit_message(&status.to_string(), &error_output),
            ));
        }

        tracing::debug!(output = %output.path().display(), "thumbnail written");
        Ok(())
    }

    async fn run_conversion(
        &self,
        input: &MediaFile,
        output: &MediaFile,
        options: &ConversionOptions,
        progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    ) -> Result<CompletionEvent> {
        if !input.path().exists() {
            return Err(Error::file_not_found(input.path()));
        }

        // Status lines only report elapsed time; the total comes from a
        // prior probe of the input, when the caller performed one.
        let total_duration = input.metadata().map(|m| m.duration);

        let mut cmd = ToolCommand::new(&self.ffmpeg_path);
        cmd.arg("-nostdin")
            .arg("-y")
            .arg("-i")
            .arg(input.path().to_string_lossy());
        cmd.args(options.to_args());
        cmd.arg(output.path().to_string_lossy());

        tracing::info!(
            input = %input.path().display(),
            output = %output.path().display(),
            "converting"
        );

        let mut stream = cmd.spawn()?;
        let mut tracker = ProgressTracker::new(total_duration);
        let mut completion = None;
        let mut error_output = String::new();

        while let Some(line) = stream.next_line().await? {
            match tracker.push(&line) {
                Some(TrackerEvent::Progress(event)) => {
                    if let Some(tx) = &progress_tx {
                        // A dropped receiver means the caller stopped
                        // listening; the conversion itself carries on.
                        let _ = tx.send(event).await;
                    }
                }
                Some(TrackerEvent::Completed(event)) => completion = Some(event),
                None => collect_error_line(&mut error_output, &line),
            }
        }

        let status = stream.wait().await?;
        if !status.success() {
            return Err(Error::tool_failed(
                "ffmpeg",
                exit_message(&status.to_string(), &error_output),
            ));
        }

        // A clean exit without the mux summary means the status stream was
        // cut short; surface that rather than inferring success.
        let completion = completion.ok_or(Error::Incomplete)?;

        tracing::info!(
            frame = ?completion.frame,
            size_kb = ?completion.size_kb,
            "conversion complete"
        );

        Ok(completion)
    }
}

/// Keep lines that look like tool errors for the failure message.
fn collect_error_line(buffer: &mut String, line: &str) {
    if line.contains("Error") || line.contains("error") {
        buffer.push_str(line.trim());
        buffer.push('\n');
    }
}

fn exit_message(status: &str, error_output: &str) -> String {
    if error_output.is_empty() {
        format!("exited with {status}")
    } else {
        format!("exited with {status}: {}", error_output.trim())
    }
}
