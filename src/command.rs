//! Builder for spawning external tools with a line-streamed status channel.
//!
//! ffmpeg writes everything of interest (the input banner, per-frame progress,
//! the final mux summary) to stderr while it runs. The parser layers consume
//! that text one line at a time, in arrival order, so the stream here is
//! line-buffered rather than captured wholesale at exit.
//!
//! In-flight progress updates are separated by bare carriage returns so they
//! overwrite each other on a terminal; only the last status line ends with a
//! newline. Framing therefore treats both `\r` and `\n` as line terminators,
//! otherwise an entire conversion's updates would arrive as one chunk at exit.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};

use crate::{Error, Result};

/// A builder for constructing and spawning external tool invocations.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Short name of the program, for error messages.
    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Spawn the process with stderr piped for line-at-a-time reading.
    ///
    /// stdout and stdin are discarded; the tools driven here communicate
    /// exclusively over the stderr status stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] if the program does not exist, or
    /// [`Error::ToolFailed`] for any other spawn failure.
    pub fn spawn(&self) -> Result<StatusLines> {
        let tool = self.program_name();
        tracing::debug!(tool = %tool, args = ?self.args, "spawning");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(&tool)
                } else {
                    Error::tool_failed(&tool, format!("failed to spawn: {e}"))
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::tool_failed(&tool, "stderr was not captured"))?;

        Ok(StatusLines {
            tool,
            child,
            reader: BufReader::new(stderr),
            skip_lf: false,
        })
    }
}

/// A running tool whose status stream is read one line at a time.
///
/// Lines are yielded in strict arrival order, as soon as each is available.
/// Both `\r` and `\n` terminate a line; a `\r\n` pair counts once.
#[derive(Debug)]
pub struct StatusLines {
    tool: String,
    child: Child,
    reader: BufReader<ChildStderr>,
    // A line was just terminated by '\r'; swallow one following '\n'.
    skip_lf: bool,
}

impl StatusLines {
    /// Name of the running tool.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Read the next status line, or `None` once the stream closes.
    ///
    /// A line ends at the first `\r` or `\n`, whichever comes first, and is
    /// returned as soon as its terminator arrives. The check for the `\n`
    /// half of a `\r\n` pair is deferred to the next call so a line ending
    /// in a bare `\r` is never held back waiting for more output.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        loop {
            let (consumed, terminated) = {
                let chunk = self.reader.fill_buf().await?;
                if chunk.is_empty() {
                    self.skip_lf = false;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
                }

                let mut start = 0;
                if self.skip_lf {
                    self.skip_lf = false;
                    if chunk[0] == b'\n' {
                        start = 1;
                    }
                }

                match chunk[start..]
                    .iter()
                    .position(|&b| b == b'\r' || b == b'\n')
                {
                    Some(pos) => {
                        buf.extend_from_slice(&chunk[start..start + pos]);
                        self.skip_lf = chunk[start + pos] == b'\r';
                        (start + pos + 1, true)
                    }
                    None => {
                        buf.extend_from_slice(&chunk[start..]);
                        (chunk.len(), false)
                    }
                }
            };
            self.reader.consume(consumed);
            if terminated {
                return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
            }
        }
    }

    /// Wait for the process to exit.
    pub async fn wait(mut self) -> Result<ExitStatus> {
        self.child.wait().await.map_err(Error::Io)
    }

    /// Kill the process, e.g. on caller-requested cancellation or timeout.
    pub async fn kill(&mut self) -> Result<()> {
        self.child.kill().await.map_err(Error::Io)
    }
}
