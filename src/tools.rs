//! External tool detection and path resolution.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use mediaforge::tools::check_tool;
///
/// let info = check_tool("ffmpeg");
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    let result = Command::new(name).arg("-version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(name).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Resolve the path of a companion tool living next to `path`.
///
/// ffmpeg distributions ship ffprobe in the same directory as ffmpeg, so the
/// probe binary is located by swapping the file name while keeping the
/// directory and any platform extension (`.exe`) intact.
pub fn sibling_tool(path: &Path, name: &str) -> PathBuf {
    let mut sibling = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    };

    if let Some(ext) = path.extension() {
        sibling.set_extension(ext);
    }

    sibling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tool_not_found() {
        let info = check_tool("nonexistent_tool_12345");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn test_require_tool_not_found() {
        let result = require_tool("nonexistent_tool_12345");
        assert!(result.is_err());
    }

    #[test]
    fn sibling_tool_same_directory() {
        let ffprobe = sibling_tool(Path::new("/some/folder/path/ffmpeg"), "ffprobe");
        assert_eq!(ffprobe, PathBuf::from("/some/folder/path/ffprobe"));
    }

    #[test]
    fn sibling_tool_keeps_extension() {
        let ffprobe = sibling_tool(Path::new(r"c:\some\folder\ffmpeg.exe"), "ffprobe");
        assert_eq!(ffprobe.extension().and_then(|e| e.to_str()), Some("exe"));
        assert!(ffprobe.to_string_lossy().contains("ffprobe"));
    }

    #[test]
    fn sibling_tool_bare_name() {
        let ffprobe = sibling_tool(Path::new("ffmpeg"), "ffprobe");
        assert_eq!(ffprobe, PathBuf::from("ffprobe"));
    }
}
