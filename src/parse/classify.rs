//! Line classification for ffmpeg status output.

/// Logical record family of one raw status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Input banner header carrying the container duration,
    /// e.g. `Duration: 00:00:59.89, start: 0.000000, bitrate: 1333 kb/s`.
    DurationHeader,
    /// Video stream descriptor,
    /// e.g. `Stream #0:0(und): Video: h264 (High), yuv420p, 1280x720, ...`.
    VideoStream,
    /// Audio stream descriptor,
    /// e.g. `Stream #0:1(und): Audio: aac (LC), 44100 Hz, stereo, ...`.
    AudioStream,
    /// Per-frame progress status line, including the final summary line,
    /// e.g. `frame=  171 fps= 85 q=28.0 size=     512kB time=00:00:06.84 ...`.
    ProgressStatus,
    /// Anything else. Dropped without error.
    Unclassified,
}

/// Classify one raw line of ffmpeg status output.
///
/// Classification is keyword and delimiter based, not a grammar: a line that
/// matches no known record family is [`LineKind::Unclassified`]. Leading and
/// trailing whitespace is ignored. Pure function, no side effects.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();

    if line.starts_with("Duration:") {
        return LineKind::DurationHeader;
    }

    if line.starts_with("Stream #") {
        if line.contains(": Video:") {
            return LineKind::VideoStream;
        }
        if line.contains(": Audio:") {
            return LineKind::AudioStream;
        }
        return LineKind::Unclassified;
    }

    // Progress lines always carry a time= field plus at least one other
    // known marker; requiring two keeps unrelated log lines out.
    if line.contains("time=")
        && (line.contains("frame=") || line.contains("size=") || line.contains("Lsize="))
    {
        return LineKind::ProgressStatus;
    }

    LineKind::Unclassified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_header() {
        let line = "  Duration: 00:00:59.89, start: 0.000000, bitrate: 1333 kb/s";
        assert_eq!(classify(line), LineKind::DurationHeader);
    }

    #[test]
    fn video_stream() {
        let line = "    Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720, 1205 kb/s, 25 fps, 25 tbr, 90k tbn, 50 tbc";
        assert_eq!(classify(line), LineKind::VideoStream);
    }

    #[test]
    fn video_stream_without_fps_marker() {
        // Some codecs report timing without an fps value at all.
        let line = "    Stream #0:1: Video: mjpeg, yuvj420p(pc), 200x198 [SAR 96:96 DAR 100:99], 90k tbr, 90k tbn, 90k tbc";
        assert_eq!(classify(line), LineKind::VideoStream);
    }

    #[test]
    fn audio_stream() {
        let line = "    Stream #0:1(und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo, fltp, 125 kb/s";
        assert_eq!(classify(line), LineKind::AudioStream);
    }

    #[test]
    fn progress_status() {
        let line = "frame=  171 fps= 85 q=28.0 size=     512kB time=00:00:06.84 bitrate= 613.2kbits/s speed=3.42x";
        assert_eq!(classify(line), LineKind::ProgressStatus);
    }

    #[test]
    fn final_summary_is_progress_status() {
        let line = "frame= 1498 fps=154 q=-1.0 Lsize=    9074kB time=00:00:59.84 bitrate=1242.1kbits/s speed=6.17x";
        assert_eq!(classify(line), LineKind::ProgressStatus);
    }

    #[test]
    fn unrelated_lines_are_unclassified() {
        assert_eq!(classify(""), LineKind::Unclassified);
        assert_eq!(
            classify("Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'BigBunny.m4v':"),
            LineKind::Unclassified
        );
        assert_eq!(
            classify("Press [q] to stop, [?] for help"),
            LineKind::Unclassified
        );
        assert_eq!(
            classify("Stream #0:2(und): Data: bin_data (text / 0x74786574)"),
            LineKind::Unclassified
        );
        // time= alone is not enough.
        assert_eq!(
            classify("Metadata: creation_time=2020-01-01"),
            LineKind::Unclassified
        );
    }

    #[test]
    fn whitespace_is_tolerated() {
        let line = "\t  Duration: 00:01:00.00, bitrate: 128 kb/s   ";
        assert_eq!(classify(line), LineKind::DurationHeader);
    }
}
