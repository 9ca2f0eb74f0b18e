//! Conversion option model and ffmpeg argument construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parse::extract::format_timestamp;

/// Predefined output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoSize {
    /// 1920x1080.
    Hd1080,
    /// 1280x720.
    Hd720,
    /// 852x480.
    Hd480,
    /// 640x480.
    Ntsc,
    /// 720x576.
    Pal,
    /// Explicit width and height.
    Custom { width: u32, height: u32 },
}

impl VideoSize {
    fn dimensions(self) -> (u32, u32) {
        match self {
            VideoSize::Hd1080 => (1920, 1080),
            VideoSize::Hd720 => (1280, 720),
            VideoSize::Hd480 => (852, 480),
            VideoSize::Ntsc => (640, 480),
            VideoSize::Pal => (720, 576),
            VideoSize::Custom { width, height } => (width, height),
        }
    }
}

/// Display aspect ratio for the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    R4x3,
    R16x9,
    R16x10,
}

impl AspectRatio {
    fn as_arg(self) -> &'static str {
        match self {
            AspectRatio::R4x3 => "4:3",
            AspectRatio::R16x9 => "16:9",
            AspectRatio::R16x10 => "16:10",
        }
    }
}

/// Output audio sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioSampleRate {
    Hz22050,
    Hz44100,
    Hz48000,
}

impl AudioSampleRate {
    fn as_hz(self) -> u32 {
        match self {
            AudioSampleRate::Hz22050 => 22050,
            AudioSampleRate::Hz44100 => 44100,
            AudioSampleRate::Hz48000 => 48000,
        }
    }
}

/// Consumer disc target format, mapped to ffmpeg's `-target` presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Dvd,
    Vcd,
    Svcd,
}

impl Target {
    fn name(self) -> &'static str {
        match self {
            Target::Dvd => "dvd",
            Target::Vcd => "vcd",
            Target::Svcd => "svcd",
        }
    }
}

/// Television standard qualifying a disc [`Target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStandard {
    Pal,
    Ntsc,
    Film,
}

impl TargetStandard {
    fn prefix(self) -> &'static str {
        match self {
            TargetStandard::Pal => "pal",
            TargetStandard::Ntsc => "ntsc",
            TargetStandard::Film => "film",
        }
    }
}

/// A source crop region in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRectangle {
    /// Left edge of the region.
    pub x: u32,
    /// Top edge of the region.
    pub y: u32,
    /// Region width.
    pub width: u32,
    /// Region height.
    pub height: u32,
}

/// Options controlling a conversion or thumbnail request.
///
/// Every field is optional; defaults leave the corresponding property
/// untouched and let ffmpeg decide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Seek into the input before processing.
    pub seek: Option<Duration>,
    /// Stop after processing this much input.
    pub max_video_duration: Option<Duration>,
    /// Output frame size.
    pub video_size: Option<VideoSize>,
    /// Output display aspect ratio.
    pub video_aspect_ratio: Option<AspectRatio>,
    /// Output frame rate.
    pub video_fps: Option<u32>,
    /// Output video bit rate in kbit/s.
    pub video_bit_rate_kbps: Option<u32>,
    /// Output audio sample rate.
    pub audio_sample_rate: Option<AudioSampleRate>,
    /// Disc target preset; overrides the individual codec settings.
    pub target: Option<(Target, TargetStandard)>,
    /// Crop the source to a region before scaling.
    pub source_crop: Option<CropRectangle>,
}

impl ConversionOptions {
    /// Cut a section out of the media: seek to `start`, keep `length`.
    pub fn cut(&mut self, start: Duration, length: Duration) -> &mut Self {
        self.seek = Some(start);
        self.max_video_duration = Some(length);
        self
    }

    /// Build the ffmpeg argument vector for these options.
    ///
    /// Arguments are emitted in a stable order: trim first, then the target
    /// preset or the individual video settings, then audio settings.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(seek) = self.seek {
            args.extend(["-ss".to_string(), format_timestamp(seek)]);
        }

        if let Some(duration) = self.max_video_duration {
            args.extend(["-t".to_string(), format_timestamp(duration)]);
        }

        if let Some((target, standard)) = self.target {
            args.extend([
                "-target".to_string(),
                format!("{}-{}", standard.prefix(), target.name()),
            ]);
        }

        if let Some(crop) = self.source_crop {
            args.extend([
                "-filter:v".to_string(),
                format!(
                    "crop={}:{}:{}:{}",
                    crop.width, crop.height, crop.x, crop.y
                ),
            ]);
        }

        if let Some(size) = self.video_size {
            let (width, height) = size.dimensions();
            args.extend(["-s".to_string(), format!("{width}x{height}")]);
        }

        if let Some(aspect) = self.video_aspect_ratio {
            args.extend(["-aspect".to_string(), aspect.as_arg().to_string()]);
        }

        if let Some(fps) = self.video_fps {
            args.extend(["-r".to_string(), fps.to_string()]);
        }

        if let Some(rate) = self.video_bit_rate_kbps {
            args.extend(["-b:v".to_string(), format!("{rate}k")]);
        }

        if let Some(rate) = self.audio_sample_rate {
            args.extend(["-ar".to_string(), rate.as_hz().to_string()]);
        }

        args
    }
}
