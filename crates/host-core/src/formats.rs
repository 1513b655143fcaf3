//! Enumerated values of the host's output settings.
//!
//! The `Display` form of each value is the identifier the host itself uses
//! (for example `FFMPEG` or `QUICKTIME`), so it can be written straight into
//! host scripts. `FromStr` also accepts friendlier spellings.

use std::fmt;
use std::str::FromStr;

use playblast_common::error::PlayblastError;
use serde::{Deserialize, Serialize};

/// Image/video output mode of the render settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FileFormat {
    #[default]
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "TIFF")]
    Tiff,
    #[serde(rename = "OPEN_EXR")]
    OpenExr,
    /// Encoded video through the host's FFmpeg output.
    #[serde(rename = "FFMPEG")]
    Ffmpeg,
}

/// Video codec used when the output mode is [`FileFormat::Ffmpeg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VideoCodec {
    #[default]
    #[serde(rename = "H264")]
    H264,
    #[serde(rename = "MPEG4")]
    Mpeg4,
}

/// Video container used when the output mode is [`FileFormat::Ffmpeg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContainerFormat {
    #[default]
    #[serde(rename = "MPEG4")]
    Mpeg4,
    #[serde(rename = "AVI")]
    Avi,
    #[serde(rename = "QUICKTIME")]
    QuickTime,
}

impl FileFormat {
    /// Host identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Png => "PNG",
            FileFormat::Jpeg => "JPEG",
            FileFormat::Tiff => "TIFF",
            FileFormat::OpenExr => "OPEN_EXR",
            FileFormat::Ffmpeg => "FFMPEG",
        }
    }

    /// Whether this mode encodes a single movie file rather than one file per frame.
    pub fn is_movie(&self) -> bool {
        matches!(self, FileFormat::Ffmpeg)
    }
}

impl VideoCodec {
    /// All codecs offered to the user.
    pub const ALL: [VideoCodec; 2] = [VideoCodec::H264, VideoCodec::Mpeg4];

    /// Host identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "H264",
            VideoCodec::Mpeg4 => "MPEG4",
        }
    }

    /// Label shown in the configuration dialog.
    pub fn label(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "H.264",
            VideoCodec::Mpeg4 => "MPEG4",
        }
    }
}

impl ContainerFormat {
    /// All containers offered to the user.
    pub const ALL: [ContainerFormat; 3] = [
        ContainerFormat::Mpeg4,
        ContainerFormat::Avi,
        ContainerFormat::QuickTime,
    ];

    /// Host identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFormat::Mpeg4 => "MPEG4",
            ContainerFormat::Avi => "AVI",
            ContainerFormat::QuickTime => "QUICKTIME",
        }
    }

    /// Label shown in the configuration dialog.
    pub fn label(&self) -> &'static str {
        match self {
            ContainerFormat::Mpeg4 => "MPEG4",
            ContainerFormat::Avi => "AVI",
            ContainerFormat::QuickTime => "QuickTime",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '_' | ' '))
        .collect::<String>()
        .to_uppercase()
}

impl FromStr for FileFormat {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "PNG" => Ok(FileFormat::Png),
            "JPEG" | "JPG" => Ok(FileFormat::Jpeg),
            "TIFF" | "TIF" => Ok(FileFormat::Tiff),
            "OPENEXR" | "EXR" => Ok(FileFormat::OpenExr),
            "FFMPEG" => Ok(FileFormat::Ffmpeg),
            _ => Err(PlayblastError::config(format!(
                "Unknown file format: {s}. Use: png, jpeg, tiff, open_exr, ffmpeg"
            ))),
        }
    }
}

impl FromStr for VideoCodec {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "H264" | "AVC" => Ok(VideoCodec::H264),
            "MPEG4" => Ok(VideoCodec::Mpeg4),
            _ => Err(PlayblastError::config(format!(
                "Unknown video codec: {s}. Use: h264, mpeg4"
            ))),
        }
    }
}

impl FromStr for ContainerFormat {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "MPEG4" | "MP4" => Ok(ContainerFormat::Mpeg4),
            "AVI" => Ok(ContainerFormat::Avi),
            "QUICKTIME" | "MOV" => Ok(ContainerFormat::QuickTime),
            _ => Err(PlayblastError::config(format!(
                "Unknown container: {s}. Use: mpeg4, avi, quicktime"
            ))),
        }
    }
}
