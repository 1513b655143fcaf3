//! Job configuration types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use playblast_common::config::PlayblastDefaults;
use playblast_common::error::PlayblastError;
use playblast_host_core::{ContainerFormat, FileFormat, SceneState, VideoCodec};
use serde::{Deserialize, Deserializer, Serialize};

/// Smallest value accepted for frames and pixel dimensions.
pub const MIN_POSITIVE: u32 = 1;

/// What kind of output a playblast writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// One encoded movie file.
    #[default]
    Video,
    /// One PNG per frame.
    ImageSequence,
}

impl ExportFormat {
    /// Output mode written into the host's render settings.
    pub fn host_format(&self) -> FileFormat {
        match self {
            ExportFormat::Video => FileFormat::Ffmpeg,
            ExportFormat::ImageSequence => FileFormat::Png,
        }
    }

    /// Label shown in the configuration dialog.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Video => "Video",
            ExportFormat::ImageSequence => "Image Sequence",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Video => f.write_str("video"),
            ExportFormat::ImageSequence => f.write_str("image-sequence"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "video" | "ffmpeg" | "movie" => Ok(ExportFormat::Video),
            "image-sequence" | "images" | "sequence" | "png" => Ok(ExportFormat::ImageSequence),
            _ => Err(PlayblastError::config(format!(
                "Unknown format: {s}. Use: video, image-sequence"
            ))),
        }
    }
}

/// Resolution percentage, always within 1-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u32")]
pub struct ResolutionScale(u32);

impl ResolutionScale {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    /// Clamp `percent` into the valid range.
    pub fn new(percent: i64) -> Self {
        Self(percent.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for ResolutionScale {
    fn default() -> Self {
        Self(75)
    }
}

impl From<ResolutionScale> for u32 {
    fn from(scale: ResolutionScale) -> Self {
        scale.0
    }
}

impl<'de> Deserialize<'de> for ResolutionScale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(ResolutionScale::new(raw))
    }
}

fn clamp_positive(value: i64) -> u32 {
    value.clamp(MIN_POSITIVE as i64, u32::MAX as i64) as u32
}

fn deserialize_positive<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_positive(raw))
}

/// Parse a configured default, falling back to the built-in default string.
fn parse_or_default<T>(field: &str, raw: &str, builtin: &str) -> T
where
    T: FromStr<Err = PlayblastError> + Default + fmt::Debug,
{
    raw.parse().unwrap_or_else(|e| {
        let fallback = builtin.parse().unwrap_or_default();
        tracing::warn!(
            field,
            value = raw,
            error = %e,
            ?fallback,
            "Invalid default, using fallback"
        );
        fallback
    })
}

/// User-chosen parameters of one playblast.
///
/// Each setter clamps its value to the field's bounds. Whether codec and
/// container matter (only for video) and whether the frame range is ordered
/// are not checked here; see [`crate::dialog::advisories`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    output_directory: PathBuf,
    file_name: String,
    file_format: ExportFormat,
    video_codec: VideoCodec,
    container_format: ContainerFormat,
    resolution_scale: ResolutionScale,
    #[serde(deserialize_with = "deserialize_positive")]
    resolution_x: u32,
    #[serde(deserialize_with = "deserialize_positive")]
    resolution_y: u32,
    #[serde(deserialize_with = "deserialize_positive")]
    start_frame: u32,
    #[serde(deserialize_with = "deserialize_positive")]
    end_frame: u32,
}

impl JobConfiguration {
    /// Build a configuration from configured defaults and an explicit frame range.
    pub fn from_defaults(defaults: &PlayblastDefaults, start_frame: i64, end_frame: i64) -> Self {
        let builtin = PlayblastDefaults::default();
        Self {
            output_directory: PathBuf::from(&defaults.output_directory),
            file_name: defaults.file_name.clone(),
            file_format: parse_or_default(
                "file_format",
                &defaults.file_format,
                &builtin.file_format,
            ),
            video_codec: parse_or_default(
                "video_codec",
                &defaults.video_codec,
                &builtin.video_codec,
            ),
            container_format: parse_or_default(
                "container_format",
                &defaults.container_format,
                &builtin.container_format,
            ),
            resolution_scale: ResolutionScale::new(defaults.resolution_scale as i64),
            resolution_x: clamp_positive(defaults.resolution_x as i64),
            resolution_y: clamp_positive(defaults.resolution_y as i64),
            start_frame: clamp_positive(start_frame),
            end_frame: clamp_positive(end_frame),
        }
    }

    /// Seed a configuration from the scene's current playback range.
    ///
    /// The range is read once; later changes to the scene do not reach this
    /// configuration.
    pub fn from_scene<S>(scene: &S, defaults: &PlayblastDefaults) -> Self
    where
        S: SceneState + ?Sized,
    {
        Self::from_defaults(
            defaults,
            scene.frame_start() as i64,
            scene.frame_end() as i64,
        )
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn set_output_directory(&mut self, directory: impl Into<PathBuf>) {
        self.output_directory = directory.into();
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    pub fn file_format(&self) -> ExportFormat {
        self.file_format
    }

    pub fn set_file_format(&mut self, format: ExportFormat) {
        self.file_format = format;
    }

    /// Only meaningful for [`ExportFormat::Video`].
    pub fn video_codec(&self) -> VideoCodec {
        self.video_codec
    }

    pub fn set_video_codec(&mut self, codec: VideoCodec) {
        self.video_codec = codec;
    }

    /// Only meaningful for [`ExportFormat::Video`].
    pub fn container_format(&self) -> ContainerFormat {
        self.container_format
    }

    pub fn set_container_format(&mut self, container: ContainerFormat) {
        self.container_format = container;
    }

    pub fn resolution_scale(&self) -> ResolutionScale {
        self.resolution_scale
    }

    pub fn set_resolution_scale(&mut self, percent: i64) {
        self.resolution_scale = ResolutionScale::new(percent);
    }

    pub fn resolution_x(&self) -> u32 {
        self.resolution_x
    }

    pub fn set_resolution_x(&mut self, pixels: i64) {
        self.resolution_x = clamp_positive(pixels);
    }

    pub fn resolution_y(&self) -> u32 {
        self.resolution_y
    }

    pub fn set_resolution_y(&mut self, pixels: i64) {
        self.resolution_y = clamp_positive(pixels);
    }

    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    pub fn set_start_frame(&mut self, frame: i64) {
        self.start_frame = clamp_positive(frame);
    }

    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    pub fn set_end_frame(&mut self, frame: i64) {
        self.end_frame = clamp_positive(frame);
    }

    /// Whether `start_frame <= end_frame`.
    pub fn has_ordered_range(&self) -> bool {
        self.start_frame <= self.end_frame
    }

    /// Final output size in pixels after the resolution scale is applied.
    pub fn effective_resolution(&self) -> (u32, u32) {
        let scale = self.resolution_scale.get() as u64;
        let scaled = |px: u32| ((px as u64 * scale) / 100).max(1) as u32;
        (scaled(self.resolution_x), scaled(self.resolution_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playblast_host_core::HostState;
    use proptest::prelude::*;

    fn job() -> JobConfiguration {
        JobConfiguration::from_defaults(&PlayblastDefaults::default(), 1, 250)
    }

    #[test]
    fn test_defaults_seed_every_field() {
        let job = job();
        assert_eq!(job.output_directory(), Path::new("//"));
        assert_eq!(job.file_name(), "playblast");
        assert_eq!(job.file_format(), ExportFormat::Video);
        assert_eq!(job.video_codec(), VideoCodec::H264);
        assert_eq!(job.container_format(), ContainerFormat::QuickTime);
        assert_eq!(job.resolution_scale().get(), 75);
        assert_eq!((job.resolution_x(), job.resolution_y()), (1920, 1080));
    }

    #[test]
    fn test_frames_seeded_from_scene_once() {
        let mut scene = HostState::default();
        scene.scene.frame_start = 12;
        scene.scene.frame_end = 96;

        let job = JobConfiguration::from_scene(&scene, &PlayblastDefaults::default());
        scene.scene.frame_end = 400;

        assert_eq!(job.start_frame(), 12);
        assert_eq!(job.end_frame(), 96);
    }

    #[test]
    fn test_unknown_default_strings_fall_back() {
        let defaults = PlayblastDefaults {
            file_format: "gif".to_string(),
            video_codec: "vp9".to_string(),
            container_format: "mkv".to_string(),
            ..PlayblastDefaults::default()
        };
        let job = JobConfiguration::from_defaults(&defaults, 1, 10);
        assert_eq!(job.file_format(), ExportFormat::Video);
        assert_eq!(job.video_codec(), VideoCodec::H264);
        assert_eq!(job.container_format(), ContainerFormat::QuickTime);
    }

    #[test]
    fn test_setters_clamp_to_bounds() {
        let mut job = job();
        job.set_resolution_scale(0);
        assert_eq!(job.resolution_scale().get(), 1);
        job.set_resolution_scale(250);
        assert_eq!(job.resolution_scale().get(), 100);
        job.set_resolution_x(-5);
        assert_eq!(job.resolution_x(), 1);
        job.set_start_frame(0);
        assert_eq!(job.start_frame(), 1);
    }

    #[test]
    fn test_inverted_range_is_stored_as_given() {
        let mut job = job();
        job.set_start_frame(20);
        job.set_end_frame(10);
        assert_eq!((job.start_frame(), job.end_frame()), (20, 10));
        assert!(!job.has_ordered_range());
    }

    #[test]
    fn test_effective_resolution_applies_scale() {
        let mut job = job();
        job.set_resolution_scale(50);
        assert_eq!(job.effective_resolution(), (960, 540));
        job.set_resolution_x(1);
        job.set_resolution_scale(1);
        assert_eq!(job.effective_resolution().0, 1);
    }

    #[test]
    fn test_deserialization_clamps_out_of_range_values() {
        let mut value = serde_json::to_value(job()).unwrap();
        value["resolution_scale"] = serde_json::json!(400);
        value["start_frame"] = serde_json::json!(-3);
        value["file_format"] = serde_json::json!("image-sequence");

        let parsed: JobConfiguration = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.resolution_scale().get(), 100);
        assert_eq!(parsed.start_frame(), 1);
        assert_eq!(parsed.file_format(), ExportFormat::ImageSequence);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("Video".parse::<ExportFormat>().unwrap(), ExportFormat::Video);
        assert_eq!(
            "image_sequence".parse::<ExportFormat>().unwrap(),
            ExportFormat::ImageSequence
        );
        assert!("gif".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::ImageSequence.host_format(), FileFormat::Png);
        assert_eq!(ExportFormat::Video.host_format(), FileFormat::Ffmpeg);
    }

    proptest! {
        #[test]
        fn resolution_scale_is_always_within_bounds(percent in any::<i64>()) {
            let scale = ResolutionScale::new(percent).get();
            prop_assert!((ResolutionScale::MIN..=ResolutionScale::MAX).contains(&scale));
        }

        #[test]
        fn frames_are_never_below_one(start in any::<i64>(), end in any::<i64>()) {
            let mut job = job();
            job.set_start_frame(start);
            job.set_end_frame(end);
            prop_assert!(job.start_frame() >= MIN_POSITIVE);
            prop_assert!(job.end_frame() >= MIN_POSITIVE);
        }
    }
}
