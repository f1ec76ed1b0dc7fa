use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Container and codec settings for the final video.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Container format, also used as the clip file extension.
    pub format: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub video_bitrate: String,
    pub audio_bitrate: String,
    /// Encoder threads handed to ffmpeg.
    pub threads: u32,
    /// x264 speed preset.
    pub preset: String,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "mp4".to_owned(),
            video_codec: "libx264".to_owned(),
            audio_codec: "aac".to_owned(),
            video_bitrate: "5000k".to_owned(),
            audio_bitrate: "192k".to_owned(),
            threads: 4,
            preset: "medium".to_owned(),
            overwrite: true,
        }
    }
}

impl OutputSettings {
    pub fn validate(&self) -> SlidecastResult<()> {
        let fields = [
            ("format", &self.format),
            ("video_codec", &self.video_codec),
            ("audio_codec", &self.audio_codec),
            ("video_bitrate", &self.video_bitrate),
            ("audio_bitrate", &self.audio_bitrate),
            ("preset", &self.preset),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(SlidecastError::validation(format!(
                    "output.{name} must not be empty"
                )));
            }
        }
        if self.threads == 0 {
            return Err(SlidecastError::validation("output.threads must be > 0"));
        }
        Ok(())
    }

    /// File name of the `idx`-th intermediate clip.
    pub fn clip_file_name(&self, idx: usize) -> String {
        format!("clip_{idx:04}.{}", self.format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/settings.rs"]
mod tests;
