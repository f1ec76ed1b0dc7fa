use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Deserialize as _;

use crate::{
    animate::section::RenderThreading,
    encode::settings::OutputSettings,
    foundation::{
        core::{Fps, Resolution},
        error::{SlidecastError, SlidecastResult},
    },
    input::timing::TimingOptions,
    style::preset::{Complexity, StylePreset, TransitionKind, resolve_style},
};

/// Run-wide settings, loaded from JSON and then overridden from the command line.
///
/// Every field has a default, so `{}` is a valid config document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Output canvas. Accepts `[w, h]`, `{"width": w, "height": h}` or `"WxH"`.
    #[serde(deserialize_with = "deserialize_resolution")]
    pub resolution: Resolution,
    pub fps: u32,
    /// Style preset name; unknown names fall back to `standard`.
    pub style: String,
    /// Replaces the preset's complexity tier when set.
    pub complexity: Option<Complexity>,
    /// Replaces the preset's transition kind when set; unknown names fall back to `fade`.
    pub transition: Option<String>,
    /// Parent of the per-run work directory.
    pub temp_dir: PathBuf,
    pub parallel_frames: bool,
    pub render_threads: Option<usize>,
    #[serde(flatten)]
    pub timing: TimingOptions,
    pub output: OutputSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            fps: 30,
            style: "standard".to_owned(),
            complexity: None,
            transition: None,
            temp_dir: PathBuf::from("temp"),
            parallel_frames: false,
            render_threads: None,
            timing: TimingOptions::default(),
            output: OutputSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> SlidecastResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: PipelineConfig = serde_json::from_reader(BufReader::new(f))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SlidecastResult<()> {
        if self.fps == 0 {
            return Err(SlidecastError::validation("fps must be > 0"));
        }
        let res = self.resolution.validate()?;
        if !res.width.is_multiple_of(2) || !res.height.is_multiple_of(2) {
            return Err(SlidecastError::validation(format!(
                "resolution {res} must have even width/height (required for yuv420p output)"
            )));
        }
        if self.render_threads == Some(0) {
            return Err(SlidecastError::validation("render_threads must be > 0"));
        }
        self.timing.validate()?;
        self.output.validate()
    }

    pub fn frame_rate(&self) -> SlidecastResult<Fps> {
        Fps::integer(self.fps)
    }

    /// Preset named by `style` with the complexity and transition overrides applied.
    pub fn style_preset(&self) -> StylePreset {
        let mut preset = resolve_style(&self.style);
        if let Some(c) = self.complexity {
            preset = preset.with_complexity(c);
        }
        if let Some(kind) = self.transition.as_deref() {
            preset.transition = TransitionKind::parse_lenient(kind);
        }
        preset
    }

    pub fn threading(&self) -> RenderThreading {
        RenderThreading {
            parallel: self.parallel_frames,
            threads: self.render_threads,
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ResolutionRepr {
    Pair([u32; 2]),
    Object { width: u32, height: u32 },
    Text(String),
}

fn deserialize_resolution<'de, D>(de: D) -> Result<Resolution, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match ResolutionRepr::deserialize(de)? {
        ResolutionRepr::Pair([width, height]) | ResolutionRepr::Object { width, height } => {
            Ok(Resolution::new(width, height))
        }
        ResolutionRepr::Text(s) => Resolution::parse(&s).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
