use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::settings::OutputSettings,
    foundation::{
        core::{Fps, Resolution},
        error::{SlidecastError, SlidecastResult},
    },
};

/// Tolerance used when comparing audio and clip durations.
const DURATION_EPSILON: f64 = 1e-3;

/// How a clip's narration is fitted to the clip duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFit {
    /// Audio is longer and gets cut at the clip duration.
    Trim,
    /// Audio is shorter and gets padded with silence.
    Pad,
    Exact,
}

impl AudioFit {
    pub fn classify(audio_duration: f64, clip_duration: f64) -> Self {
        if audio_duration > clip_duration + DURATION_EPSILON {
            Self::Trim
        } else if audio_duration + DURATION_EPSILON < clip_duration {
            Self::Pad
        } else {
            Self::Exact
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipAudio {
    pub path: PathBuf,
    pub duration: f64,
    pub fit: AudioFit,
}

/// Everything a backend needs to write one normalized clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPlan {
    /// Position in the final timeline.
    pub index: usize,
    pub frame_paths: Vec<PathBuf>,
    /// Target clip duration; overrides the frame-count-derived one.
    pub duration: f64,
    pub resolution: Resolution,
    /// Output frame rate.
    pub fps: Fps,
    /// `None` means a silent track is generated.
    pub audio: Option<ClipAudio>,
    pub out_path: PathBuf,
}

impl ClipPlan {
    /// Rate at which the input frames are read so they span exactly `duration`.
    pub fn input_rate(&self) -> f64 {
        if self.duration > 0.0 {
            self.frame_paths.len() as f64 / self.duration
        } else {
            self.fps.as_f64()
        }
    }

    /// Duration the frames would cover at the output rate.
    pub fn natural_duration(&self) -> f64 {
        self.fps.frames_to_secs(self.frame_paths.len() as u64)
    }
}

/// Media tooling behind the encoder.
///
/// Implementations must leave `plan.out_path` complete on `Ok` and must not keep child processes
/// or file handles alive after returning.
pub trait MediaBackend {
    /// Fail with an encoding error when the tooling is unusable.
    fn check_available(&self) -> SlidecastResult<()>;
    /// Encode one clip at the plan's resolution, duration and audio layout.
    fn write_clip(&mut self, plan: &ClipPlan, settings: &OutputSettings) -> SlidecastResult<()>;
    /// Join `clips` in order into `out_path`.
    fn concat_clips(
        &mut self,
        clips: &[PathBuf],
        out_path: &Path,
        settings: &OutputSettings,
    ) -> SlidecastResult<()>;
}

/// Backend that records plans and writes placeholder files. Used for tests and dry runs.
#[derive(Debug)]
pub struct RecordingBackend {
    available: bool,
    clips: Vec<ClipPlan>,
    concatenated: Vec<PathBuf>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            available: true,
            clips: Vec::new(),
            concatenated: Vec::new(),
        }
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose availability check fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn clips(&self) -> &[ClipPlan] {
        &self.clips
    }

    /// Clip paths passed to the last concatenation.
    pub fn concatenated(&self) -> &[PathBuf] {
        &self.concatenated
    }
}

impl MediaBackend for RecordingBackend {
    fn check_available(&self) -> SlidecastResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(SlidecastError::encoding("recording backend marked unavailable"))
        }
    }

    fn write_clip(&mut self, plan: &ClipPlan, _settings: &OutputSettings) -> SlidecastResult<()> {
        std::fs::write(&plan.out_path, plan.frame_paths.len().to_string())
            .with_context(|| format!("write clip '{}'", plan.out_path.display()))?;
        self.clips.push(plan.clone());
        Ok(())
    }

    fn concat_clips(
        &mut self,
        clips: &[PathBuf],
        out_path: &Path,
        _settings: &OutputSettings,
    ) -> SlidecastResult<()> {
        let mut listing = String::new();
        for clip in clips {
            if !clip.is_file() {
                return Err(SlidecastError::encoding(format!(
                    "clip '{}' is missing",
                    clip.display()
                )));
            }
            listing.push_str(&clip.display().to_string());
            listing.push('\n');
        }
        std::fs::write(out_path, listing)
            .with_context(|| format!("write output '{}'", out_path.display()))?;
        self.concatenated = clips.to_vec();
        Ok(())
    }
}
