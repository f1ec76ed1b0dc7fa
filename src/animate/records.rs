use std::path::PathBuf;

use crate::{
    foundation::core::{Fps, Resolution},
    style::preset::{StyleName, TransitionKind},
};

/// Rendered frames of one document section.
///
/// `frame_paths.len() == max(1, round(duration * fps))`: the frame count is derived from the
/// narration duration, never the other way around.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionAnimation {
    /// Index of the content section (and of its narration audio).
    pub section_index: usize,
    pub frame_directory: PathBuf,
    /// Earliest to latest.
    pub frame_paths: Vec<PathBuf>,
    /// Seconds of narration this section covers.
    pub duration: f64,
    pub fps: Fps,
    pub style: StyleName,
}

impl SectionAnimation {
    pub fn frame_count(&self) -> usize {
        self.frame_paths.len()
    }
}

/// Rendered frames bridging two adjacent sections.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransitionAnimation {
    pub from_section_index: usize,
    pub to_section_index: usize,
    pub frame_directory: PathBuf,
    pub frame_paths: Vec<PathBuf>,
    /// Seconds, fixed by the style preset.
    pub duration: f64,
    pub fps: Fps,
    pub transition: TransitionKind,
}

impl TransitionAnimation {
    pub fn frame_count(&self) -> usize {
        self.frame_paths.len()
    }
}

/// All animated sections of a run plus the transitions between consecutive ones.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationSet {
    pub sections: Vec<SectionAnimation>,
    pub transitions: Vec<TransitionAnimation>,
    pub style: StyleName,
    pub resolution: Resolution,
    pub fps: Fps,
}

impl AnimationSet {
    /// Sum of section durations (transitions excluded).
    pub fn total_duration(&self) -> f64 {
        self.sections.iter().map(|s| s.duration).sum()
    }
}
