use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    animate::records::{AnimationSet, SectionAnimation, TransitionAnimation},
    foundation::{
        core::{Fps, Resolution},
        error::SlidecastResult,
    },
    input::content::AudioSegments,
};

/// What a timeline element shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Segment {
        section_index: usize,
    },
    Transition {
        transition_index: usize,
        from_section_index: usize,
        to_section_index: usize,
    },
}

/// One clip of the final timeline: frames plus optional narration.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompositionElement {
    #[serde(flatten)]
    pub kind: ElementKind,
    pub frame_paths: Vec<PathBuf>,
    pub audio_path: Option<PathBuf>,
    pub audio_duration: Option<f64>,
    /// `max(visual duration, audio duration)`.
    pub duration: f64,
    pub frame_count: usize,
    pub fps: Fps,
    /// Offset of this element from the start of the timeline.
    pub start_sec: f64,
}

impl CompositionElement {
    pub fn is_segment(&self) -> bool {
        matches!(self.kind, ElementKind::Segment { .. })
    }

    pub fn has_audio(&self) -> bool {
        self.audio_path.is_some()
    }
}

/// Ordered timeline consumed by the encoder.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FinalComposition {
    pub elements: Vec<CompositionElement>,
    pub segment_count: usize,
    pub transition_count: usize,
    pub total_duration: f64,
    pub total_frame_count: usize,
    pub fps: Fps,
    pub resolution: Resolution,
}

impl FinalComposition {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Write the timeline as pretty JSON to `path`.
    pub fn write_manifest(&self, path: &Path) -> SlidecastResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create manifest directory '{}'", parent.display()))?;
        }
        let f = File::create(path)
            .with_context(|| format!("create manifest '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.flush()
            .with_context(|| format!("flush manifest '{}'", path.display()))?;
        Ok(())
    }
}

/// Build the final timeline from an [`AnimationSet`] and its resolved audio.
pub fn assemble_set(set: &AnimationSet, audio: &AudioSegments) -> FinalComposition {
    assemble(
        &set.sections,
        &set.transitions,
        audio,
        set.fps,
        set.resolution,
    )
}

/// Interleave sections and transitions into `seg0, trans0, seg1, trans1, ..., segN`.
///
/// A section without matching audio is dropped with a warning. A transition without audio stays
/// in as a silent element. A transition is inserted only between the two kept segments whose
/// indices it names, so dropping a section also drops the transitions on either side of it.
#[tracing::instrument(skip_all, fields(sections = sections.len(), transitions = transitions.len()))]
pub fn assemble(
    sections: &[SectionAnimation],
    transitions: &[TransitionAnimation],
    audio: &AudioSegments,
    fps: Fps,
    resolution: Resolution,
) -> FinalComposition {
    let mut sections = sections.iter().collect::<Vec<_>>();
    sections.sort_by_key(|s| s.section_index);
    let segments = sections
        .into_iter()
        .filter_map(|section| {
            let Some(seg) = audio.section(section.section_index) else {
                tracing::warn!(
                    section = section.section_index + 1,
                    "no audio for section, dropping it from the composition"
                );
                return None;
            };
            Some((
                section.section_index,
                element(
                    ElementKind::Segment {
                        section_index: section.section_index,
                    },
                    &section.frame_paths,
                    section.duration,
                    section.fps,
                    Some((seg.path.clone(), seg.duration)),
                ),
            ))
        })
        .collect::<Vec<_>>();

    let segment_count = segments.len();
    let mut elements = Vec::with_capacity(segment_count + transitions.len());
    let mut prev: Option<usize> = None;
    for (section_index, seg) in segments {
        if let Some(from) = prev {
            let bridge = transitions.iter().enumerate().find(|(_, t)| {
                t.from_section_index == from && t.to_section_index == section_index
            });
            match bridge {
                Some((idx, t)) => elements.push(transition_element(idx, t, audio)),
                None => tracing::debug!(
                    from,
                    to = section_index,
                    "no transition between adjacent segments"
                ),
            }
        }
        elements.push(seg);
        prev = Some(section_index);
    }
    let transition_count = elements.len() - segment_count;
    if transition_count < transitions.len() {
        tracing::debug!(
            unused = transitions.len() - transition_count,
            "transitions without matching neighbours were left out"
        );
    }

    let mut cursor = 0.0;
    for e in &mut elements {
        e.start_sec = cursor;
        cursor += e.duration;
    }

    let composition = FinalComposition {
        total_frame_count: elements.iter().map(|e| e.frame_count).sum(),
        total_duration: cursor,
        elements,
        segment_count,
        transition_count,
        fps,
        resolution,
    };
    tracing::info!(
        elements = composition.elements.len(),
        total_secs = composition.total_duration,
        total_frames = composition.total_frame_count,
        "assembled composition"
    );
    composition
}

fn transition_element(
    idx: usize,
    t: &TransitionAnimation,
    audio: &AudioSegments,
) -> CompositionElement {
    let seg = audio.transition_from(t.from_section_index);
    if seg.is_none() {
        tracing::debug!(
            from = t.from_section_index,
            to = t.to_section_index,
            "no audio for transition, keeping it silent"
        );
    }
    element(
        ElementKind::Transition {
            transition_index: idx,
            from_section_index: t.from_section_index,
            to_section_index: t.to_section_index,
        },
        &t.frame_paths,
        t.duration,
        t.fps,
        seg.map(|s| (s.path.clone(), s.duration)),
    )
}

/// `visual` is the record's own duration; the frame count may round away from it.
fn element(
    kind: ElementKind,
    frame_paths: &[PathBuf],
    visual: f64,
    fps: Fps,
    audio: Option<(PathBuf, f64)>,
) -> CompositionElement {
    let (audio_path, audio_duration) = match audio {
        Some((p, d)) => (Some(p), Some(d)),
        None => (None, None),
    };
    CompositionElement {
        kind,
        frame_paths: frame_paths.to_vec(),
        audio_path,
        audio_duration,
        duration: visual.max(audio_duration.unwrap_or(0.0)),
        frame_count: frame_paths.len(),
        fps,
        start_sec: 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/assemble.rs"]
mod tests;
