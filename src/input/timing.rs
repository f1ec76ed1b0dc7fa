use std::{path::Path, process::Command};

use crate::{
    foundation::error::{SlidecastError, SlidecastResult},
    input::content::{AudioSegment, AudioSegmentSpec, AudioSegments, AudioSpecs, ContentStructure},
};

/// Knobs for filling in audio durations the speech collaborator did not report.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingOptions {
    /// Average speaking rate used for estimates.
    pub words_per_minute: u32,
    /// Lower bound for an estimated section duration, in seconds.
    pub min_section_duration: f64,
    /// Scales estimated durations (>1 slower, <1 faster).
    pub duration_multiplier: f64,
    /// Ask `ffprobe` for the real duration before estimating.
    pub probe_audio: bool,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            words_per_minute: 150,
            min_section_duration: 5.0,
            duration_multiplier: 1.0,
            probe_audio: true,
        }
    }
}

impl TimingOptions {
    pub fn validate(&self) -> SlidecastResult<()> {
        if self.words_per_minute == 0 {
            return Err(SlidecastError::validation("words_per_minute must be > 0"));
        }
        if !self.duration_multiplier.is_finite() || self.duration_multiplier <= 0.0 {
            return Err(SlidecastError::validation(
                "duration_multiplier must be finite and > 0",
            ));
        }
        if !self.min_section_duration.is_finite() || self.min_section_duration < 0.0 {
            return Err(SlidecastError::validation(
                "min_section_duration must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Seconds needed to speak `text` at `words_per_minute`.
pub fn speaking_duration_secs(text: &str, words_per_minute: u32) -> f64 {
    if words_per_minute == 0 {
        return 0.0;
    }
    let words = text.split_whitespace().count();
    words as f64 / f64::from(words_per_minute) * 60.0
}

/// Estimated narration length for `text`: at least `min_section_duration`, then scaled by
/// `duration_multiplier`.
pub fn estimate_duration(text: &str, opts: &TimingOptions) -> f64 {
    let base = speaking_duration_secs(text, opts.words_per_minute);
    base.max(opts.min_section_duration) * opts.duration_multiplier
}

/// Duration of a media file as reported by `ffprobe`, if it can be determined.
pub fn probe_duration(path: &Path) -> Option<f64> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Turn the job's audio specs into segments with concrete durations.
///
/// Reported durations are kept as-is. Missing ones are probed (when enabled and the file exists),
/// then estimated from the segment text or the section's narration.
pub fn resolve_audio(
    specs: &AudioSpecs,
    content: &ContentStructure,
    opts: &TimingOptions,
) -> SlidecastResult<AudioSegments> {
    opts.validate()?;
    let resolve = |spec: &AudioSegmentSpec| -> AudioSegment {
        AudioSegment {
            section_index: spec.section_index,
            path: spec.path.clone(),
            duration: resolve_one(spec, content, opts),
        }
    };
    Ok(AudioSegments {
        sections: specs.sections.iter().map(resolve).collect(),
        transitions: specs.transitions.iter().map(resolve).collect(),
    })
}

fn resolve_one(spec: &AudioSegmentSpec, content: &ContentStructure, opts: &TimingOptions) -> f64 {
    if let Some(d) = spec.duration {
        return d;
    }
    if opts.probe_audio
        && spec.path.is_file()
        && let Some(d) = probe_duration(&spec.path)
    {
        tracing::debug!(path = %spec.path.display(), duration = d, "probed audio duration");
        return d;
    }

    let text = match &spec.text {
        Some(t) if !t.trim().is_empty() => t.clone(),
        _ => content
            .sections
            .get(spec.section_index)
            .map(|s| s.spoken_text())
            .unwrap_or_default(),
    };
    let estimate = estimate_duration(&text, opts);
    tracing::warn!(
        section = spec.section_index + 1,
        estimate,
        "audio duration unknown, using a speaking-rate estimate"
    );
    estimate
}

#[cfg(test)]
#[path = "../../tests/unit/input/timing.rs"]
mod tests;
