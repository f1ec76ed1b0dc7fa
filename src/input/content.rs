use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// One slide/page of the source document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Narration script written for this section.
    #[serde(default)]
    pub narration: Option<String>,
    /// Rendered page/slide image.
    #[serde(default)]
    pub visual: Option<PathBuf>,
}

impl ContentSection {
    /// Text used to estimate speaking time when no audio duration is known.
    pub fn spoken_text(&self) -> String {
        match &self.narration {
            Some(n) if !n.trim().is_empty() => n.clone(),
            _ => self.key_points.join(" "),
        }
    }
}

/// Ordered sections of the document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentStructure {
    #[serde(default)]
    pub title: Option<String>,
    pub sections: Vec<ContentSection>,
}

/// Narration audio for one section or transition as delivered by the speech collaborator.
///
/// `duration` may be omitted; it is then resolved by probing the file or estimating from text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSegmentSpec {
    pub section_index: usize,
    pub path: PathBuf,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Narration audio with a known spoken duration in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSegment {
    pub section_index: usize,
    pub path: PathBuf,
    pub duration: f64,
}

/// Section audio plus the optional transition audio list.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSegments {
    #[serde(default)]
    pub sections: Vec<AudioSegment>,
    #[serde(default)]
    pub transitions: Vec<AudioSegment>,
}

impl AudioSegments {
    /// First section segment whose index equals `section_index`.
    pub fn section(&self, section_index: usize) -> Option<&AudioSegment> {
        self.sections
            .iter()
            .find(|s| s.section_index == section_index)
    }

    /// First transition segment keyed by the outgoing section index.
    pub fn transition_from(&self, section_index: usize) -> Option<&AudioSegment> {
        self.transitions
            .iter()
            .find(|s| s.section_index == section_index)
    }
}

/// Unresolved audio lists as they appear in a job document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSpecs {
    #[serde(default)]
    pub sections: Vec<AudioSegmentSpec>,
    #[serde(default)]
    pub transitions: Vec<AudioSegmentSpec>,
}

/// Everything one pipeline run consumes: content structure plus narration audio.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobSpec {
    pub content: ContentStructure,
    #[serde(default)]
    pub audio: AudioSpecs,
}

impl JobSpec {
    /// Read a job JSON document. Relative paths resolve against the document's directory.
    pub fn from_json_file(path: &Path) -> SlidecastResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open job document '{}'", path.display()))?;
        let mut job: JobSpec = serde_json::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        job.resolve_relative_paths(base);
        job.validate()?;
        Ok(job)
    }

    pub fn resolve_relative_paths(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for section in &mut self.content.sections {
            if let Some(v) = section.visual.as_mut() {
                fix(v);
            }
        }
        for seg in self
            .audio
            .sections
            .iter_mut()
            .chain(self.audio.transitions.iter_mut())
        {
            fix(&mut seg.path);
        }
    }

    pub fn validate(&self) -> SlidecastResult<()> {
        for seg in self.audio.sections.iter().chain(&self.audio.transitions) {
            if let Some(d) = seg.duration
                && (!d.is_finite() || d < 0.0)
            {
                return Err(SlidecastError::validation(format!(
                    "audio for section {} has invalid duration {d}",
                    seg.section_index
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/content.rs"]
mod tests;
