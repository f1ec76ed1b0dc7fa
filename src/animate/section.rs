use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{ImageFormat, RgbImage};
use rayon::prelude::*;

use crate::{
    animate::records::{AnimationSet, SectionAnimation, TransitionAnimation},
    assets::{
        cache::{ImageCache, existing_visual},
        fit::blank_canvas,
    },
    effects::{
        engine::{apply_effects, sample_effects},
        transitions::synthesize,
    },
    foundation::{
        core::{Fps, Resolution, frame_file_name, time_position},
        error::{SlidecastError, SlidecastResult},
    },
    input::content::{AudioSegments, ContentStructure},
    style::preset::StylePreset,
};

/// Frame rendering parallelism.
#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    /// Render the frames of a section on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Turns sections into on-disk frame sequences under a single work directory.
///
/// Owns the run's [`ImageCache`]; every section fetches its fitted base canvas once and renders
/// each frame from a fresh copy.
#[derive(Debug)]
pub struct SectionAnimator {
    style: StylePreset,
    resolution: Resolution,
    fps: Fps,
    work_dir: PathBuf,
    cache: ImageCache,
    threading: RenderThreading,
}

impl SectionAnimator {
    pub fn new(
        style: StylePreset,
        resolution: Resolution,
        fps: Fps,
        work_dir: impl Into<PathBuf>,
    ) -> SlidecastResult<Self> {
        Ok(Self {
            style,
            resolution: resolution.validate()?,
            fps,
            work_dir: work_dir.into(),
            cache: ImageCache::new(),
            threading: RenderThreading::default(),
        })
    }

    pub fn with_threading(mut self, threading: RenderThreading) -> Self {
        self.threading = threading;
        self
    }

    pub fn style(&self) -> &StylePreset {
        &self.style
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Animate every section that has narration audio, then bridge consecutive ones.
    ///
    /// Sections without a matching audio segment are skipped with a warning.
    pub fn create_animations(
        &self,
        content: &ContentStructure,
        audio: &AudioSegments,
    ) -> SlidecastResult<AnimationSet> {
        tracing::info!(
            sections = content.sections.len(),
            style = self.style.name.as_str(),
            complexity = self.style.complexity.as_str(),
            "creating animations"
        );

        let mut sections = Vec::with_capacity(content.sections.len());
        for (idx, section) in content.sections.iter().enumerate() {
            let Some(segment) = audio.section(idx) else {
                tracing::warn!(section = idx + 1, "no audio segment found, skipping section");
                continue;
            };
            sections.push(self.animate_section(idx, section.visual.as_deref(), segment.duration)?);
        }

        let transitions = sections
            .windows(2)
            .map(|pair| self.animate_transition(&pair[0], &pair[1]))
            .collect::<SlidecastResult<Vec<_>>>()?;

        let set = AnimationSet {
            sections,
            transitions,
            style: self.style.name,
            resolution: self.resolution,
            fps: self.fps,
        };
        tracing::info!(
            segments = set.sections.len(),
            transitions = set.transitions.len(),
            total_secs = set.total_duration(),
            "created animation segments"
        );
        Ok(set)
    }

    /// Render the frames of one section covering `narration_duration` seconds.
    ///
    /// A missing or unreadable visual degrades to plain white frames; the frame count is
    /// unaffected.
    #[tracing::instrument(skip(self, visual), fields(section = section_index + 1))]
    pub fn animate_section(
        &self,
        section_index: usize,
        visual: Option<&Path>,
        narration_duration: f64,
    ) -> SlidecastResult<SectionAnimation> {
        let frame_directory = self
            .work_dir
            .join(format!("section_{}_frames", section_index + 1));
        create_dir(&frame_directory)?;

        let count = self.fps.frame_count_for(narration_duration);
        let base = self.prepare_base(section_index, visual)?;
        let static_png = encode_png(base.as_ref().unwrap_or(&blank_canvas(self.resolution)))?;

        let render = |idx: usize| -> SlidecastResult<PathBuf> {
            let path = frame_directory.join(frame_file_name(idx));
            let t = time_position(idx, count);
            let animated = sample_effects(t, self.style.complexity)?.is_some();
            match &base {
                Some(base) if animated => {
                    effect_or_base(apply_effects(base, t, self.style.complexity), base, idx)?
                        .save_with_format(&path, ImageFormat::Png)?;
                }
                _ => std::fs::write(&path, &static_png)
                    .with_context(|| format!("write frame '{}'", path.display()))?,
            }
            Ok(path)
        };

        let frame_paths = if self.threading.parallel {
            let pool = build_thread_pool(self.threading.threads)?;
            pool.install(|| {
                (0..count)
                    .into_par_iter()
                    .map(render)
                    .collect::<SlidecastResult<Vec<_>>>()
            })?
        } else {
            (0..count)
                .map(render)
                .collect::<SlidecastResult<Vec<_>>>()?
        };

        tracing::debug!(frames = frame_paths.len(), "rendered section");
        Ok(SectionAnimation {
            section_index,
            frame_directory,
            frame_paths,
            duration: narration_duration,
            fps: self.fps,
            style: self.style.name,
        })
    }

    /// Synthesize the transition between two animated sections using the style's kind/duration.
    pub fn animate_transition(
        &self,
        from: &SectionAnimation,
        to: &SectionAnimation,
    ) -> SlidecastResult<TransitionAnimation> {
        let frame_directory = self.work_dir.join(format!(
            "transition_{}_to_{}_frames",
            from.section_index, to.section_index
        ));
        let frame_paths = synthesize(
            &from.frame_paths,
            &to.frame_paths,
            self.style.transition,
            self.style.transition_duration,
            self.fps,
            self.resolution,
            &frame_directory,
        )?;
        Ok(TransitionAnimation {
            from_section_index: from.section_index,
            to_section_index: to.section_index,
            frame_directory,
            frame_paths,
            duration: self.style.transition_duration,
            fps: self.fps,
            transition: self.style.transition,
        })
    }

    fn prepare_base(
        &self,
        section_index: usize,
        visual: Option<&Path>,
    ) -> SlidecastResult<Option<RgbImage>> {
        let Some(path) = existing_visual(visual) else {
            tracing::warn!(
                section = section_index + 1,
                visual = ?visual,
                "no visual content found, rendering blank frames"
            );
            return Ok(None);
        };
        match self.cache.fitted_canvas(path, self.resolution) {
            Ok(canvas) => Ok(Some(canvas)),
            Err(e) if e.is_frame_soft() => {
                tracing::error!(
                    section = section_index + 1,
                    path = %path.display(),
                    error = %e,
                    "failed to prepare base image, rendering blank frames"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Only frame-soft effect failures fall back to the unanimated base frame.
fn effect_or_base(
    effected: SlidecastResult<RgbImage>,
    base: &RgbImage,
    idx: usize,
) -> SlidecastResult<RgbImage> {
    match effected {
        Ok(frame) => Ok(frame),
        Err(e) if e.is_frame_soft() => {
            tracing::warn!(frame = idx, error = %e, "effect failed, using base frame");
            Ok(base.clone())
        }
        Err(e) => Err(e),
    }
}

fn create_dir(dir: &Path) -> SlidecastResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create frame directory '{}'", dir.display()))?;
    Ok(())
}

fn encode_png(img: &RgbImage) -> SlidecastResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn build_thread_pool(threads: Option<usize>) -> SlidecastResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SlidecastError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlidecastError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/animate/section.rs"]
mod tests;
