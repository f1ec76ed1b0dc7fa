use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    animate::section::SectionAnimator,
    assets::cache::CacheStats,
    compose::assemble::assemble_set,
    config::PipelineConfig,
    encode::{backend::MediaBackend, encoder::Encoder, ffmpeg::FfmpegBackend},
    foundation::error::{SlidecastError, SlidecastResult},
    input::{content::JobSpec, timing::resolve_audio},
    style::preset::StyleName,
};

/// Summary of one finished run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub manifest_path: PathBuf,
    /// Work directory, present only when it was kept.
    pub work_dir: Option<PathBuf>,
    pub style: StyleName,
    pub segment_count: usize,
    pub transition_count: usize,
    pub total_duration: f64,
    pub total_frame_count: usize,
    pub cache: CacheStats,
}

/// Animate, assemble and encode one job.
pub struct Pipeline<B: MediaBackend = FfmpegBackend> {
    config: PipelineConfig,
    backend: B,
    keep_temp: bool,
}

impl Pipeline<FfmpegBackend> {
    pub fn new(config: PipelineConfig) -> SlidecastResult<Self> {
        Self::with_backend(config, FfmpegBackend::new())
    }
}

impl<B: MediaBackend> Pipeline<B> {
    pub fn with_backend(config: PipelineConfig, backend: B) -> SlidecastResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            keep_temp: false,
        })
    }

    /// Keep the per-run work directory (frames and intermediate files) after the run.
    pub fn keep_temp(mut self, keep: bool) -> Self {
        self.keep_temp = keep;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline and write `output_path` plus a manifest next to it.
    #[tracing::instrument(skip_all, fields(out = %output_path.display()))]
    pub fn run(self, job: &JobSpec, output_path: &Path) -> SlidecastResult<RunReport> {
        job.validate()?;
        std::fs::create_dir_all(&self.config.temp_dir).with_context(|| {
            format!("create temp directory '{}'", self.config.temp_dir.display())
        })?;
        let work = tempfile::Builder::new()
            .prefix("slidecast-run-")
            .tempdir_in(&self.config.temp_dir)
            .with_context(|| {
                format!("create work directory in '{}'", self.config.temp_dir.display())
            })?;
        tracing::debug!(work_dir = %work.path().display(), "created work directory");

        let keep_temp = self.keep_temp;
        let result = self.run_in(job, output_path, work.path());
        match result {
            Ok(mut report) => {
                if keep_temp {
                    report.work_dir = Some(work.keep());
                }
                Ok(report)
            }
            Err(e) => {
                if keep_temp {
                    let kept = work.keep();
                    tracing::warn!(work_dir = %kept.display(), "run failed, work directory kept");
                }
                Err(e)
            }
        }
    }

    fn run_in(
        self,
        job: &JobSpec,
        output_path: &Path,
        work_dir: &Path,
    ) -> SlidecastResult<RunReport> {
        let cfg = self.config;
        let fps = cfg.frame_rate()?;
        let preset = cfg.style_preset();

        let audio = resolve_audio(&job.audio, &job.content, &cfg.timing)?;
        if audio.sections.is_empty() {
            return Err(SlidecastError::missing_audio(format!(
                "none of the {} sections has narration audio",
                job.content.sections.len()
            )));
        }

        let animator = SectionAnimator::new(preset, cfg.resolution, fps, work_dir)?
            .with_threading(cfg.threading());
        let set = animator.create_animations(&job.content, &audio)?;
        let composition = assemble_set(&set, &audio);

        let mut encoder = Encoder::new(self.backend, cfg.output.clone(), cfg.resolution, fps);
        let output_path = encoder.encode(&composition, output_path)?;

        let manifest_path = output_path.with_extension("manifest.json");
        composition.write_manifest(&manifest_path)?;

        tracing::info!(
            output = %output_path.display(),
            duration = composition.total_duration,
            frames = composition.total_frame_count,
            "video created"
        );
        Ok(RunReport {
            output_path,
            manifest_path,
            work_dir: None,
            style: preset.name,
            segment_count: composition.segment_count,
            transition_count: composition.transition_count,
            total_duration: composition.total_duration,
            total_frame_count: composition.total_frame_count,
            cache: animator.cache().stats(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
