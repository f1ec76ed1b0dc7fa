use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    compose::assemble::{CompositionElement, FinalComposition},
    encode::{
        backend::{AudioFit, ClipAudio, ClipPlan, MediaBackend},
        ffmpeg::{FfmpegBackend, ensure_parent_dir},
        settings::OutputSettings,
    },
    foundation::{
        core::{Fps, Resolution},
        error::{SlidecastError, SlidecastResult},
    },
};

/// Writes a [`FinalComposition`] to a single video file.
///
/// Every element becomes one clip normalized to `resolution`; clips live in a scratch directory
/// next to the output that is removed when `encode` returns.
#[derive(Debug)]
pub struct Encoder<B: MediaBackend = FfmpegBackend> {
    backend: B,
    settings: OutputSettings,
    resolution: Resolution,
    fps: Fps,
}

impl Encoder<FfmpegBackend> {
    pub fn ffmpeg(settings: OutputSettings, resolution: Resolution, fps: Fps) -> Self {
        Self::new(FfmpegBackend::new(), settings, resolution, fps)
    }
}

impl<B: MediaBackend> Encoder<B> {
    pub fn new(backend: B, settings: OutputSettings, resolution: Resolution, fps: Fps) -> Self {
        Self {
            backend,
            settings,
            resolution,
            fps,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// Plan one clip per element that still has frames on disk.
    ///
    /// Elements whose frames are all gone are skipped with a warning.
    pub fn plan_clips(
        &self,
        composition: &FinalComposition,
        scratch: &Path,
    ) -> Vec<ClipPlan> {
        let mut plans = Vec::with_capacity(composition.elements.len());
        for (pos, element) in composition.elements.iter().enumerate() {
            let frame_paths = element
                .frame_paths
                .iter()
                .filter(|p| p.is_file())
                .cloned()
                .collect::<Vec<_>>();
            if frame_paths.is_empty() {
                tracing::warn!(element = pos, kind = ?element.kind, "no frames on disk, skipping element");
                continue;
            }
            if frame_paths.len() < element.frame_paths.len() {
                tracing::warn!(
                    element = pos,
                    missing = element.frame_paths.len() - frame_paths.len(),
                    "some frames are missing"
                );
            }
            let natural = self.fps.frames_to_secs(frame_paths.len() as u64);
            let duration = if element.duration.is_finite() && element.duration > 0.0 {
                element.duration
            } else {
                tracing::warn!(
                    element = pos,
                    duration = element.duration,
                    "unusable element duration, using the frame span"
                );
                natural
            };
            let index = plans.len();
            plans.push(ClipPlan {
                index,
                frame_paths,
                duration,
                resolution: self.resolution,
                fps: self.fps,
                audio: clip_audio(element),
                out_path: scratch.join(self.settings.clip_file_name(index)),
            });
        }
        plans
    }

    /// Encode `composition` into `output_path` and return that path.
    #[tracing::instrument(skip_all, fields(out = %output_path.display(), elements = composition.elements.len()))]
    pub fn encode(
        &mut self,
        composition: &FinalComposition,
        output_path: &Path,
    ) -> SlidecastResult<PathBuf> {
        if composition.is_empty() {
            return Err(SlidecastError::encoding(
                "nothing to encode: composition has no elements",
            ));
        }
        self.validate()?;
        self.backend.check_available()?;

        ensure_parent_dir(output_path)?;
        if !self.settings.overwrite && output_path.exists() {
            return Err(SlidecastError::validation(format!(
                "output file '{}' already exists",
                output_path.display()
            )));
        }

        let scratch_parent = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let scratch = tempfile::Builder::new()
            .prefix(".slidecast-clips-")
            .tempdir_in(scratch_parent)
            .with_context(|| {
                format!("create clip scratch directory in '{}'", scratch_parent.display())
            })?;

        let plans = self.plan_clips(composition, scratch.path());
        if plans.is_empty() {
            return Err(SlidecastError::encoding(
                "no frames found in any composition element",
            ));
        }

        for plan in &plans {
            tracing::debug!(
                clip = plan.index,
                frames = plan.frame_paths.len(),
                duration = plan.duration,
                natural = plan.natural_duration(),
                audio = ?plan.audio.as_ref().map(|a| a.fit),
                "writing clip"
            );
            self.backend.write_clip(plan, &self.settings)?;
        }

        let clips = plans.iter().map(|p| p.out_path.clone()).collect::<Vec<_>>();
        self.backend
            .concat_clips(&clips, output_path, &self.settings)?;

        tracing::info!(
            clips = clips.len(),
            duration = composition.total_duration,
            "encoded video"
        );
        Ok(output_path.to_path_buf())
    }

    fn validate(&self) -> SlidecastResult<()> {
        let res = self.resolution.validate()?;
        if !res.width.is_multiple_of(2) || !res.height.is_multiple_of(2) {
            return Err(SlidecastError::validation(
                "output width/height must be even (required for yuv420p output)",
            ));
        }
        self.settings.validate()
    }
}

fn clip_audio(element: &CompositionElement) -> Option<ClipAudio> {
    let path = element.audio_path.clone()?;
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "audio file not found, clip will be silent");
        return None;
    }
    let duration = element.audio_duration.unwrap_or(element.duration);
    Some(ClipAudio {
        path,
        duration,
        fit: AudioFit::classify(duration, element.duration),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
