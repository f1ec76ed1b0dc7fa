use std::{
    io::{Read, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use anyhow::Context as _;
use image::DynamicImage;

use crate::{
    assets::{cache::open_frame, fit::fit_to_canvas},
    encode::{
        backend::{ClipPlan, MediaBackend},
        settings::OutputSettings,
    },
    foundation::error::{SlidecastError, SlidecastResult},
};

/// Sample rate of every clip's audio track; concat with stream copy needs identical layouts.
const AUDIO_SAMPLE_RATE: u32 = 44_100;
const AUDIO_CHANNELS: u32 = 2;

/// Backend that drives the system `ffmpeg` binary.
#[derive(Clone, Debug, Default)]
pub struct FfmpegBackend {
    program: Option<PathBuf>,
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffmpeg executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn command(&self) -> Command {
        match &self.program {
            Some(p) => Command::new(p),
            None => Command::new("ffmpeg"),
        }
    }
}

impl MediaBackend for FfmpegBackend {
    fn check_available(&self) -> SlidecastResult<()> {
        let ok = self
            .command()
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(SlidecastError::encoding(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ))
        }
    }

    #[tracing::instrument(skip_all, fields(clip = plan.index, frames = plan.frame_paths.len()))]
    fn write_clip(&mut self, plan: &ClipPlan, settings: &OutputSettings) -> SlidecastResult<()> {
        let res = plan.resolution;
        let mut cmd = self.command();
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input 0: raw RGB frames, read at the rate that stretches them over the clip duration.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &res.to_string(),
            "-r",
            &format!("{:.6}", plan.input_rate()),
            "-i",
            "pipe:0",
        ]);

        // Input 1: narration, or a silent source so every clip carries an audio stream.
        match &plan.audio {
            Some(audio) => {
                cmd.arg("-i").arg(&audio.path);
            }
            None => {
                cmd.args([
                    "-f",
                    "lavfi",
                    "-i",
                    &format!(
                        "anullsrc=channel_layout=stereo:sample_rate={AUDIO_SAMPLE_RATE}"
                    ),
                ]);
            }
        }

        cmd.args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            &settings.video_codec,
            "-preset",
            &settings.preset,
            "-b:v",
            &settings.video_bitrate,
            "-pix_fmt",
            "yuv420p",
            "-r",
            &format!("{}/{}", plan.fps.num, plan.fps.den),
            "-c:a",
            &settings.audio_codec,
            "-b:a",
            &settings.audio_bitrate,
            "-ar",
            &AUDIO_SAMPLE_RATE.to_string(),
            "-ac",
            &AUDIO_CHANNELS.to_string(),
            "-af",
            "apad",
            "-t",
            &format!("{:.6}", plan.duration),
            "-threads",
            &settings.threads.to_string(),
        ])
        .arg(&plan.out_path);

        let mut run = FfmpegRun::spawn(cmd)?;
        for path in &plan.frame_paths {
            let frame = open_frame(path)?;
            let frame = if frame.dimensions() == (res.width, res.height) {
                frame
            } else {
                tracing::debug!(
                    path = %path.display(),
                    width = frame.width(),
                    height = frame.height(),
                    "normalizing frame to output resolution"
                );
                fit_to_canvas(&DynamicImage::ImageRgb8(frame), res)?
            };
            if let Err(e) = run.write(frame.as_raw()) {
                // A closed pipe means ffmpeg gave up; its stderr says why.
                run.finish()?;
                return Err(e);
            }
        }
        run.finish()
    }

    fn concat_clips(
        &mut self,
        clips: &[PathBuf],
        out_path: &Path,
        settings: &OutputSettings,
    ) -> SlidecastResult<()> {
        let first = clips
            .first()
            .ok_or_else(|| SlidecastError::encoding("no clips to concatenate"))?;
        let list_dir = first.parent().unwrap_or_else(|| Path::new("."));
        let list_path = list_dir.join("concat.txt");
        std::fs::write(&list_path, concat_listing(clips)?)
            .with_context(|| format!("write concat list '{}'", list_path.display()))?;

        let mut cmd = self.command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if settings.overwrite { "-y" } else { "-n" });
        cmd.args(["-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c", "copy", "-movflags", "+faststart", "-f", &settings.format])
            .arg(out_path);

        let output = cmd.output().map_err(|e| {
            SlidecastError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        if !output.status.success() {
            return Err(SlidecastError::encoding(format!(
                "ffmpeg concat exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Concat demuxer listing with absolute, quoted paths.
fn concat_listing(clips: &[PathBuf]) -> SlidecastResult<String> {
    let mut out = String::new();
    for clip in clips {
        let abs = std::path::absolute(clip)
            .with_context(|| format!("resolve clip path '{}'", clip.display()))?;
        let quoted = abs.to_string_lossy().replace('\'', r"'\''");
        out.push_str(&format!("file '{quoted}'\n"));
    }
    Ok(out)
}

/// A running ffmpeg child with its stdin and a stderr drain thread.
///
/// Dropping an unfinished run kills the child.
struct FfmpegRun {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl FfmpegRun {
    fn spawn(mut cmd: Command) -> SlidecastResult<Self> {
        let mut child = cmd.spawn().map_err(|e| {
            SlidecastError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        let mut run = Self {
            child: Some(child),
            stdin,
            stderr_drain: None,
        };
        let Some(mut stderr) = stderr else {
            return Err(SlidecastError::encoding(
                "failed to open ffmpeg stderr (unexpected)",
            ));
        };
        if run.stdin.is_none() {
            return Err(SlidecastError::encoding(
                "failed to open ffmpeg stdin (unexpected)",
            ));
        }
        run.stderr_drain = Some(std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        }));
        Ok(run)
    }

    fn write(&mut self, bytes: &[u8]) -> SlidecastResult<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidecastError::encoding("ffmpeg input is already closed"));
        };
        stdin.write_all(bytes).map_err(|e| {
            SlidecastError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn finish(&mut self) -> SlidecastResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Err(SlidecastError::encoding("ffmpeg run already finished"));
        };
        let status = child.wait().map_err(|e| {
            SlidecastError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlidecastError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlidecastError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(SlidecastError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegRun {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidecastResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    FfmpegBackend::new().check_available().is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
