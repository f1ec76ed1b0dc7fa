use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};

use crate::{
    assets::{
        cache::open_frame,
        fit::{blank_canvas, fit_to_canvas},
    },
    foundation::{
        core::{Fps, Resolution, frame_file_name},
        error::{SlidecastError, SlidecastResult},
        math::lerp_u8,
    },
    style::preset::TransitionKind,
};

/// Blend/slide position of frame `idx` in a transition of `count` frames.
///
/// Unlike section time positions, a single-frame transition sits at `1.0` (fully arrived).
pub fn transition_position(idx: usize, count: usize) -> f64 {
    if count > 1 {
        idx as f64 / (count - 1) as f64
    } else {
        1.0
    }
}

/// Generate and write the frames of one transition into `out_dir`.
///
/// Anchors are the last frame of `from_frames` and the first frame of `to_frames`; an empty side
/// is replaced by a blank canvas. Anchors of another size are letterboxed to `target` first.
pub fn synthesize(
    from_frames: &[PathBuf],
    to_frames: &[PathBuf],
    kind: TransitionKind,
    duration: f64,
    fps: Fps,
    target: Resolution,
    out_dir: &Path,
) -> SlidecastResult<Vec<PathBuf>> {
    target.validate()?;
    let from = load_anchor(from_frames.last(), target)?;
    let to = load_anchor(to_frames.first(), target)?;

    let count = fps.frame_count_for(duration);
    std::fs::create_dir_all(out_dir).map_err(|e| {
        SlidecastError::Other(anyhow::anyhow!(
            "failed to create transition directory '{}': {e}",
            out_dir.display()
        ))
    })?;

    let mut paths = Vec::with_capacity(count);
    for idx in 0..count {
        let frame = render_transition_frame(&from, &to, kind, transition_position(idx, count))?;
        let path = out_dir.join(frame_file_name(idx));
        frame.save_with_format(&path, image::ImageFormat::Png)?;
        paths.push(path);
    }

    tracing::debug!(
        kind = kind.as_str(),
        frames = count,
        dir = %out_dir.display(),
        "created transition"
    );
    Ok(paths)
}

/// Render one transition frame at position `pos` in `[0, 1]`.
pub fn render_transition_frame(
    from: &RgbImage,
    to: &RgbImage,
    kind: TransitionKind,
    pos: f64,
) -> SlidecastResult<RgbImage> {
    if from.dimensions() != to.dimensions() {
        return Err(SlidecastError::geometry(format!(
            "transition anchors differ in size: {:?} vs {:?}",
            from.dimensions(),
            to.dimensions()
        )));
    }
    let pos = pos.clamp(0.0, 1.0);
    Ok(match kind {
        TransitionKind::Fade => cross_fade(from, to, pos),
        TransitionKind::Slide => slide(from, to, pos),
    })
}

fn cross_fade(from: &RgbImage, to: &RgbImage, factor: f64) -> RgbImage {
    let (w, h) = from.dimensions();
    let data = from
        .as_raw()
        .iter()
        .zip(to.as_raw())
        .map(|(&a, &b)| lerp_u8(a, b, factor))
        .collect::<Vec<_>>();
    RgbImage::from_raw(w, h, data).unwrap_or_else(|| RgbImage::new(w, h))
}

fn slide(from: &RgbImage, to: &RgbImage, pos: f64) -> RgbImage {
    let (w, h) = from.dimensions();
    let width = f64::from(w);
    let from_x = (-width * pos) as i64;
    let to_x = (width * (1.0 - pos)) as i64;

    let mut canvas = blank_canvas(Resolution::new(w, h));
    paste_shifted(&mut canvas, from, from_x);
    paste_shifted(&mut canvas, to, to_x);
    canvas
}

/// Copy `src` onto `dst` shifted horizontally by `dx`, clipping at the edges.
fn paste_shifted(dst: &mut RgbImage, src: &RgbImage, dx: i64) {
    let w = i64::from(dst.width());
    let start = dx.max(0);
    let end = (dx + i64::from(src.width())).min(w);
    if start >= end {
        return;
    }
    let (dst_x0, src_x0, len) = (start as usize, (start - dx) as usize, (end - start) as usize);
    let dst_stride = dst.width() as usize * 3;
    let src_stride = src.width() as usize * 3;
    let rows = dst.height().min(src.height()) as usize;

    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = dst;
    for row in 0..rows {
        let d = row * dst_stride + dst_x0 * 3;
        let s = row * src_stride + src_x0 * 3;
        dst_raw[d..d + len * 3].copy_from_slice(&src_raw[s..s + len * 3]);
    }
}

fn load_anchor(path: Option<&PathBuf>, target: Resolution) -> SlidecastResult<RgbImage> {
    let Some(path) = path else {
        return Ok(blank_canvas(target));
    };
    let frame = open_frame(path)?;
    if frame.dimensions() == (target.width, target.height) {
        Ok(frame)
    } else {
        fit_to_canvas(&DynamicImage::ImageRgb8(frame), target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
