use image::{Rgb, RgbImage};

use crate::{
    assets::fit::{RESAMPLE, WHITE},
    foundation::{
        error::{SlidecastError, SlidecastResult},
        math::over_white,
    },
    style::preset::Complexity,
};

/// Effect parameters sampled at one normalized time position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSample {
    /// Global opacity of the slide (0 = fully transparent).
    pub alpha: u8,
    /// Uniform scale of the slide around the canvas center.
    pub zoom: f64,
    /// Horizontal displacement in pixels.
    pub offset_x: i32,
    /// Vertical displacement in pixels.
    pub offset_y: i32,
}

/// Sample the effect state of `complexity` at normalized time `t`.
///
/// Returns `None` once `t` has reached the tier's window, meaning the frame is the unmodified
/// base image.
pub fn sample_effects(t: f64, complexity: Complexity) -> SlidecastResult<Option<EffectSample>> {
    if !t.is_finite() {
        return Err(SlidecastError::validation(format!(
            "effect time position must be finite, got {t}"
        )));
    }
    let t = t.clamp(0.0, 1.0);
    let window = complexity.window();
    if t >= window {
        return Ok(None);
    }

    let progress = t / window;
    let alpha = (255.0 * progress) as u8;
    let sample = match complexity {
        Complexity::Low => EffectSample {
            alpha,
            zoom: 1.0,
            offset_x: 0,
            offset_y: 0,
        },
        Complexity::Medium => EffectSample {
            alpha,
            zoom: 0.95 + progress * 0.05,
            offset_x: 0,
            offset_y: 0,
        },
        Complexity::High => EffectSample {
            alpha,
            zoom: 0.90 + progress * 0.10,
            offset_x: (10.0 * (1.0 - progress)) as i32,
            offset_y: (5.0 * (1.0 - progress)) as i32,
        },
    };
    Ok(Some(sample))
}

/// Render `base` at normalized time `t` under `complexity`.
///
/// The output always has the dimensions of `base`: zoom resizes and re-centers, the offset
/// translates, and the faded result is flattened over white.
pub fn apply_effects(base: &RgbImage, t: f64, complexity: Complexity) -> SlidecastResult<RgbImage> {
    let (w, h) = base.dimensions();
    if w == 0 || h == 0 {
        return Err(SlidecastError::geometry("effect input frame is empty"));
    }
    match sample_effects(t, complexity)? {
        None => Ok(base.clone()),
        Some(sample) => render_sample(base, sample),
    }
}

fn render_sample(base: &RgbImage, sample: EffectSample) -> SlidecastResult<RgbImage> {
    let (w, h) = base.dimensions();
    if !(sample.zoom > 0.0 && sample.zoom <= 1.0) {
        return Err(SlidecastError::geometry(format!(
            "zoom factor {} is outside (0, 1]",
            sample.zoom
        )));
    }

    let nw = ((f64::from(w) * sample.zoom).round() as u32).clamp(1, w);
    let nh = ((f64::from(h) * sample.zoom).round() as u32).clamp(1, h);
    let scaled;
    let layer = if (nw, nh) == (w, h) {
        base
    } else {
        scaled = image::imageops::resize(base, nw, nh, RESAMPLE);
        &scaled
    };

    let x0 = i64::from((w - nw) / 2) + i64::from(sample.offset_x);
    let y0 = i64::from((h - nh) / 2) + i64::from(sample.offset_y);

    let mut out = RgbImage::from_pixel(w, h, WHITE);
    for (x, y, px) in layer.enumerate_pixels() {
        let dx = x0 + i64::from(x);
        let dy = y0 + i64::from(y);
        if dx < 0 || dy < 0 || dx >= i64::from(w) || dy >= i64::from(h) {
            continue;
        }
        let [r, g, b] = px.0;
        out.put_pixel(
            dx as u32,
            dy as u32,
            Rgb([
                over_white(r, sample.alpha),
                over_white(g, sample.alpha),
                over_white(b, sample.alpha),
            ]),
        );
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/engine.rs"]
mod tests;
