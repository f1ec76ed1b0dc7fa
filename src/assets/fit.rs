use image::{DynamicImage, Rgb, RgbImage, RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::Resolution,
    error::{SlidecastError, SlidecastResult},
    math::over_white,
};

/// Resampling filter used for every resize in the pipeline.
pub(crate) const RESAMPLE: FilterType = FilterType::Lanczos3;

/// Letterbox background.
pub(crate) const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Placement of a source image inside a letterboxed target canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitGeometry {
    /// Size of the uniformly scaled source.
    pub scaled: Resolution,
    /// Left edge of the scaled source on the canvas.
    pub x: u32,
    /// Top edge of the scaled source on the canvas.
    pub y: u32,
}

/// Compute the uniform scale and centered placement of `src` inside `target`.
///
/// The scale factor is `min(tw/sw, th/sh)`, so the constraining dimension touches the canvas
/// edge and the aspect ratio is preserved.
pub fn fit_geometry(src: Resolution, target: Resolution) -> SlidecastResult<FitGeometry> {
    if src.width == 0 || src.height == 0 {
        return Err(SlidecastError::geometry(format!(
            "source image must be non-empty, got {src}"
        )));
    }
    target.validate()?;

    let (sw, sh) = (f64::from(src.width), f64::from(src.height));
    let (tw, th) = (f64::from(target.width), f64::from(target.height));
    let scale = (tw / sw).min(th / sh);

    let nw = ((sw * scale).round() as u32).clamp(1, target.width);
    let nh = ((sh * scale).round() as u32).clamp(1, target.height);

    Ok(FitGeometry {
        scaled: Resolution::new(nw, nh),
        x: (target.width - nw) / 2,
        y: (target.height - nh) / 2,
    })
}

/// Scale `src` uniformly into `target` and center it on an opaque white canvas.
///
/// Transparent source pixels are flattened over the white background.
pub fn fit_to_canvas(src: &DynamicImage, target: Resolution) -> SlidecastResult<RgbImage> {
    let geom = fit_geometry(Resolution::new(src.width(), src.height()), target)?;

    let rgba = src.to_rgba8();
    let scaled = if geom.scaled.width == src.width() && geom.scaled.height == src.height() {
        rgba
    } else {
        image::imageops::resize(&rgba, geom.scaled.width, geom.scaled.height, RESAMPLE)
    };

    let mut canvas = RgbImage::from_pixel(target.width, target.height, WHITE);
    paste_over_white(&mut canvas, &scaled, geom.x, geom.y);
    Ok(canvas)
}

/// A blank white canvas at `target`.
pub fn blank_canvas(target: Resolution) -> RgbImage {
    RgbImage::from_pixel(target.width, target.height, WHITE)
}

fn paste_over_white(canvas: &mut RgbImage, src: &RgbaImage, x0: u32, y0: u32) {
    for (x, y, px) in src.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let out = if a == 255 {
            [r, g, b]
        } else {
            [over_white(r, a), over_white(g, a), over_white(b, a)]
        };
        canvas.put_pixel(x0 + x, y0 + y, Rgb(out));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fit.rs"]
mod tests;
