use std::fmt;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject zero-sized canvases with a geometry error.
    pub fn validate(self) -> SlidecastResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidecastError::geometry(format!(
                "resolution must be non-zero, got {self}"
            )));
        }
        Ok(self)
    }

    /// Parse `"1920x1080"`, `"1920,1080"` or `"1920 1080"`.
    pub fn parse(s: &str) -> SlidecastResult<Self> {
        let s = s.trim();
        let parts = s
            .split(['x', 'X', ',', ' '])
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(SlidecastError::validation(format!(
                "resolution '{s}' must look like WIDTHxHEIGHT"
            )));
        }
        let parse_dim = |p: &str| {
            p.trim().parse::<u32>().map_err(|e| {
                SlidecastError::validation(format!("invalid resolution component '{p}': {e}"))
            })
        };
        Ok(Self {
            width: parse_dim(parts[0])?,
            height: parse_dim(parts[1])?,
        })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> SlidecastResult<Self> {
        if den == 0 {
            return Err(SlidecastError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlidecastError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second (`den == 1`).
    pub fn integer(fps: u32) -> SlidecastResult<Self> {
        Self::new(fps, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames that cover `secs`: `max(1, round(secs * fps))`.
    ///
    /// Zero, negative and non-finite durations still yield one frame.
    pub fn frame_count_for(self, secs: f64) -> usize {
        let n = (secs * self.as_f64()).round();
        if n.is_finite() && n >= 1.0 {
            n as usize
        } else {
            1
        }
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Normalized position of frame `idx` in a run of `count` frames.
///
/// Evenly spaced over `[0, 1]`; a single frame sits at exactly `0.0`.
pub fn time_position(idx: usize, count: usize) -> f64 {
    if count > 1 {
        idx as f64 / (count - 1) as f64
    } else {
        0.0
    }
}

/// File name of the `idx`-th frame inside a frame directory.
pub fn frame_file_name(idx: usize) -> String {
    format!("frame_{idx:05}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
