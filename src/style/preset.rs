use std::{fmt, str::FromStr};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Effect complexity tier. Each tier animates a prefix window of the section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Fade-in over the first 10%.
    Low,
    /// Fade-in plus 95% -> 100% zoom over the first 20%.
    Medium,
    /// Fade-in, 90% -> 100% zoom and a relaxing offset over the first 30%.
    High,
}

impl Complexity {
    /// Fraction of normalized section time during which effects are active.
    pub fn window(self) -> f64 {
        match self {
            Self::Low => 0.1,
            Self::Medium => 0.2,
            Self::High => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Complexity {
    type Err = SlidecastError;

    fn from_str(s: &str) -> SlidecastResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SlidecastError::validation(format!(
                "unknown complexity '{other}' (expected low, medium or high)"
            ))),
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition drawn between two adjacent sections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Linear cross-dissolve.
    #[default]
    Fade,
    /// Outgoing frame leaves to the left while the incoming one enters from the right.
    Slide,
}

impl TransitionKind {
    /// Parse a transition name, falling back to [`TransitionKind::Fade`] with a warning.
    pub fn parse_lenient(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "fade" => Self::Fade,
            "slide" => Self::Slide,
            other => {
                tracing::warn!(kind = other, "unknown transition type, using fade instead");
                Self::Fade
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Slide => "slide",
        }
    }
}

/// Named style presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleName {
    Standard,
    Minimal,
    Dynamic,
    Professional,
    Academic,
    Energetic,
}

impl StyleName {
    pub const ALL: [StyleName; 6] = [
        Self::Standard,
        Self::Minimal,
        Self::Dynamic,
        Self::Professional,
        Self::Academic,
        Self::Energetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Minimal => "minimal",
            Self::Dynamic => "dynamic",
            Self::Professional => "professional",
            Self::Academic => "academic",
            Self::Energetic => "energetic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Standard => "Balanced effects with moderate transitions",
            Self::Minimal => "Subtle, clean animations with minimal distraction",
            Self::Dynamic => "Rich, engaging animations with noticeable effects",
            Self::Professional => "Clean, corporate-style transitions and effects",
            Self::Academic => "Clear focus on content with understated animations",
            Self::Energetic => "Lively, attention-grabbing animations and transitions",
        }
    }

    fn lookup(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Attribute table of the preset.
    pub fn preset(self) -> StylePreset {
        let white = [255, 255, 255];
        let black = [0, 0, 0];
        match self {
            Self::Standard => StylePreset {
                name: self,
                complexity: Complexity::Medium,
                transition: TransitionKind::Fade,
                transition_duration: 1.0,
                zoom_effect: true,
                zoom_factor: Some(0.05),
                fade_effect: true,
                highlight_effect: true,
                motion_effect: false,
                colors: ColorScheme::new(white, black, [41, 128, 185]),
            },
            Self::Minimal => StylePreset {
                name: self,
                complexity: Complexity::Low,
                transition: TransitionKind::Fade,
                transition_duration: 0.8,
                zoom_effect: false,
                zoom_factor: None,
                fade_effect: true,
                highlight_effect: false,
                motion_effect: false,
                colors: ColorScheme::new(white, black, [52, 73, 94]),
            },
            Self::Dynamic => StylePreset {
                name: self,
                complexity: Complexity::High,
                transition: TransitionKind::Slide,
                transition_duration: 1.2,
                zoom_effect: true,
                zoom_factor: Some(0.1),
                fade_effect: true,
                highlight_effect: true,
                motion_effect: true,
                colors: ColorScheme::new(white, black, [192, 57, 43]),
            },
            Self::Professional => StylePreset {
                name: self,
                complexity: Complexity::Medium,
                transition: TransitionKind::Fade,
                transition_duration: 0.9,
                zoom_effect: true,
                zoom_factor: Some(0.03),
                fade_effect: true,
                highlight_effect: true,
                motion_effect: false,
                colors: ColorScheme::new([250, 250, 250], [44, 62, 80], [52, 152, 219]),
            },
            Self::Academic => StylePreset {
                name: self,
                complexity: Complexity::Low,
                transition: TransitionKind::Fade,
                transition_duration: 0.7,
                zoom_effect: false,
                zoom_factor: None,
                fade_effect: true,
                highlight_effect: true,
                motion_effect: false,
                colors: ColorScheme::new([253, 254, 254], [40, 40, 40], [41, 128, 185]),
            },
            Self::Energetic => StylePreset {
                name: self,
                complexity: Complexity::High,
                transition: TransitionKind::Slide,
                transition_duration: 1.5,
                zoom_effect: true,
                zoom_factor: Some(0.15),
                fade_effect: true,
                highlight_effect: true,
                motion_effect: true,
                colors: ColorScheme::new(white, black, [230, 126, 34]),
            },
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGB colors carried by a preset. Rendering does not read them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorScheme {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub accent: [u8; 3],
}

impl ColorScheme {
    const fn new(background: [u8; 3], text: [u8; 3], accent: [u8; 3]) -> Self {
        Self {
            background,
            text,
            accent,
        }
    }
}

/// Immutable style configuration resolved once per run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StylePreset {
    pub name: StyleName,
    pub complexity: Complexity,
    pub transition: TransitionKind,
    /// Seconds.
    pub transition_duration: f64,
    pub zoom_effect: bool,
    pub zoom_factor: Option<f64>,
    pub fade_effect: bool,
    pub highlight_effect: bool,
    pub motion_effect: bool,
    pub colors: ColorScheme,
}

impl StylePreset {
    /// Same preset with the complexity tier replaced.
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }
}

/// Resolve a style by name. Unknown names degrade to `standard` with a warning.
pub fn resolve_style(name: &str) -> StylePreset {
    match StyleName::lookup(name) {
        Some(style) => {
            tracing::info!(style = style.as_str(), "using animation style preset");
            style.preset()
        }
        None => {
            tracing::warn!(
                style = name,
                "unknown animation style, using 'standard' instead"
            );
            StyleName::Standard.preset()
        }
    }
}

/// One row of [`list_styles`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StyleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub complexity: Complexity,
}

/// Every preset with its description and complexity tier, in catalog order.
pub fn list_styles() -> Vec<StyleInfo> {
    StyleName::ALL
        .into_iter()
        .map(|s| StyleInfo {
            name: s.as_str(),
            description: s.description(),
            complexity: s.preset().complexity,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/style/preset.rs"]
mod tests;
