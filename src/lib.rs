//! Slidecast turns a sequence of slide images plus narration audio into a single video.
//!
//! The pipeline has four stages:
//!
//! - [`SectionAnimator`] renders each section's slide into a frame sequence whose length is
//!   derived from the narration duration, and synthesizes transitions between sections
//! - [`assemble`] pairs sections and transitions with their audio into a [`FinalComposition`]
//! - [`Encoder`] writes one normalized clip per element and concatenates them
//! - [`Pipeline`] runs all of the above from a [`PipelineConfig`] and a [`JobSpec`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod animate;
pub(crate) mod compose;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod input;
pub(crate) mod pipeline;
pub(crate) mod style;

pub use crate::foundation::core::{Fps, Resolution, frame_file_name, time_position};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::animate::records::{AnimationSet, SectionAnimation, TransitionAnimation};
pub use crate::animate::section::{RenderThreading, SectionAnimator};
pub use crate::assets::cache::{CacheStats, ImageCache};
pub use crate::assets::fit::{FitGeometry, blank_canvas, fit_geometry, fit_to_canvas};
pub use crate::compose::assemble::{
    CompositionElement, ElementKind, FinalComposition, assemble, assemble_set,
};
pub use crate::config::PipelineConfig;
pub use crate::effects::engine::{EffectSample, apply_effects, sample_effects};
pub use crate::effects::transitions::{render_transition_frame, synthesize, transition_position};
pub use crate::encode::backend::{AudioFit, ClipAudio, ClipPlan, MediaBackend, RecordingBackend};
pub use crate::encode::encoder::Encoder;
pub use crate::encode::ffmpeg::{FfmpegBackend, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::settings::OutputSettings;
pub use crate::input::content::{
    AudioSegment, AudioSegmentSpec, AudioSegments, AudioSpecs, ContentSection, ContentStructure,
    JobSpec,
};
pub use crate::input::timing::{
    TimingOptions, estimate_duration, probe_duration, resolve_audio, speaking_duration_secs,
};
pub use crate::pipeline::{Pipeline, RunReport};
pub use crate::style::preset::{
    ColorScheme, Complexity, StyleInfo, StyleName, StylePreset, TransitionKind, list_styles,
    resolve_style,
};
