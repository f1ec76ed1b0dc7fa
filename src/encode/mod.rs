//! Clip encoding and concatenation.
//!
//! The [`encoder::Encoder`] turns a composition into one normalized clip per element and hands
//! them to a [`backend::MediaBackend`] for concatenation.

/// Backend trait, clip plans and the recording backend.
pub(crate) mod backend;
/// Composition-to-file orchestration.
pub(crate) mod encoder;
/// System `ffmpeg` backend.
pub(crate) mod ffmpeg;
/// Output codec/container settings.
pub(crate) mod settings;
