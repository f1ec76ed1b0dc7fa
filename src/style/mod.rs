//! Closed catalog of animation style presets.

pub(crate) mod preset;
