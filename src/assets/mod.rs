//! Source image loading, letterbox fitting and the run-scoped canvas cache.

pub(crate) mod cache;
pub(crate) mod fit;
