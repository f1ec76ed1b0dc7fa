//! Per-frame effects and transition frame synthesis.

pub(crate) mod engine;
pub(crate) mod transitions;
