//! Per-section frame sequencing and transition generation.

pub(crate) mod records;
pub(crate) mod section;
