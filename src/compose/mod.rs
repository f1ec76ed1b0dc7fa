//! Interleaving of section and transition clips into one timeline.

pub(crate) mod assemble;
