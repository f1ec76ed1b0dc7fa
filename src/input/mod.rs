//! Records handed to the core by the extraction, narration and speech collaborators.

pub(crate) mod content;
pub(crate) mod timing;
