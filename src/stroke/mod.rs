//! Stroke data model and the capture-to-variant pipeline.

pub(crate) mod model;
pub(crate) mod normalize;
pub(crate) mod resample;
pub(crate) mod variant;
