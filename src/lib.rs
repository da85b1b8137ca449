//! Inkreveal captures handwritten strokes of a character and plays them back as a reveal.
//!
//! The pipeline is:
//!
//! - Record pointer input into a [`CaptureBuffer`] (usually through a [`CaptureSession`])
//! - Resample, map into em-space and parameterize the strokes into an immutable [`Variant`]
//! - Persist variants per character in a [`Dataset`] (schema version 1 JSON)
//! - Reveal a variant deterministically with a [`RevealPlayer`], driven one display frame at a
//!   time by a [`RevealView`] that masks a pre-rendered [`GlyphImage`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod capture;
pub(crate) mod dataset;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod stroke;

pub use crate::foundation::core::{BezPath, Canvas, GlyphBox, Point, Rect, Vec2};
pub use crate::foundation::error::{InkError, InkResult};

pub use crate::animation::ease::{AlphaRamp, Ease};
pub use crate::capture::buffer::{CaptureBuffer, PointerEvent};
pub use crate::capture::session::{
    CaptureSession, GlyphBoxSource, GlyphMetricsSource, SessionOpts,
};
pub use crate::dataset::io::{variant_from_json, variant_to_json};
pub use crate::dataset::model::{CharacterEntry, Dataset, GlyphMetrics, SCHEMA_VERSION};
pub use crate::playback::player::{PlaybackState, RevealPlayer, Tick};
pub use crate::playback::scheduler::{FrameScheduler, TaskId};
pub use crate::playback::timeline::{
    DrawnDot, DrawnSegment, PenLiftGaps, PlaybackOpts, PlaybackParams, RevealFrame, RevealLayout,
    RevealTimeline,
};
pub use crate::playback::view::RevealView;
pub use crate::playback::width::{WidthModel, base_width_px, speed_term};
pub use crate::render::backend::{FrameRGBA, GlyphImage};
pub use crate::render::mask::MaskRenderer;
pub use crate::render::sink::{InMemorySink, ProgressLog, RevealSink, SinkConfig};
pub use crate::stroke::model::{
    DEFAULT_PRESSURE, RawPoint, ResampledPoint, Stroke, Variant, VariantId, VariantStats,
};
pub use crate::stroke::normalize::to_em_space;
pub use crate::stroke::resample::{path_length, resample};
pub use crate::stroke::variant::{
    BuildOpts, PipelineOpts, build_variant, parameterize, process_stroke,
};
