pub use crate::color::Rgb;
pub use crate::config::{AppConfig, NormaliseConfig};
pub use crate::error::{Error, Result};
pub use crate::grid::Grid;
pub use crate::partition::{
    nominal_chunk_counts, parse_chunk_count, partition, reassemble, Chunk, RemainderPolicy,
};
pub use crate::pipeline::{normalise, NormaliseOutput, Normaliser};
pub use crate::range::BrightnessRange;
pub use crate::transform::TransformKind;
pub use crate::worker::{Phase, WorkerEvent};
