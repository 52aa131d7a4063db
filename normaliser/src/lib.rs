//! Splits an RGB grid into row chunks, processes each chunk on its own thread
//! and joins them at a two-phase barrier so one leader can aggregate the
//! brightness range of the whole grid before any chunk is transformed.

mod color;
mod config;
mod error;
mod grid;
mod partition;
mod pipeline;
mod range;
mod transform;
mod worker;

pub mod prelude;

pub use prelude::*;

pub use crate::partition::{covered_rows, validate_chunk_count};
pub use crate::transform::{permute_channels, rescale};
pub use crate::worker::{EventCallback, SharedRanges};
