//! Error types for normalisation runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing or running a normalisation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Grid must have at least one row and one column, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Grid data length {actual} does not match {width}x{height}")]
    DataLength {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Grid of {width}x{height} samples does not fit in memory")]
    GridTooLarge { width: usize, height: usize },

    #[error("Chunk {index} is {actual} samples wide, expected {expected}")]
    ChunkWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Chunk {index} ends at row {end_row}, past the grid height {height}")]
    ChunkOutOfBounds {
        index: usize,
        end_row: usize,
        height: usize,
    },

    #[error("Invalid chunk count '{0}': expected a whole number")]
    InvalidChunkCount(String),

    #[error("Chunk count {0} is too small: at least 2 chunks are needed to elect a leader")]
    TooFewChunks(i64),

    #[error("Unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Chunk count {chunk_count} exceeds the grid height {height}")]
    ChunkCountExceedsHeight { chunk_count: usize, height: usize },

    #[error("Failed to start worker {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("Worker {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("Worker {index} was released from a broken barrier")]
    BarrierBroken { index: usize },

    #[error(transparent)]
    Barrier(#[from] common::BarrierError),

    #[error("Worker {index} found no published brightness range")]
    MissingRange { index: usize },

    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image '{path}': {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Errors caused by the requested chunk count rather than by the run itself.
    pub fn is_chunk_count_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidChunkCount(_)
                | Error::TooFewChunks(_)
                | Error::ChunkCountExceedsHeight { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
