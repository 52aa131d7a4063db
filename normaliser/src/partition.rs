//! Splitting a grid into row chunks and stitching them back together.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::grid::Grid;

/// What happens to the rows left over when the height is not a multiple of
/// the chunk count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Leftover rows are not processed; they come out black.
    #[default]
    Truncate,
    /// Leftover rows are appended to the last chunk.
    ExtendLast,
}

impl RemainderPolicy {
    const EXPECTED: &'static str = "truncate, extend-last";
}

impl FromStr for RemainderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "extend-last" => Ok(Self::ExtendLast),
            _ => Err(Error::UnknownVariant {
                kind: "remainder policy",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Contiguous rows of a grid, owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: usize,
    start_row: usize,
    width: usize,
    pixels: Vec<Rgb>,
}

impl Chunk {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    pub fn end_row(&self) -> usize {
        self.start_row + self.height()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.pixels.len() / self.width
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }
}

/// Rejects chunk counts that cannot give every worker at least one row or
/// cannot elect a barrier leader.
pub fn validate_chunk_count(height: usize, chunk_count: usize) -> Result<()> {
    if chunk_count < 2 {
        return Err(Error::TooFewChunks(chunk_count as i64));
    }
    if chunk_count > height {
        return Err(Error::ChunkCountExceedsHeight {
            chunk_count,
            height,
        });
    }
    Ok(())
}

/// Parses a user-supplied chunk count, rejecting non-numbers, zero, one and
/// negative values.
pub fn parse_chunk_count(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidChunkCount(trimmed.to_string()))?;

    if value < 2 {
        return Err(Error::TooFewChunks(value));
    }

    usize::try_from(value).map_err(|_| Error::InvalidChunkCount(trimmed.to_string()))
}

/// Chunk counts in `2..height` that divide the height, so no row is dropped.
pub fn nominal_chunk_counts(height: usize) -> Vec<usize> {
    (2..height).filter(|n| height % n == 0).collect()
}

/// Number of rows that end up in some chunk.
pub fn covered_rows(height: usize, chunk_count: usize, policy: RemainderPolicy) -> usize {
    match policy {
        RemainderPolicy::Truncate => (height / chunk_count) * chunk_count,
        RemainderPolicy::ExtendLast => height,
    }
}

/// Splits `grid` into `chunk_count` row chunks of `height / chunk_count` rows each.
///
/// Chunk `i` starts at row `i * chunk_height`. Leftover rows are dropped or
/// given to the last chunk according to `policy`.
pub fn partition(grid: &Grid, chunk_count: usize, policy: RemainderPolicy) -> Result<Vec<Chunk>> {
    validate_chunk_count(grid.height(), chunk_count)?;

    let chunk_height = grid.height() / chunk_count;
    let chunks = (0..chunk_count)
        .map(|index| {
            let start_row = index * chunk_height;
            let end_row = match policy {
                RemainderPolicy::ExtendLast if index + 1 == chunk_count => grid.height(),
                _ => start_row + chunk_height,
            };

            Chunk {
                index,
                start_row,
                width: grid.width(),
                pixels: grid.rows(start_row, end_row).to_vec(),
            }
        })
        .collect();

    Ok(chunks)
}

/// Writes every chunk back at its original row offset.
///
/// Rows no chunk covers are black.
pub fn reassemble<I>(width: usize, height: usize, chunks: I) -> Result<Grid>
where
    I: IntoIterator<Item = Chunk>,
{
    let mut grid = Grid::filled(width, height, Rgb::BLACK)?;

    for chunk in chunks {
        if chunk.width != width {
            return Err(Error::ChunkWidth {
                index: chunk.index,
                expected: width,
                actual: chunk.width,
            });
        }
        if chunk.end_row() > height {
            return Err(Error::ChunkOutOfBounds {
                index: chunk.index,
                end_row: chunk.end_row(),
                height,
            });
        }
        grid.rows_mut(chunk.start_row, chunk.end_row())
            .copy_from_slice(&chunk.pixels);
    }

    Ok(grid)
}
