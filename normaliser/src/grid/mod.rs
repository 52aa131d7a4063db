mod io;


use crate::color::Rgb;
use crate::error::{Error, Result};

/// Row-major grid of RGB samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Grid {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Grid> {
        let len = pixel_count(width, height)?;

        if pixels.len() != len {
            return Err(Error::DataLength {
                width,
                height,
                actual: pixels.len(),
            });
        }

        Ok(Grid {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, value: Rgb) -> Result<Grid> {
        let len = pixel_count(width, height)?;

        Ok(Grid {
            width,
            height,
            pixels: vec![value; len],
        })
    }

    /// Builds a grid by calling `f(x, y)` for every position in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Grid>
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let len = pixel_count(width, height)?;

        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }

        Ok(Grid {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Samples of rows `start..end`.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    pub fn rows(&self, start: usize, end: usize) -> &[Rgb] {
        &self.pixels[start * self.width..end * self.width]
    }

    /// Mutable samples of rows `start..end`.
    ///
    /// # Panics
    /// Panics if the range is out of bounds.
    pub fn rows_mut(&mut self, start: usize, end: usize) -> &mut [Rgb] {
        &mut self.pixels[start * self.width..end * self.width]
    }
}

/// Number of samples in a `width` x `height` grid.
fn pixel_count(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyGrid { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(Error::GridTooLarge { width, height })
}
