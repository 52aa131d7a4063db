use std::path::Path;

use image as image_lib;

use super::Grid;
use crate::color::Rgb;
use crate::error::{Error, Result};

impl Grid {
    /// Decodes any format the `image` crate understands and converts it to 8-bit RGB.
    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Grid> {
        let path = filename.as_ref();
        let img = image_lib::open(path)
            .map_err(|source| Error::ImageRead {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();

        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();

        Grid::new(width as usize, height as usize, pixels)
    }

    /// Encodes the grid; the format is chosen from the file extension.
    pub fn save_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let path = filename.as_ref();
        self.to_rgb_image()
            .save(path)
            .map_err(|source| Error::ImageWrite {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn to_rgb_image(&self) -> image_lib::RgbImage {
        image_lib::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            image_lib::Rgb([px.r, px.g, px.b])
        })
    }
}
