//! Pre-rendered raster images blitted by `Surface::draw_image`

use image::{Rgba, RgbaImage};
use pinkboard_core::{Color, Result};
use std::path::Path;

/// An immutable RGBA raster with straight alpha
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Copy of this sprite with every pixel recolored to `color`, keeping
    /// the coverage in the alpha channel. Filling a shape with `color` onto
    /// a transparent raster gives the same pixels as tinting a white mask.
    pub fn tinted(&self, color: Color) -> Sprite {
        let [r, g, b, _] = color.to_rgba8();
        let image = RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba([r, g, b, self.image.get_pixel(x, y)[3]])
        });
        Sprite { image }
    }

    /// Number of pixels with any coverage
    pub fn opaque_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p[3] > 0).count()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        crate::canvas::save_image(&self.image, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tinted_keeps_coverage() {
        let mut mask = RgbaImage::new(2, 1);
        mask.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        mask.put_pixel(1, 0, Rgba([255, 255, 255, 64]));
        let sprite = Sprite::from_image(mask);

        let tinted = sprite.tinted(Color::new(1.0, 0.0, 0.5, 1.0));
        assert_eq!(tinted.pixel(0, 0), Rgba([255, 0, 128, 255]));
        assert_eq!(tinted.pixel(1, 0), Rgba([255, 0, 128, 64]));
        assert_eq!(tinted.opaque_pixel_count(), 2);
        assert_eq!(sprite.pixel(1, 0), Rgba([255, 255, 255, 64]));
    }
}
