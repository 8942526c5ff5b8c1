//! Software rasterizer implementing `Surface`
//!
//! Pixels are straight-alpha RGBA8 composited with source-over. Rectangles
//! use exact area coverage, paths use a scanline fill with vertical
//! supersampling, and sprites are sampled nearest-neighbour.

use crate::sprite::Sprite;
use crate::surface::Surface;
use image::{ImageFormat, Rgba, RgbaImage};
use log::debug;
use pinkboard_core::{Color, PinkboardError, Result};
use std::f32::consts::TAU;
use std::path::Path;

/// Sample rows per pixel row when filling paths
const PATH_SUBSAMPLES: usize = 4;

pub struct Canvas {
    pixels: RgbaImage,
    fill_style: Color,
    global_alpha: f32,
    subpaths: Vec<Vec<(f32, f32)>>,
}

impl Canvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PinkboardError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            fill_style: Color::BLACK,
            global_alpha: 1.0,
            subpaths: Vec::new(),
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    pub fn into_sprite(self) -> Sprite {
        Sprite::from_image(self.pixels)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        save_image(&self.pixels, path)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        *dst = source_over(*dst, color, alpha.min(1.0));
    }

    fn current_subpath(&mut self) -> Option<&mut Vec<(f32, f32)>> {
        self.subpaths.last_mut().filter(|s| !s.is_empty())
    }
}

/// Composite `src` with `alpha` over `dst`, straight alpha in and out
fn source_over(dst: Rgba<u8>, src: Color, alpha: f32) -> Rgba<u8> {
    let da = dst[3] as f32 / 255.0;
    let out_a = alpha + da * (1.0 - alpha);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: f32, d: u8| {
        let d = d as f32 / 255.0;
        let c = (s * alpha + d * da * (1.0 - alpha)) / out_a;
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Rgba([
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
    ])
}

/// Pixel index range `[start, end)` overlapped by `[from, to)`, clipped to `[0, limit)`
fn pixel_span(from: f32, to: f32, limit: u32) -> (u32, u32) {
    let start = from.floor().max(0.0) as u32;
    let end = (to.ceil().max(0.0) as u32).min(limit);
    (start.min(end), end)
}

/// Length of `[from, to)` that falls inside pixel `[p, p + 1)`
fn overlap(p: u32, from: f32, to: f32) -> f32 {
    let p = p as f32;
    ((p + 1.0).min(to) - p.max(from)).max(0.0)
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return;
        }
        let (x0, x1) = pixel_span(x.round(), (x + width).round(), self.width());
        let (y0, y1) = pixel_span(y.round(), (y + height).round(), self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels.put_pixel(px, py, Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn close_path(&mut self) {
        let first = match self.current_subpath() {
            Some(subpath) => subpath[0],
            None => return,
        };
        // Filling closes every subpath implicitly; only the pen position moves.
        self.subpaths.push(vec![first]);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.subpaths.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        match self.current_subpath() {
            Some(subpath) => subpath.push((x, y)),
            None => self.move_to(x, y),
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32) {
        if !radius.is_finite() || radius < 0.0 {
            return;
        }
        let raw = end_angle - start_angle;
        let sweep = if raw >= TAU { TAU } else { raw.rem_euclid(TAU) };
        let segments = ((radius * sweep).ceil() as usize).clamp(8, 256);

        for i in 0..=segments {
            let angle = start_angle + sweep * i as f32 / segments as f32;
            self.line_to(x + radius * angle.cos(), y + radius * angle.sin());
        }
    }

    fn fill(&mut self) {
        let mut edges = Vec::new();
        for subpath in self.subpaths.iter().filter(|s| s.len() >= 2) {
            for (i, &a) in subpath.iter().enumerate() {
                let b = subpath[(i + 1) % subpath.len()];
                if a.1 != b.1 {
                    edges.push((a, b));
                }
            }
        }
        if edges.is_empty() {
            return;
        }

        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for &((ax, ay), (bx, by)) in &edges {
            min_x = min_x.min(ax).min(bx);
            max_x = max_x.max(ax).max(bx);
            min_y = min_y.min(ay).min(by);
            max_y = max_y.max(ay).max(by);
        }
        let (x0, x1) = pixel_span(min_x, max_x, self.width());
        let (y0, y1) = pixel_span(min_y, max_y, self.height());
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let color = self.fill_style;
        let alpha = color.a * self.global_alpha;
        let mut coverage = vec![0.0f32; (x1 - x0) as usize];
        let mut crossings: Vec<(f32, i32)> = Vec::new();

        for py in y0..y1 {
            coverage.iter_mut().for_each(|c| *c = 0.0);

            for sample in 0..PATH_SUBSAMPLES {
                let sy = py as f32 + (sample as f32 + 0.5) / PATH_SUBSAMPLES as f32;
                crossings.clear();
                for &((ax, ay), (bx, by)) in &edges {
                    let dir = if ay <= sy && by > sy {
                        1
                    } else if by <= sy && ay > sy {
                        -1
                    } else {
                        continue;
                    };
                    let x = ax + (sy - ay) * (bx - ax) / (by - ay);
                    crossings.push((x, dir));
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, dir) in &crossings {
                    let before = winding;
                    winding += dir;
                    if before == 0 && winding != 0 {
                        span_start = x;
                    } else if before != 0 && winding == 0 {
                        let (sx0, sx1) = pixel_span(span_start, x, x1);
                        for px in sx0.max(x0)..sx1 {
                            coverage[(px - x0) as usize] +=
                                overlap(px, span_start, x) / PATH_SUBSAMPLES as f32;
                        }
                    }
                }
            }

            for px in x0..x1 {
                let c = coverage[(px - x0) as usize].min(1.0);
                self.blend(px, py, color, alpha * c);
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return;
        }
        let (left, right) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (top, bottom) = if height < 0.0 { (y + height, y) } else { (y, y + height) };

        let color = self.fill_style;
        let alpha = color.a * self.global_alpha;
        let (x0, x1) = pixel_span(left, right, self.width());
        let (y0, y1) = pixel_span(top, bottom, self.height());
        for py in y0..y1 {
            let cy = overlap(py, top, bottom);
            for px in x0..x1 {
                let cx = overlap(px, left, right);
                self.blend(px, py, color, alpha * cx * cy);
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, width: f32, height: f32) {
        if !(x.is_finite() && y.is_finite()) || !(width > 0.0 && height > 0.0) {
            return;
        }
        let (sw, sh) = (sprite.width(), sprite.height());
        if sw == 0 || sh == 0 {
            return;
        }
        let (x0, x1) = pixel_span(x, x + width, self.width());
        let (y0, y1) = pixel_span(y, y + height, self.height());

        for py in y0..y1 {
            let cy = py as f32 + 0.5;
            if cy < y || cy >= y + height {
                continue;
            }
            let sy = (((cy - y) / height * sh as f32) as u32).min(sh - 1);
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                if cx < x || cx >= x + width {
                    continue;
                }
                let sx = (((cx - x) / width * sw as f32) as u32).min(sw - 1);
                let texel = sprite.pixel(sx, sy);
                let color = Color::new(
                    texel[0] as f32 / 255.0,
                    texel[1] as f32 / 255.0,
                    texel[2] as f32 / 255.0,
                    1.0,
                );
                let alpha = texel[3] as f32 / 255.0 * self.global_alpha;
                self.blend(px, py, color, alpha);
            }
        }
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        // Out-of-range values are ignored by a canvas context.
        if (0.0..=1.0).contains(&alpha) {
            self.global_alpha = alpha;
        }
    }
}

/// Composite `layers` in order over an opaque `background`
pub fn flatten(background: Color, layers: &[&Canvas]) -> Result<RgbaImage> {
    let (width, height) = match layers.first() {
        Some(first) => (first.width(), first.height()),
        None => return Err(PinkboardError::InvalidDimensions { width: 0, height: 0 }),
    };
    if let Some(odd) = layers
        .iter()
        .find(|l| l.width() != width || l.height() != height)
    {
        return Err(PinkboardError::InvalidDimensions {
            width: odd.width(),
            height: odd.height(),
        });
    }

    let mut out = RgbaImage::from_pixel(width, height, Rgba(background.to_rgba8()));
    for layer in layers {
        for (x, y, px) in layer.pixels.enumerate_pixels() {
            if px[3] == 0 {
                continue;
            }
            let color = Color::new(
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
                1.0,
            );
            let dst = out.get_pixel_mut(x, y);
            *dst = source_over(*dst, color, px[3] as f32 / 255.0);
        }
    }
    Ok(out)
}

/// Write an image as PNG regardless of the path's extension
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PinkboardError::ImageError(format!("Failed to save {}: {}", path.display(), e)))?;
    debug!("Saved {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(PinkboardError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn fill_rect_covers_whole_pixels() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.set_fill_style(red());
        canvas.fill_rect(2.0, 3.0, 2.0, 1.0);

        assert_eq!(canvas.pixel(2, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 3)[3], 0);
        assert_eq!(canvas.pixel(2, 4)[3], 0);
    }

    #[test]
    fn fill_rect_partial_coverage_is_translucent() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_fill_style(red());
        canvas.fill_rect(1.0, 1.0, 0.5, 1.0);

        let a = canvas.pixel(1, 1)[3];
        assert!((120..=135).contains(&a), "alpha {a}");
    }

    #[test]
    fn global_alpha_scales_fills() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.set_fill_style(Color::WHITE);
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0);
        let a = canvas.pixel(0, 0)[3];
        assert!((126..=129).contains(&a));

        // Invalid values leave the previous alpha in place
        canvas.set_global_alpha(3.0);
        assert!((canvas.global_alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clear_rect_erases() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_fill_style(red());
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0);
        canvas.clear_rect(0.0, 0.0, 2.0, 4.0);
        assert_eq!(canvas.pixel(1, 1)[3], 0);
        assert_eq!(canvas.pixel(2, 1)[3], 255);

        canvas.clear();
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn fill_square_path() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_fill_style(red());
        canvas.begin_path();
        canvas.move_to(2.0, 2.0);
        canvas.line_to(8.0, 2.0);
        canvas.line_to(8.0, 8.0);
        canvas.line_to(2.0, 8.0);
        canvas.close_path();
        canvas.fill();

        assert_eq!(canvas.pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 2)[3], 255);
        assert_eq!(canvas.pixel(1, 5)[3], 0);
        assert_eq!(canvas.pixel(8, 5)[3], 0);
    }

    #[test]
    fn begin_path_discards_previous_shape() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_fill_style(red());
        canvas.move_to(0.0, 0.0);
        canvas.line_to(4.0, 0.0);
        canvas.line_to(4.0, 4.0);
        canvas.begin_path();
        canvas.fill();
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn filled_arc_is_a_disc() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.set_fill_style(Color::WHITE);
        canvas.begin_path();
        canvas.arc(10.0, 10.0, 6.0, 0.0, TAU);
        canvas.fill();

        assert_eq!(canvas.pixel(10, 10)[3], 255);
        assert_eq!(canvas.pixel(14, 10)[3], 255);
        assert_eq!(canvas.pixel(1, 1)[3], 0);
        assert_eq!(canvas.pixel(18, 10)[3], 0);
    }

    #[test]
    fn draw_image_scales_and_fades() {
        let mut source = Canvas::new(2, 2).unwrap();
        source.set_fill_style(Color::new(0.0, 0.0, 1.0, 1.0));
        source.fill_rect(0.0, 0.0, 2.0, 2.0);
        let sprite = source.into_sprite();

        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_global_alpha(1.0);
        canvas.draw_image(&sprite, 2.0, 2.0, 4.0, 4.0);
        assert_eq!(canvas.pixel(2, 2), Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(5, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(6, 6)[3], 0);

        let mut faded = Canvas::new(10, 10).unwrap();
        faded.set_global_alpha(0.25);
        faded.draw_image(&sprite, 0.0, 0.0, 10.0, 10.0);
        let a = faded.pixel(4, 4)[3];
        assert!((62..=66).contains(&a));

        // Zero-sized blits draw nothing
        let mut empty = Canvas::new(4, 4).unwrap();
        empty.draw_image(&sprite, 1.0, 1.0, 0.0, 0.0);
        assert!(empty.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn draw_image_skips_empty_sprite() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let empty = Sprite::from_image(RgbaImage::new(0, 0));
        canvas.draw_image(&empty, 0.0, 0.0, 2.0, 2.0);
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn flatten_stacks_layers_over_background() {
        let mut back = Canvas::new(4, 4).unwrap();
        back.set_fill_style(red());
        back.fill_rect(0.0, 0.0, 2.0, 4.0);

        let mut front = Canvas::new(4, 4).unwrap();
        front.set_fill_style(Color::new(0.0, 1.0, 0.0, 1.0));
        front.fill_rect(1.0, 0.0, 1.0, 4.0);

        let image = flatten(Color::BLACK, &[&back, &front]).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*image.get_pixel(3, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn flatten_rejects_mismatched_layers() {
        let a = Canvas::new(4, 4).unwrap();
        let b = Canvas::new(5, 4).unwrap();
        assert!(flatten(Color::BLACK, &[&a, &b]).is_err());
        assert!(flatten(Color::BLACK, &[]).is_err());
    }

    #[test]
    fn save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = Canvas::new(3, 3).unwrap();
        canvas.set_fill_style(red());
        canvas.fill_rect(0.0, 0.0, 3.0, 3.0);
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 3));
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }
}
