//! The drawing context consumed by the animations

use crate::sprite::Sprite;
use pinkboard_core::Color;

/// Subset of a canvas 2D context.
///
/// Paths are built with `begin_path` / `move_to` / `line_to` / `arc` and
/// painted with `fill`. Every paint operation is multiplied by the current
/// global alpha.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reset the rectangle to fully transparent pixels
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Discard the current path
    fn begin_path(&mut self);

    /// Close the current subpath back to its first point
    fn close_path(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    /// Append a clockwise arc (angles in radians) to the current path
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);

    /// Fill the current path with the fill style (non-zero winding)
    fn fill(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Blit `sprite` scaled into the destination rectangle
    fn draw_image(&mut self, sprite: &Sprite, x: f32, y: f32, width: f32, height: f32);

    fn set_fill_style(&mut self, color: Color);

    fn set_global_alpha(&mut self, alpha: f32);

    /// Clear the whole surface
    fn clear(&mut self) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.clear_rect(0.0, 0.0, w, h);
    }
}
