//! Parametric heart curve and heart sprite generation

use log::debug;
use pinkboard_core::{Color, ParticleSettings, PinkboardError, Point, Result};
use pinkboard_render::{Canvas, Sprite, Surface};
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::PI;
use std::rc::Rc;

/// Parameter step used when tracing the outline
const OUTLINE_STEP: f32 = 0.01;

/// Curve units mapped onto one sprite side
const SPRITE_SPAN: f32 = 350.0;

/// Point on the heart curve for `t` in `[-π, π]`. Y grows upward.
pub fn point_on_heart(t: f32) -> Point {
    Point::new(
        160.0 * t.sin().powi(3),
        130.0 * t.cos() - 50.0 * (2.0 * t).cos() - 20.0 * (3.0 * t).cos() - 10.0 * (4.0 * t).cos()
            + 25.0,
    )
}

/// Uniformly sampled parameter, `t = π − 2π·u`
pub fn random_point_on_heart<R: Rng + ?Sized>(rng: &mut R) -> Point {
    point_on_heart(PI - 2.0 * PI * rng.gen::<f32>())
}

/// Closed heart outline in sprite pixel coordinates (Y grows downward)
pub fn heart_outline(size: u32) -> Vec<Point> {
    let size = size as f32;
    let to_sprite = |t: f32| {
        let p = point_on_heart(t);
        Point::new(
            size / 2.0 + p.x * size / SPRITE_SPAN,
            size / 2.0 - p.y * size / SPRITE_SPAN,
        )
    };

    let mut t = -PI;
    let mut outline = vec![to_sprite(t)];
    while t < PI {
        t += OUTLINE_STEP;
        outline.push(to_sprite(t));
    }
    outline
}

/// Trace the heart outline as one closed path and fill it with `color`
pub fn fill_heart(surface: &mut dyn Surface, size: u32, color: Color) {
    let outline = heart_outline(size);
    surface.begin_path();
    surface.move_to(outline[0].x, outline[0].y);
    for p in &outline[1..] {
        surface.line_to(p.x, p.y);
    }
    surface.close_path();
    surface.set_fill_style(color);
    surface.fill();
}

/// Produces freshly colored heart sprites.
///
/// The outline is rasterized once as a white coverage mask; each sprite is
/// the mask tinted to `hsl(hue, 100%, 70%)`. With caching enabled, hues are
/// bucketed to whole degrees and each bucket is tinted once.
pub struct HeartSpriteFactory {
    mask: Sprite,
    cache: Option<HashMap<u16, Rc<Sprite>>>,
}

impl HeartSpriteFactory {
    pub fn new(settings: &ParticleSettings) -> Result<Self> {
        if settings.size == 0 {
            return Err(PinkboardError::InvalidDimensions {
                width: settings.size,
                height: settings.size,
            });
        }
        let mut canvas = Canvas::new(settings.size, settings.size)?;
        fill_heart(&mut canvas, settings.size, Color::WHITE);
        let mask = canvas.into_sprite();
        debug!(
            "Rasterized {}px heart mask ({} covered pixels)",
            settings.size,
            mask.opaque_pixel_count()
        );

        Ok(Self {
            mask,
            cache: settings.cache_sprites.then(HashMap::new),
        })
    }

    pub fn size(&self) -> u32 {
        self.mask.width()
    }

    /// The uncolored heart coverage
    pub fn mask(&self) -> &Sprite {
        &self.mask
    }

    /// Number of distinct hues held by the cache
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }

    /// Heart sprite for `hue` in degrees
    pub fn create(&mut self, hue: f32) -> Rc<Sprite> {
        let Some(cache) = self.cache.as_mut() else {
            return Rc::new(self.mask.tinted(heart_color(hue)));
        };

        let bucket = (hue.rem_euclid(360.0).floor() as u16).min(359);
        cache
            .entry(bucket)
            .or_insert_with(|| Rc::new(self.mask.tinted(heart_color(bucket as f32))))
            .clone()
    }
}

/// Fill color of a heart sprite
pub fn heart_color(hue: f32) -> Color {
    Color::from_hsl(hue, 1.0, 0.7)
}
