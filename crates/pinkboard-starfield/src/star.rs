//! Twinkling stars: plain, giant and comet variants

use pinkboard_core::{Color, StarSettings};
use pinkboard_render::Surface;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

/// Segments in a comet's tail
const COMET_TAIL: usize = 30;

/// Size of the area stars are placed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Roll a `percent` chance on a 1..=1000 die. The comparison is strict, so
/// 100% still misses on the top face.
pub fn probability<R: Rng + ?Sized>(rng: &mut R, percent: f32) -> bool {
    (rng.gen::<f32>() * 1000.0).floor() + 1.0 < percent * 10.0
}

/// Uniform palette entry, white for an empty palette
pub fn random_star_color<R: Rng + ?Sized>(rng: &mut R, palette: &[[u8; 3]]) -> [u8; 3] {
    palette.choose(rng).copied().unwrap_or([255, 255, 255])
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    /// Side of a plain star's square
    pub r: f32,
    pub dx: f32,
    pub dy: f32,
    pub opacity: f32,
    pub giant: bool,
    pub comet: bool,
    pub fading_out: bool,
    /// Palette color used by plain stars
    pub color: [u8; 3],
}

impl Star {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, settings: &StarSettings) -> Self {
        let mut star = Self {
            x: 0.0,
            y: 0.0,
            r: 0.0,
            dx: 0.0,
            dy: 0.0,
            opacity: 0.0,
            giant: false,
            comet: false,
            fading_out: false,
            color: [255, 255, 255],
        };
        star.reset(rng, bounds, settings);
        star
    }

    /// Re-roll every field
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Bounds, settings: &StarSettings) {
        self.giant = probability(rng, settings.giant_probability);
        self.comet = !self.giant && probability(rng, settings.comet_probability);

        self.x = rng.gen::<f32>() * bounds.width;
        self.y = rng.gen::<f32>() * bounds.height;
        self.r = rng.gen::<f32>() * 1.5 + 0.5;

        self.dx = rng.gen::<f32>() * 0.2;
        self.dy = rng.gen::<f32>() * 0.2;

        self.opacity = rng.gen();
        self.fading_out = false;

        self.color = random_star_color(rng, &settings.palette);
    }

    pub fn draw(&self, surface: &mut dyn Surface, settings: &StarSettings) {
        surface.begin_path();

        // Heads are filled explicitly; an arc left in the path paints nothing
        if self.giant {
            surface.set_fill_style(Color::from_rgb8(settings.giant_color).with_alpha(self.opacity));
            surface.arc(self.x, self.y, 2.0, 0.0, TAU);
            surface.fill();
        } else if self.comet {
            let comet = Color::from_rgb8(settings.comet_color);
            surface.set_fill_style(comet.with_alpha(self.opacity));
            surface.arc(self.x, self.y, 1.5, 0.0, TAU);
            surface.fill();

            for i in 0..COMET_TAIL {
                let i = i as f32;
                let alpha = (self.opacity - self.opacity / 20.0 * i).max(0.0);
                surface.set_fill_style(comet.with_alpha(alpha));
                surface.fill_rect(self.x - self.dx / 4.0 * i, self.y - self.dy / 4.0 * i, 2.0, 2.0);
            }
        } else {
            surface.set_fill_style(Color::from_rgb8(self.color).with_alpha(self.opacity));
            surface.fill_rect(self.x, self.y, self.r, self.r);
        }

        surface.close_path();
    }

    /// Drift by `(dx, dy)`, then re-roll unless the star is fading out.
    /// A star that ends up right of or above `bounds` starts fading and is
    /// never re-rolled again.
    pub fn move_by<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Bounds, settings: &StarSettings) {
        self.x += self.dx;
        self.y += self.dy;

        if !self.fading_out {
            self.reset(rng, bounds, settings);
        }

        if self.x > bounds.width || self.y < 0.0 {
            self.fading_out = true;
        }
    }
}
