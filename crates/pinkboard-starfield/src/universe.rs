//! The starfield animation

use crate::star::{Bounds, Star};
use log::{debug, info};
use pinkboard_core::StarSettings;
use pinkboard_render::Surface;
use pinkboard_runtime::{FrameSystem, FrameTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A flat list of stars sized to the surface width
pub struct Universe {
    settings: StarSettings,
    rng: StdRng,
    bounds: Bounds,
    star_count: f32,
    stars: Vec<Star>,
}

impl Universe {
    /// Populate a `width × height` universe with `width · density` stars
    pub fn create(width: u32, height: u32, settings: StarSettings, seed: u64) -> Self {
        let mut universe = Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
            bounds: Bounds::new(width, height),
            star_count: 0.0,
            stars: Vec::new(),
        };
        universe.resize(width, height);
        universe.recreate();
        universe
    }

    /// Track new surface bounds. Existing stars are kept as they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.bounds = Bounds::new(width, height);
        self.star_count = self.bounds.width * self.settings.density;
        debug!(
            "Universe resized to {}x{} ({:.2} stars wanted, {} present)",
            width,
            height,
            self.star_count,
            self.stars.len()
        );
    }

    /// Replace every star with a fresh one for the current bounds
    pub fn recreate(&mut self) {
        let count = self.star_count.ceil().max(0.0) as usize;
        let mut stars = Vec::with_capacity(count);
        for _ in 0..count {
            stars.push(Star::new(&mut self.rng, self.bounds, &self.settings));
        }
        self.stars = stars;
        info!(
            "Created universe of {} stars over {}x{}",
            self.stars.len(),
            self.bounds.width,
            self.bounds.height
        );
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Fractional number of stars the current width calls for
    pub fn star_count(&self) -> f32 {
        self.star_count
    }

    pub fn settings(&self) -> &StarSettings {
        &self.settings
    }
}

impl FrameSystem for Universe {
    fn frame(&mut self, surface: &mut dyn Surface, _time: FrameTime) {
        surface.clear();
        for star in &mut self.stars {
            star.draw(surface, &self.settings);
            star.move_by(&mut self.rng, self.bounds, &self.settings);
        }
    }

    fn name(&self) -> &str {
        "universe"
    }
}
