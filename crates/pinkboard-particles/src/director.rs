//! Per-frame heart emission and pool driving

use crate::heart::{random_point_on_heart, HeartSpriteFactory};
use crate::pool::ParticlePool;
use log::trace;
use pinkboard_core::{ParticleSettings, Point, Result};
use pinkboard_render::Surface;
use pinkboard_runtime::{FrameSystem, FrameTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Emits heart particles at `capacity / duration` per second and draws the
/// pool every frame.
pub struct ParticleDirector {
    settings: ParticleSettings,
    pool: ParticlePool,
    hearts: HeartSpriteFactory,
    rng: StdRng,
    previous_ms: Option<f64>,
    emitted: u64,
}

impl ParticleDirector {
    /// Director with an entropy-seeded generator
    pub fn new(settings: ParticleSettings) -> Result<Self> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Director whose emissions are reproducible for a given seed
    pub fn with_seed(settings: ParticleSettings, seed: u64) -> Result<Self> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: ParticleSettings, rng: StdRng) -> Result<Self> {
        Ok(Self {
            pool: ParticlePool::new(&settings),
            hearts: HeartSpriteFactory::new(&settings)?,
            settings,
            rng,
            previous_ms: None,
            emitted: 0,
        })
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    /// Total particles emitted since creation
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Seconds since the previous frame. The first frame has no predecessor
    /// and gets zero.
    pub fn delta_seconds(&mut self, now_ms: f64) -> f32 {
        let previous = self.previous_ms.unwrap_or(now_ms);
        self.previous_ms = Some(now_ms);
        ((now_ms - previous) / 1000.0) as f32
    }

    /// Emit one heart from a random point of the curve, centred on a
    /// `width × height` surface, moving outward from the centre.
    pub fn emit(&mut self, width: f32, height: f32) {
        let point = random_point_on_heart(&mut self.rng);
        let mut direction = point;
        direction.set_length(self.settings.velocity);
        let hue = self.rng.gen_range(0.0..360.0);
        let sprite = self.hearts.create(hue);

        self.pool.add(
            Point::new(width / 2.0 + point.x, height / 2.0 - point.y),
            Point::new(direction.x, -direction.y),
            sprite,
        );
        self.emitted += 1;
    }

    /// Clear, emit for `dt` seconds worth of rate, then simulate and draw.
    ///
    /// Each frame emits `ceil(rate · dt)` particles with nothing carried to
    /// the next frame, so a fractional amount overshoots the nominal rate:
    /// 4.17 hearts per frame at 60 fps become 5.
    pub fn advance(&mut self, surface: &mut dyn Surface, dt: f32) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        surface.clear();

        let amount = self.settings.particle_rate() * dt;
        let mut emitted = 0;
        let mut i = 0.0;
        while i < amount {
            self.emit(width, height);
            emitted += 1;
            i += 1.0;
        }

        self.pool.update(dt);
        self.pool.draw(surface);
        trace!(
            "hearts: dt {:.4}s, emitted {}, active {}/{}",
            dt,
            emitted,
            self.pool.len(),
            self.pool.capacity()
        );
    }
}

impl FrameSystem for ParticleDirector {
    fn frame(&mut self, surface: &mut dyn Surface, time: FrameTime) {
        let dt = self.delta_seconds(time.now_ms);
        self.advance(surface, dt);
    }

    fn name(&self) -> &str {
        "hearts"
    }
}
