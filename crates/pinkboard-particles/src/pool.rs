//! Fixed-capacity circular pool of particles

use crate::particle::Particle;
use pinkboard_core::{ParticleSettings, Point};
use pinkboard_render::{Sprite, Surface};
use std::ops::Range;
use std::rc::Rc;

/// Ring of pre-allocated particle slots.
///
/// Live particles occupy the circular span of `active` slots starting at
/// `first_active`; `first_free` is the slot the next `add` writes. The slot
/// vector is never reallocated after construction.
pub struct ParticlePool {
    particles: Vec<Particle>,
    first_active: usize,
    first_free: usize,
    active: usize,
    duration: f32,
    effect: f32,
}

impl ParticlePool {
    pub fn new(settings: &ParticleSettings) -> Self {
        Self::with_capacity(settings.capacity, settings.duration, settings.effect)
    }

    /// Pool of `capacity` benign slots (at least one)
    pub fn with_capacity(capacity: usize, duration: f32, effect: f32) -> Self {
        Self {
            particles: vec![Particle::dead(); capacity.max(1)],
            first_active: 0,
            first_free: 0,
            active: 0,
            duration,
            effect,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Number of particles in the active span
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    pub fn is_full(&self) -> bool {
        self.active == self.particles.len()
    }

    pub fn first_active(&self) -> usize {
        self.first_active
    }

    pub fn first_free(&self) -> usize {
        self.first_free
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Emit a particle into the next free slot, evicting the oldest one when
    /// the pool is full. Returns the slot index.
    pub fn add(&mut self, position: Point, velocity: Point, sprite: Rc<Sprite>) -> usize {
        let capacity = self.particles.len();
        let slot = self.first_free;
        self.particles[slot].initialize(position, velocity, sprite, self.effect);
        self.first_free = (slot + 1) % capacity;

        if self.is_full() {
            self.first_active = (self.first_active + 1) % capacity;
        } else {
            self.active += 1;
        }
        slot
    }

    /// Active span split into its two linear pieces; the second is empty
    /// unless the span wraps.
    fn active_ranges(&self) -> (Range<usize>, Range<usize>) {
        let capacity = self.particles.len();
        let end = self.first_active + self.active;
        if end <= capacity {
            (self.first_active..end, 0..0)
        } else {
            (self.first_active..capacity, 0..end - capacity)
        }
    }

    /// Advance every live particle, then drop expired ones from the front
    pub fn update(&mut self, dt: f32) {
        let (head, tail) = self.active_ranges();
        for particle in &mut self.particles[head] {
            particle.update(dt);
        }
        for particle in &mut self.particles[tail] {
            particle.update(dt);
        }

        let capacity = self.particles.len();
        while self.active > 0 && self.particles[self.first_active].is_expired(self.duration) {
            self.first_active = (self.first_active + 1) % capacity;
            self.active -= 1;
        }
    }

    /// Draw the active span oldest first
    pub fn draw(&self, surface: &mut dyn Surface) {
        for particle in self.iter_active() {
            if !particle.is_expired(self.duration) {
                particle.draw(surface, self.duration);
            }
        }
    }

    /// Particles of the active span in age order, oldest first
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        let (head, tail) = self.active_ranges();
        self.particles[head].iter().chain(self.particles[tail].iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinkboard_render::{Canvas, RecordingSurface};

    fn sprite() -> Rc<Sprite> {
        Rc::new(Canvas::new(4, 4).unwrap().into_sprite())
    }

    fn add_at(pool: &mut ParticlePool, x: f32) -> usize {
        pool.add(Point::new(x, 0.0), Point::new(10.0, 0.0), sprite())
    }

    #[test]
    fn new_pool_is_empty() {
        let pool = ParticlePool::new(&ParticleSettings::default());
        assert_eq!(pool.capacity(), 500);
        assert!(pool.is_empty());
        assert!(!pool.is_full());
        assert_eq!(pool.iter_active().count(), 0);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut pool = ParticlePool::with_capacity(0, 1.0, 0.0);
        assert_eq!(pool.capacity(), 1);
        add_at(&mut pool, 1.0);
        add_at(&mut pool, 2.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter_active().next().unwrap().position.x, 2.0);
    }

    #[test]
    fn single_add_and_zero_step() {
        let mut pool = ParticlePool::with_capacity(8, 2.0, -0.75);
        assert_eq!(add_at(&mut pool, 3.0), 0);
        assert_eq!(pool.len(), 1);

        pool.update(0.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.first_active(), 0);
        assert_eq!(pool.first_free(), 1);
        let particle = pool.iter_active().next().unwrap();
        assert_eq!(particle.age, 0.0);
        assert_eq!(particle.position.x, 3.0);
    }

    #[test]
    fn overfilling_evicts_oldest() {
        let mut pool = ParticlePool::with_capacity(4, 2.0, -0.75);
        for i in 0..7 {
            add_at(&mut pool, i as f32);
        }

        assert!(pool.is_full());
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.first_active(), 3);
        assert_eq!(pool.first_free(), 3);
        let xs: Vec<f32> = pool.iter_active().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0, 6.0]);

        // Still usable after wrapping
        pool.update(0.1);
        add_at(&mut pool, 7.0);
        assert_eq!(pool.len(), 4);
        // Survivors moved one unit; the newest replaced the oldest
        let xs: Vec<f32> = pool.iter_active().map(|p| p.position.x).collect();
        for (x, expected) in xs.iter().zip([5.0, 6.0, 7.0, 7.0]) {
            assert!((x - expected).abs() < 1e-4, "{xs:?}");
        }
    }

    #[test]
    fn scenario_three_slots() {
        let mut pool = ParticlePool::with_capacity(3, 1.0, -0.75);
        for i in 0..3 {
            add_at(&mut pool, i as f32);
        }
        assert!(pool.is_full());

        pool.update(0.5);
        assert_eq!(pool.len(), 3);
        assert!(pool.iter_active().all(|p| (p.age - 0.5).abs() < 1e-6));

        pool.update(0.6);
        assert!(pool.is_empty());
        assert_eq!(pool.first_active(), pool.first_free());
    }

    #[test]
    fn expired_front_leaves_on_update() {
        let mut pool = ParticlePool::with_capacity(4, 1.0, 0.0);
        add_at(&mut pool, 0.0);
        pool.update(0.6);
        add_at(&mut pool, 1.0);

        pool.update(0.5);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.first_active(), 1);
        assert!((pool.iter_active().next().unwrap().age - 0.5).abs() < 1e-6);
    }

    #[test]
    fn expired_particles_are_never_drawn() {
        let mut pool = ParticlePool::with_capacity(4, 1.0, 0.0);
        add_at(&mut pool, 0.0);
        pool.update(0.6);
        add_at(&mut pool, 1.0);
        pool.update(0.2);

        let mut surface = RecordingSurface::new(10, 10);
        pool.draw(&mut surface);
        assert_eq!(surface.images().count(), 2);

        // Age the newer particle past the lifetime without sweeping the span
        pool.particles[1].age = 1.0;
        surface.take_commands();
        pool.draw(&mut surface);
        assert_eq!(surface.images().count(), 1);
    }
}
