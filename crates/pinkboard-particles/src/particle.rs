//! A single heart sprite particle

use pinkboard_core::Point;
use pinkboard_render::{Sprite, Surface};
use std::rc::Rc;

/// Cubic ease-out, `-(1 - t)³ + 1`
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// Simulation state of one pool slot
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub acceleration: Point,
    /// Seconds since the last `initialize`
    pub age: f32,
    pub sprite: Option<Rc<Sprite>>,
}

impl Particle {
    /// A never-emitted slot: age 0 and nothing to draw
    pub fn dead() -> Self {
        Self {
            position: Point::ZERO,
            velocity: Point::ZERO,
            acceleration: Point::ZERO,
            age: 0.0,
            sprite: None,
        }
    }

    /// Recycle this slot for a new emission
    pub fn initialize(&mut self, position: Point, velocity: Point, sprite: Rc<Sprite>, effect: f32) {
        self.position = position;
        self.velocity = velocity;
        self.acceleration = velocity * effect;
        self.age = 0.0;
        self.sprite = Some(sprite);
    }

    /// Position moves with the velocity from before this step
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.velocity += self.acceleration * dt;
        self.age += dt;
    }

    pub fn is_expired(&self, duration: f32) -> bool {
        self.age >= duration
    }

    /// Normalized age; reaches 1 when the particle expires
    pub fn age_ratio(&self, duration: f32) -> f32 {
        self.age / duration
    }

    /// Blit the sprite centred on `position`. Size grows along the ease-out
    /// curve while opacity falls linearly.
    pub fn draw(&self, surface: &mut dyn Surface, duration: f32) {
        let Some(sprite) = &self.sprite else {
            return;
        };
        let t = self.age_ratio(duration);
        let size = sprite.width() as f32 * ease_out_cubic(t);
        surface.set_global_alpha(1.0 - t);
        surface.draw_image(
            sprite,
            self.position.x - size / 2.0,
            self.position.y - size / 2.0,
            size,
            size,
        );
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinkboard_render::{Canvas, DrawCommand, RecordingSurface};

    fn sprite(side: u32) -> Rc<Sprite> {
        Rc::new(Canvas::new(side, side).unwrap().into_sprite())
    }

    #[test]
    fn ease_endpoints() {
        assert!(ease_out_cubic(0.0).abs() < 1e-6);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn initialize_derives_acceleration() {
        let mut p = Particle::dead();
        p.age = 5.0;
        p.initialize(Point::new(1.0, 2.0), Point::new(40.0, -80.0), sprite(4), -0.75);

        assert_eq!(p.position, Point::new(1.0, 2.0));
        assert_eq!(p.acceleration, Point::new(-30.0, 60.0));
        assert_eq!(p.age, 0.0);
        assert!(p.sprite.is_some());
    }

    #[test]
    fn update_uses_previous_velocity_for_position() {
        let mut p = Particle::dead();
        p.initialize(Point::ZERO, Point::new(100.0, 0.0), sprite(4), -0.5);
        p.update(1.0);

        // x moved by the old velocity, then velocity decayed by a·dt
        assert!((p.position.x - 100.0).abs() < 1e-4);
        assert!((p.velocity.x - 50.0).abs() < 1e-4);
        assert!((p.age - 1.0).abs() < 1e-6);

        p.update(0.5);
        assert!((p.position.x - 125.0).abs() < 1e-4);
        assert!((p.velocity.x - 25.0).abs() < 1e-4);
    }

    #[test]
    fn expiry_is_inclusive() {
        let mut p = Particle::dead();
        assert!(!p.is_expired(2.0));
        p.age = 2.0;
        assert!(p.is_expired(2.0));
    }

    #[test]
    fn draw_grows_and_fades() {
        let mut p = Particle::dead();
        p.initialize(Point::new(50.0, 40.0), Point::ZERO, sprite(30), -0.75);
        p.age = 1.0;

        let mut surface = RecordingSurface::new(100, 100);
        p.draw(&mut surface, 2.0);

        let size = 30.0 * 0.875;
        assert_eq!(
            surface.images().collect::<Vec<_>>(),
            vec![&DrawCommand::DrawImage {
                x: 50.0 - size / 2.0,
                y: 40.0 - size / 2.0,
                width: size,
                height: size,
                sprite_width: 30,
                alpha: 0.5,
            }]
        );
    }

    #[test]
    fn dead_slot_draws_nothing() {
        let mut surface = RecordingSurface::new(10, 10);
        Particle::dead().draw(&mut surface, 2.0);
        assert!(surface.commands().is_empty());
    }
}
