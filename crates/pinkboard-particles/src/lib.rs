//! Pinkboard Particles - Heart particle animation
//!
//! Provides the heart emitter drawn by the `hearts` scene:
//! - Parametric heart curve sampling and sprite rasterization
//! - Per-particle integration with eased growth and linear fade
//! - Fixed-capacity circular pool that evicts the oldest particle when full
//! - `ParticleDirector`, a `FrameSystem` emitting at `capacity / duration` per second

pub mod director;
pub mod heart;
pub mod particle;
pub mod pool;

pub use director::ParticleDirector;
pub use heart::{heart_color, point_on_heart, random_point_on_heart, HeartSpriteFactory};
pub use particle::{ease_out_cubic, Particle};
pub use pool::ParticlePool;
