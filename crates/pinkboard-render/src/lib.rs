//! Pinkboard Render - 2D drawing surfaces
//!
//! The animations only talk to the `Surface` trait, a small subset of a
//! canvas 2D context. Implementations:
//! - `Canvas` - software rasterizer over an `image::RgbaImage`
//! - `RecordingSurface` - captures every call as a `DrawCommand` for assertions

pub mod canvas;
pub mod recorder;
pub mod sprite;
pub mod surface;

pub use canvas::Canvas;
pub use recorder::{DrawCommand, RecordingSurface};
pub use sprite::Sprite;
pub use surface::Surface;
