//! Pinkboard Starfield - Twinkling background stars
//!
//! `Universe` is a `FrameSystem` holding `width · density` stars. Each frame
//! every star is drawn and then drifts, re-rolling itself unless it is fading
//! out. Giants draw as a disc, comets as a disc with a fading tail, plain
//! stars as a small square in a palette color.

pub mod star;
pub mod universe;

pub use star::{probability, random_star_color, Bounds, Star};
pub use universe::Universe;
