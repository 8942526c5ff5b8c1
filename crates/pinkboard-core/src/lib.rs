//! Pinkboard Core - Foundational types for the Pinkboard animations
//!
//! This crate provides the types that all other Pinkboard crates depend on:
//! - `Point` - 2D vector with length and normalization helpers
//! - `Color` - RGBA color with HSL and byte-triplet constructors
//! - `Settings` - layered particle and starfield configuration
//! - Error types and Result alias

pub mod config;
mod error;
mod types;

pub use config::{ParticleSettings, Settings, StarSettings};
pub use error::{PinkboardError, Result};
pub use types::{Color, Point};
