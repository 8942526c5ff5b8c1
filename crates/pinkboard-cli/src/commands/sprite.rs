//! Export a single heart sprite

use anyhow::{Context, Result};
use log::info;
use pinkboard_core::Settings;
use pinkboard_particles::HeartSpriteFactory;
use std::path::Path;

pub struct SpriteArgs {
    pub hue: f32,
    pub output: String,
    pub size: Option<u32>,
    pub config: Option<String>,
}

pub fn run(args: SpriteArgs) -> Result<()> {
    let settings = super::load_settings(args.config.as_deref())?;
    write_sprite(&args, &settings)
}

pub fn write_sprite(args: &SpriteArgs, settings: &Settings) -> Result<()> {
    let mut particles = settings.particles.clone();
    if let Some(size) = args.size {
        particles.size = size;
    }
    // A single export never needs the hue cache
    particles.cache_sprites = false;

    let mut hearts = HeartSpriteFactory::new(&particles).context("Failed to build heart sprite")?;
    let sprite = hearts.create(args.hue);
    sprite
        .save_png(Path::new(&args.output))
        .with_context(|| format!("Failed to write {}", args.output))?;

    info!(
        "Wrote {}px heart at hue {} to {}",
        sprite.width(),
        args.hue,
        args.output
    );
    Ok(())
}
