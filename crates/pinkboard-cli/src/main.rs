//! Pinkboard CLI - Headless renderer for the heart and starfield animations

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::render::Scene;
use commands::{config, render, sprite};
use pinkboard_core::Color;

#[derive(Parser)]
#[command(name = "pinkboard")]
#[command(about = "Render floating hearts over a twinkling starfield", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: ./pinkboard.toml if present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render animation frames to PNG (headless)
    Render {
        /// Output image path; numbered when writing a sequence
        #[arg(short, long, default_value = "pinkboard.png")]
        output: String,

        /// Which animation to draw: hearts, universe or both
        #[arg(long, default_value = "both", value_parser = parse_scene)]
        scene: Scene,

        /// Image width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Number of frames to simulate
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Background color as #rrggbb, or "none" for transparent
        #[arg(long, default_value = "#000000", value_parser = parse_color)]
        background: Color,

        /// Write every frame as a numbered PNG instead of only the last
        #[arg(long)]
        sequence: bool,

        /// Pace frames at wall-clock speed
        #[arg(long)]
        realtime: bool,
    },

    /// Write a single heart sprite to PNG
    Sprite {
        /// Hue in degrees
        #[arg(long, default_value = "330")]
        hue: f32,

        /// Output image path
        #[arg(short, long, default_value = "heart.png")]
        output: String,

        /// Sprite side in pixels (overrides particles.size)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn parse_scene(s: &str) -> Result<Scene, String> {
    match s {
        "hearts" => Ok(Scene::Hearts),
        "universe" => Ok(Scene::Universe),
        "both" => Ok(Scene::Both),
        _ => Err(format!(
            "unknown scene '{}'; valid values: hearts, universe, both",
            s
        )),
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("transparent") {
        return Ok(Color::TRANSPARENT);
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("expected a #rrggbb color, got '{}'", s));
    }
    let value = u32::from_str_radix(hex, 16).map_err(|e| format!("invalid color '{}': {}", s, e))?;
    Ok(Color::from_hex(value))
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            output,
            scene,
            width,
            height,
            fps,
            frames,
            seed,
            background,
            sequence,
            realtime,
        } => render::run(render::RenderArgs {
            output,
            scene,
            width,
            height,
            fps,
            frames,
            seed,
            background,
            sequence,
            realtime,
            config: cli.config,
        }),
        Commands::Sprite { hue, output, size } => sprite::run(sprite::SpriteArgs {
            hue,
            output,
            size,
            config: cli.config,
        }),
        Commands::Config => config::run(cli.config.as_deref()),
    }
}
