//! Headless animation-to-PNG render command

use anyhow::{bail, Context, Result};
use log::{debug, info};
use pinkboard_core::{Color, Settings};
use pinkboard_particles::ParticleDirector;
use pinkboard_render::canvas::{flatten, save_image};
use pinkboard_render::Canvas;
use pinkboard_runtime::{FixedRateScheduler, FrameLoop, FrameSystem, SteppedClock};
use pinkboard_starfield::Universe;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Animations drawn by a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Hearts,
    Universe,
    Both,
}

impl Scene {
    pub fn hearts(self) -> bool {
        matches!(self, Scene::Hearts | Scene::Both)
    }

    pub fn universe(self) -> bool {
        matches!(self, Scene::Universe | Scene::Both)
    }
}

pub struct RenderArgs {
    pub output: String,
    pub scene: Scene,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frames: u64,
    pub seed: Option<u64>,
    pub background: Color,
    pub sequence: bool,
    pub realtime: bool,
    pub config: Option<String>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let settings = super::load_settings(args.config.as_deref())?;
    let written = render(&args, &settings)?;
    println!("Wrote {} image(s)", written.len());
    Ok(())
}

/// Simulate `frames` frames and write the requested images. Returns the
/// paths written.
pub fn render(args: &RenderArgs, settings: &Settings) -> Result<Vec<PathBuf>> {
    if args.frames == 0 {
        bail!("--frames must be at least 1");
    }
    if !args.fps.is_finite() || args.fps <= 0.0 {
        bail!("--fps must be positive, got {}", args.fps);
    }

    let seed = args.seed.unwrap_or_else(time_seed);
    debug!("Render seed {}", seed);

    let mut hearts = if args.scene.hearts() {
        Some(
            ParticleDirector::with_seed(settings.particles.clone(), seed)
                .context("Failed to create heart emitter")?,
        )
    } else {
        None
    };
    let mut universe = args.scene.universe().then(|| {
        Universe::create(
            args.width,
            args.height,
            settings.stars.clone(),
            seed.wrapping_add(1),
        )
    });

    // Stars sit on their own layer below the hearts
    let mut stars_layer =
        Canvas::new(args.width, args.height).context("Failed to create universe canvas")?;
    let mut hearts_layer =
        Canvas::new(args.width, args.height).context("Failed to create hearts canvas")?;

    let scheduler = FixedRateScheduler::new(args.fps)
        .with_limit(args.frames)
        .realtime(args.realtime);
    let mut frame_loop = FrameLoop::start(scheduler, SteppedClock::with_fps(args.fps));

    let output = PathBuf::from(&args.output);
    let mut written = Vec::new();
    let frames = frame_loop.run(|time| -> Result<()> {
        if let Some(universe) = universe.as_mut() {
            universe.frame(&mut stars_layer, time);
        }
        if let Some(hearts) = hearts.as_mut() {
            hearts.frame(&mut hearts_layer, time);
        }

        let last = time.index + 1 == args.frames;
        if args.sequence || last {
            let path = if args.sequence {
                sequence_path(&output, time.index)
            } else {
                output.clone()
            };
            let image = flatten(args.background, &[&stars_layer, &hearts_layer])?;
            save_image(&image, &path).with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(())
    })?;

    if let Some(hearts) = &hearts {
        debug!(
            "Emitted {} hearts, {} still alive",
            hearts.emitted(),
            hearts.pool().len()
        );
    }
    info!(
        "Rendered {} frames at {}x{} ({} image(s) written)",
        frames,
        args.width,
        args.height,
        written.len()
    );
    Ok(written)
}

/// `out.png` becomes `out_0007.png` for frame 7
fn sequence_path(output: &Path, index: u64) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    output.with_file_name(format!("{}_{:04}.{}", stem, index, ext))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
