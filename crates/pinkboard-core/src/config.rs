//! Layered configuration
//!
//! Settings are resolved with three layers of precedence (highest wins):
//! 1. Environment variables: `PINKBOARD_CAPACITY`, `PINKBOARD_DURATION`, ...
//! 2. A config file: an explicit path, or `./pinkboard.toml` when present
//! 3. Built-in defaults (the stock heart and starfield tuning)

use crate::error::{PinkboardError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "pinkboard.toml";

/// Heart particle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSettings {
    /// Number of pool slots
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Particle lifetime in seconds
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Launch speed in pixels per second
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    /// Acceleration coefficient applied to the launch velocity
    #[serde(default = "default_effect")]
    pub effect: f32,
    /// Sprite side in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    /// Reuse rasterized sprites per integer hue
    #[serde(default = "default_true")]
    pub cache_sprites: bool,
}

impl ParticleSettings {
    /// Emissions per second that keep `capacity` particles alive over one `duration`
    pub fn particle_rate(&self) -> f32 {
        self.capacity as f32 / self.duration
    }
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            duration: default_duration(),
            velocity: default_velocity(),
            effect: default_effect(),
            size: default_size(),
            cache_sprites: true,
        }
    }
}

/// Starfield tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSettings {
    /// Stars per pixel of surface width
    #[serde(default = "default_density")]
    pub density: f32,
    /// Percent chance that a reset star is a giant
    #[serde(default = "default_giant_probability")]
    pub giant_probability: f32,
    /// Percent chance that a non-giant reset star is a comet
    #[serde(default = "default_comet_probability")]
    pub comet_probability: f32,
    #[serde(default = "default_giant_color")]
    pub giant_color: [u8; 3],
    #[serde(default = "default_comet_color")]
    pub comet_color: [u8; 3],
    /// Colors picked uniformly for plain stars
    #[serde(default = "default_palette")]
    pub palette: Vec<[u8; 3]>,
}

impl Default for StarSettings {
    fn default() -> Self {
        Self {
            density: default_density(),
            giant_probability: default_giant_probability(),
            comet_probability: default_comet_probability(),
            giant_color: default_giant_color(),
            comet_color: default_comet_color(),
            palette: default_palette(),
        }
    }
}

fn default_capacity() -> usize {
    500
}
fn default_duration() -> f32 {
    2.0
}
fn default_velocity() -> f32 {
    100.0
}
fn default_effect() -> f32 {
    -0.75
}
fn default_size() -> u32 {
    30
}
fn default_true() -> bool {
    true
}
fn default_density() -> f32 {
    0.00025
}
fn default_giant_probability() -> f32 {
    3.0
}
fn default_comet_probability() -> f32 {
    10.0
}
fn default_giant_color() -> [u8; 3] {
    [180, 184, 240]
}
fn default_comet_color() -> [u8; 3] {
    [226, 225, 224]
}
fn default_palette() -> Vec<[u8; 3]> {
    vec![
        [255, 255, 255],
        [255, 159, 243],
        [72, 219, 251],
        [254, 202, 87],
        [29, 209, 161],
        [95, 39, 205],
    ]
}

/// Top-level settings, one table per animation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub particles: ParticleSettings,
    #[serde(default)]
    pub stars: StarSettings,
}

impl Settings {
    /// Load with layered precedence: defaults < config file < env vars.
    ///
    /// An explicit `path` must exist. Without one, `./pinkboard.toml` is used
    /// if it is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load_file(&local)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML document; missing fields take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content).map_err(|e| {
            PinkboardError::TomlParseError(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })?;
        info!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Apply `PINKBOARD_*` overrides resolved through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PINKBOARD_CAPACITY") {
            self.particles.capacity = parse_env("PINKBOARD_CAPACITY", &v)?;
        }
        if let Some(v) = lookup("PINKBOARD_DURATION") {
            self.particles.duration = parse_env("PINKBOARD_DURATION", &v)?;
        }
        if let Some(v) = lookup("PINKBOARD_VELOCITY") {
            self.particles.velocity = parse_env("PINKBOARD_VELOCITY", &v)?;
        }
        if let Some(v) = lookup("PINKBOARD_EFFECT") {
            self.particles.effect = parse_env("PINKBOARD_EFFECT", &v)?;
        }
        if let Some(v) = lookup("PINKBOARD_SPRITE_SIZE") {
            self.particles.size = parse_env("PINKBOARD_SPRITE_SIZE", &v)?;
        }
        if let Some(v) = lookup("PINKBOARD_STAR_DENSITY") {
            self.stars.density = parse_env("PINKBOARD_STAR_DENSITY", &v)?;
        }
        Ok(())
    }

    /// Reject values the animations cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.particles;
        if p.capacity == 0 {
            return Err(PinkboardError::InvalidConfig(
                "particles.capacity must be at least 1".into(),
            ));
        }
        if !p.duration.is_finite() || p.duration <= 0.0 {
            return Err(PinkboardError::InvalidConfig(format!(
                "particles.duration must be a positive number of seconds, got {}",
                p.duration
            )));
        }
        if !p.velocity.is_finite() || !p.effect.is_finite() {
            return Err(PinkboardError::InvalidConfig(
                "particles.velocity and particles.effect must be finite".into(),
            ));
        }
        if p.size == 0 {
            return Err(PinkboardError::InvalidConfig(
                "particles.size must be at least 1 pixel".into(),
            ));
        }

        let s = &self.stars;
        if !s.density.is_finite() || s.density < 0.0 {
            return Err(PinkboardError::InvalidConfig(format!(
                "stars.density must be non-negative, got {}",
                s.density
            )));
        }
        for (field, value) in [
            ("stars.giant_probability", s.giant_probability),
            ("stars.comet_probability", s.comet_probability),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(PinkboardError::ValueOutOfRange {
                    field: field.into(),
                    min: 0.0,
                    max: 100.0,
                    value: value as f64,
                });
            }
        }
        if s.palette.is_empty() {
            return Err(PinkboardError::InvalidConfig(
                "stars.palette needs at least one color".into(),
            ));
        }

        debug!(
            "Config ok: {} particles over {}s, star density {}",
            p.capacity, p.duration, s.density
        );
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        PinkboardError::InvalidConfig(format!("{} has an unparseable value '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_stock_tuning() {
        let settings = Settings::default();
        assert_eq!(settings.particles.capacity, 500);
        assert!((settings.particles.duration - 2.0).abs() < 1e-6);
        assert!((settings.particles.velocity - 100.0).abs() < 1e-6);
        assert!((settings.particles.effect + 0.75).abs() < 1e-6);
        assert_eq!(settings.particles.size, 30);
        assert!((settings.particles.particle_rate() - 250.0).abs() < 1e-3);
        assert!((settings.stars.density - 0.00025).abs() < 1e-9);
        assert_eq!(settings.stars.palette.len(), 6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
[particles]
capacity = 64
duration = 1

[stars]
comet_probability = 25.0
"#,
        )
        .unwrap();
        assert_eq!(settings.particles.capacity, 64);
        assert!((settings.particles.duration - 1.0).abs() < 1e-6);
        assert!((settings.particles.velocity - 100.0).abs() < 1e-6);
        assert!((settings.stars.comet_probability - 25.0).abs() < 1e-6);
        assert_eq!(settings.stars.giant_color, [180, 184, 240]);
    }

    #[test]
    fn toml_round_trip() {
        let settings = Settings::default();
        let text = settings.to_toml_string().unwrap();
        assert!(text.contains("[particles]"));
        assert!(text.contains("[stars]"));
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("PINKBOARD_CAPACITY", "12"),
            ("PINKBOARD_EFFECT", " -0.5 "),
            ("PINKBOARD_STAR_DENSITY", "0.001"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.particles.capacity, 12);
        assert!((settings.particles.effect + 0.5).abs() < 1e-6);
        assert!((settings.stars.density - 0.001).abs() < 1e-9);
        assert_eq!(settings.particles.size, 30);
    }

    #[test]
    fn env_override_rejects_garbage() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env_overrides(|k| (k == "PINKBOARD_CAPACITY").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, PinkboardError::InvalidConfig(_)));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.particles.capacity = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.particles.duration = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.stars.giant_probability = 101.0;
        assert!(matches!(
            settings.validate(),
            Err(PinkboardError::ValueOutOfRange { .. })
        ));

        let mut settings = Settings::default();
        settings.stars.palette.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[particles]\nsize = 48\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.particles.size, 48);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, PinkboardError::IoError(_)));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[particles\ncapacity = ").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        match err {
            PinkboardError::TomlParseError(msg) => assert!(msg.contains("broken.toml")),
            other => panic!("Expected TomlParseError, got {other:?}"),
        }
    }
}
