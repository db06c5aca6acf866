use crate::{
    color::Rgb,
    error::{ConfigError, Result},
    types::ParticleKind,
};
use serde::Deserialize;
use std::path::Path;

/// Palette used by the ambient drift and the burst effect.
pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb::new(0x99, 0x69, 0xff),
    Rgb::new(0xff, 0x69, 0xa1),
    Rgb::new(0x69, 0xb4, 0xff),
    Rgb::new(0xff, 0x9f, 0x69),
];

/// Tunables for the particle layer.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it overrides:
///
/// ```toml
/// ambient_target = 80
/// burst_speed = 12.0
/// burst_palette = ["#9969ff", "#ff69a1", "#ffeb3b", "#69b4ff"]
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum live count maintained by replenishing on death.
    pub ambient_target: usize,
    /// Hard cap on live particles; spawns beyond it are dropped.
    pub max_particles: usize,
    /// Starting life of every particle, in ticks.
    pub max_life: u32,
    /// Per-tick velocity multiplier.
    pub damping: f32,
    /// Width of the per-axis velocity range for ambient particles.
    pub ambient_speed: f32,
    /// Width of the per-axis velocity range for burst particles.
    pub burst_speed: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub ambient_palette: Vec<Rgb>,
    pub burst_palette: Vec<Rgb>,
    /// Spawn `ambient_target` particles when the simulation is created.
    pub seed_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ambient_target: 50,
            max_particles: 4000,
            max_life: 100,
            damping: 0.99,
            ambient_speed: 1.0,
            burst_speed: 8.0,
            size_min: 1.0,
            size_max: 5.0,
            ambient_palette: DEFAULT_PALETTE.to_vec(),
            burst_palette: DEFAULT_PALETTE.to_vec(),
            seed_on_start: true,
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&content)?;
        log::debug!("Loaded particle config from {}", path.display());
        Ok(cfg)
    }

    /// Checks that the values describe a simulation that can run.
    pub fn validate(&self) -> Result<()> {
        if self.ambient_palette.is_empty() {
            return Err(ConfigError::Invalid("ambient_palette is empty".into()));
        }
        if self.burst_palette.is_empty() {
            return Err(ConfigError::Invalid("burst_palette is empty".into()));
        }
        if self.max_life == 0 {
            return Err(ConfigError::Invalid("max_life must be at least 1".into()));
        }
        if self.max_particles < self.ambient_target {
            return Err(ConfigError::Invalid(format!(
                "max_particles ({}) is below ambient_target ({})",
                self.max_particles, self.ambient_target
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::Invalid(format!(
                "damping {} is outside [0, 1]",
                self.damping
            )));
        }
        if !self.ambient_speed.is_finite() || !self.burst_speed.is_finite() {
            return Err(ConfigError::Invalid("speeds must be finite".into()));
        }
        if !(self.size_min >= 0.0 && self.size_min < self.size_max && self.size_max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "size range [{}, {}) is not a non-empty, non-negative range",
                self.size_min, self.size_max
            )));
        }
        Ok(())
    }

    pub fn palette(&self, kind: ParticleKind) -> &[Rgb] {
        match kind {
            ParticleKind::Ambient => &self.ambient_palette,
            ParticleKind::Burst => &self.burst_palette,
        }
    }

    pub fn speed(&self, kind: ParticleKind) -> f32 {
        match kind {
            ParticleKind::Ambient => self.ambient_speed,
            ParticleKind::Burst => self.burst_speed,
        }
    }
}
