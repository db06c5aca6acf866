use crate::{
    color::{Rgb, Rgba},
    config::Config,
    random::RandomSource,
    types::ParticleKind,
};
use glam::Vec2;

/// A single particle: linear motion with per-tick damping and a life
/// countdown that drives both removal and fade-out.
///
/// `size`, `color` and `kind` are fixed at creation; only position,
/// velocity and life change, and only through [`Particle::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    color: Rgb,
    kind: ParticleKind,
    life: u32,
    max_life: u32,
}

impl Particle {
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        size: f32,
        color: Rgb,
        kind: ParticleKind,
        max_life: u32,
    ) -> Self {
        Self {
            pos,
            vel,
            size,
            color,
            kind,
            life: max_life,
            max_life,
        }
    }

    /// Samples a fresh particle at `pos`.
    ///
    /// Draw order from `rng` is palette index, size, `vx`, `vy`:
    /// - color uniform over the palette for `kind`
    /// - size uniform in `[cfg.size_min, cfg.size_max)`
    /// - each velocity component `(u - 0.5) * cfg.speed(kind)`
    ///
    /// `pos` is not validated; off-canvas spawns simply drift and fade.
    pub fn spawn(pos: Vec2, kind: ParticleKind, cfg: &Config, rng: &mut impl RandomSource) -> Self {
        let palette = cfg.palette(kind);
        let color = palette
            .get(rng.index(palette.len()))
            .copied()
            .unwrap_or(Rgb::WHITE);
        let size = rng.range(cfg.size_min, cfg.size_max);
        let speed = cfg.speed(kind);
        let vel = Vec2::new(rng.centered(speed), rng.centered(speed));

        Self::new(pos, vel, size, color, kind, cfg.max_life)
    }

    /// One tick of motion: integrate, damp, age.
    #[inline]
    pub fn advance(&mut self, damping: f32) {
        self.pos += self.vel;
        self.vel *= damping;
        self.life = self.life.saturating_sub(1);
    }

    /// `life / max_life`, exactly `0.0` once the particle is dead.
    #[inline]
    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life == 0
    }

    /// Palette color combined with the current opacity.
    pub fn fill(&self) -> Rgba {
        self.color.with_alpha(self.opacity())
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn max_life(&self) -> u32 {
        self.max_life
    }
}
