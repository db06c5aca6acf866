//! Owned collection of live particles.

use crate::{config::Config, particle::Particle, random::RandomSource, types::ParticleKind};
use glam::Vec2;

/// The live particle set, bounded by a capacity.
///
/// Insertions beyond the capacity are dropped and reported through the
/// `bool` return of [`ParticleStore::insert`]; they are never an error.
#[derive(Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticleStore {
    /// Creates an empty store holding at most `capacity` particles.
    ///
    /// ### Parameters
    /// - `capacity` - Maximum live count; part of it is reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the cap. Particles above a lowered cap are kept until they
    /// die; only new insertions are refused.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    /// Number of further particles the store will accept.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    /// Samples one particle at `pos` with the attributes for `kind`.
    ///
    /// ### Returns
    /// `true` if the particle was stored, `false` if the store is full.
    pub fn insert(
        &mut self,
        pos: Vec2,
        kind: ParticleKind,
        cfg: &Config,
        rng: &mut impl RandomSource,
    ) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(Particle::spawn(pos, kind, cfg, rng));
        true
    }

    /// Stores an already-built particle, subject to the same cap.
    #[cfg(test)]
    pub(crate) fn push(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Visits every particle with `life > 0` exactly once.
    pub fn for_each_alive(&self, mut f: impl FnMut(&Particle)) {
        for p in self.particles.iter().filter(|p| !p.is_dead()) {
            f(p);
        }
    }

    /// Visits every stored particle mutably, including ones that died this
    /// tick and have not been removed yet.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Particle)) {
        for p in &mut self.particles {
            f(p);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Drops every particle whose life has reached zero.
    ///
    /// Surviving particles keep their relative order.
    ///
    /// ### Returns
    /// The number of particles removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_dead());
        before - self.particles.len()
    }

    /// Drops every particle of `kind`, returning how many were removed.
    pub fn remove_kind(&mut self, kind: ParticleKind) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.kind() != kind);
        before - self.particles.len()
    }

    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
