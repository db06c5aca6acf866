//! The per-tick particle pipeline.
//!
//! One call to [`Simulation::tick`] runs, in order:
//! 1. clear the surface for the current viewport,
//! 2. advance every particle (integrate, damp, age) and draw the ones
//!    still alive at `opacity = life / max_life`,
//! 3. remove the particles whose life reached zero, and
//! 4. replenish one ambient particle per removal while the live count is
//!    below [`Config::ambient_target`].
//!
//! Particles spawned by replenishment start aging on the next tick.

use crate::{
    config::Config,
    particle::Particle,
    random::RandomSource,
    store::ParticleStore,
    surface::DrawSurface,
    types::{ParticleKind, Viewport},
};
use glam::Vec2;

/// Counters describing one completed tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// 1-based index of the tick.
    pub tick: u64,
    pub drawn: usize,
    pub removed: usize,
    pub replenished: usize,
    /// Live count after replenishment.
    pub live: usize,
}

/// Owns the particle set, its config, the viewport and the random source.
///
/// All spawning and stepping go through `&mut self`, so a spawn can only
/// happen strictly before or after a tick, never during one.
pub struct Simulation<R: RandomSource> {
    store: ParticleStore,
    cfg: Config,
    viewport: Viewport,
    rng: R,
    ticks: u64,
}

impl<R: RandomSource> Simulation<R> {
    /// Creates a simulation for `viewport`.
    ///
    /// When [`Config::seed_on_start`] is set, `ambient_target` ambient
    /// particles are spawned uniformly over the viewport right away.
    pub fn new(viewport: Viewport, cfg: Config, rng: R) -> Self {
        let mut sim = Self {
            store: ParticleStore::with_capacity(cfg.max_particles),
            cfg,
            viewport,
            rng,
            ticks: 0,
        };
        if sim.cfg.seed_on_start {
            sim.seed_ambient();
        }
        sim
    }

    /// Spawns `ambient_target` ambient particles at random viewport
    /// positions.
    ///
    /// ### Returns
    /// The number actually stored (less than the target only when the
    /// capacity is reached).
    pub fn seed_ambient(&mut self) -> usize {
        let target = self.cfg.ambient_target;
        let spawned = (0..target).filter(|_| self.spawn_at_random()).count();
        log::debug!(
            "Seeded {spawned} ambient particles over {}x{}",
            self.viewport.width,
            self.viewport.height
        );
        spawned
    }

    /// Spawns one slow ambient particle at `pos`.
    pub fn spawn_ambient(&mut self, pos: Vec2) -> bool {
        self.store.insert(pos, ParticleKind::Ambient, &self.cfg, &mut self.rng)
    }

    /// Spawns `count` fast burst particles at `pos`.
    ///
    /// Requests beyond the store capacity are dropped.
    ///
    /// ### Returns
    /// The number of particles actually spawned.
    pub fn spawn_burst(&mut self, pos: Vec2, count: usize) -> usize {
        let accepted = count.min(self.store.remaining());
        for _ in 0..accepted {
            self.store.insert(pos, ParticleKind::Burst, &self.cfg, &mut self.rng);
        }
        if accepted < count {
            log::debug!(
                "Particle cap {} reached, dropped {} of {count} burst particles",
                self.store.capacity(),
                count - accepted
            );
        }
        accepted
    }

    /// Spawns one ambient particle at a uniformly random viewport position.
    pub fn spawn_at_random(&mut self) -> bool {
        let pos = self.random_position();
        self.spawn_ambient(pos)
    }

    /// Samples a point in `[0, width) x [0, height)`.
    ///
    /// A zero-area viewport collapses to the origin along the empty axis.
    pub fn random_position(&mut self) -> Vec2 {
        let x = self.rng.range(0.0, self.viewport.width);
        let y = self.rng.range(0.0, self.viewport.height);
        Vec2::new(x, y)
    }

    /// Advances and renders one frame.
    pub fn tick(&mut self, surface: &mut impl DrawSurface) -> TickStats {
        self.ticks += 1;
        surface.clear(self.viewport);

        let damping = self.cfg.damping;
        let visible = !self.viewport.is_empty();
        let mut drawn = 0;
        self.store.for_each_mut(|p| {
            p.advance(damping);
            if visible && !p.is_dead() {
                draw_particle(surface, p);
                drawn += 1;
            }
        });

        let removed = self.store.remove_dead();
        let replenished = self.replenish(removed);

        let stats = TickStats {
            tick: self.ticks,
            drawn,
            removed,
            replenished,
            live: self.store.len(),
        };
        log::trace!("{stats:?}");
        stats
    }

    /// Redraws the current state without advancing it.
    ///
    /// ### Returns
    /// The number of circles drawn.
    pub fn render(&self, surface: &mut impl DrawSurface) -> usize {
        surface.clear(self.viewport);
        if self.viewport.is_empty() {
            return 0;
        }
        let mut drawn = 0;
        self.store.for_each_alive(|p| {
            draw_particle(surface, p);
            drawn += 1;
        });
        drawn
    }

    /// One ambient spawn per death, only while below the ambient target.
    fn replenish(&mut self, removed: usize) -> usize {
        let mut replenished = 0;
        for _ in 0..removed {
            if self.store.len() >= self.cfg.ambient_target {
                break;
            }
            if !self.spawn_at_random() {
                break;
            }
            replenished += 1;
        }
        replenished
    }

    /// Changes the surface bounds used by later random spawns.
    ///
    /// Existing particles keep their absolute positions, even when those
    /// now fall outside the new bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            log::debug!(
                "Viewport resized from {}x{} to {}x{}",
                self.viewport.width,
                self.viewport.height,
                viewport.width,
                viewport.height
            );
            self.viewport = viewport;
        }
    }

    /// Replaces the config. The store capacity follows `max_particles`;
    /// live particles keep the attributes they were spawned with.
    pub fn set_config(&mut self, cfg: Config) {
        self.store.set_capacity(cfg.max_particles);
        self.cfg = cfg;
    }

    /// Drops every particle and seeds a fresh ambient population.
    pub fn reset(&mut self) {
        self.store.clear();
        self.ticks = 0;
        self.seed_ambient();
    }

    /// Drops every burst particle and tops the ambient population back up
    /// to `ambient_target`.
    ///
    /// ### Returns
    /// The number of burst particles removed.
    pub fn clear_bursts(&mut self) -> usize {
        let removed = self.store.remove_kind(ParticleKind::Burst);
        let mut topped_up = 0;
        while self.store.len() < self.cfg.ambient_target && self.spawn_at_random() {
            topped_up += 1;
        }
        log::debug!("Cleared {removed} burst particles, respawned {topped_up} ambient");
        removed
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of ticks run since creation or the last [`Simulation::reset`].
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn draw_particle(surface: &mut impl DrawSurface, p: &Particle) {
    surface.fill_circle(p.pos(), p.size(), p.fill());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        random::ScriptedRandom,
        surface::{DrawCommand, Recorder},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn sim(seed: u64) -> Simulation<StdRng> {
        Simulation::new(
            Viewport::new(800.0, 600.0),
            Config::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    fn empty_sim() -> Simulation<StdRng> {
        let cfg = Config {
            seed_on_start: false,
            ..Config::default()
        };
        Simulation::new(Viewport::new(800.0, 600.0), cfg, StdRng::seed_from_u64(7))
    }

    #[test]
    fn new_seeds_fifty_ambient_particles_within_ranges() {
        let sim = sim(1);
        let viewport = sim.viewport();

        assert_eq!(sim.store().len(), 50);
        for p in sim.store().iter() {
            assert_eq!(p.kind(), ParticleKind::Ambient);
            assert!(viewport.contains(p.pos()));
            assert!((1.0..5.0).contains(&p.size()));
            assert!((-0.5..0.5).contains(&p.vel().x));
            assert!((-0.5..0.5).contains(&p.vel().y));
            assert_eq!(p.life(), 100);
        }
    }

    #[test]
    fn seeded_particles_have_distinct_attributes() {
        let sim = sim(2);
        let mut sizes: Vec<f32> = sim.store().iter().map(|p| p.size()).collect();
        sizes.sort_by(f32::total_cmp);
        sizes.dedup();
        assert!(sizes.len() > 40, "expected varied sizes, got {}", sizes.len());
    }

    #[test]
    fn spawn_burst_adds_exactly_count_fast_particles() {
        let mut sim = sim(3);
        let before = sim.store().len();

        let spawned = sim.spawn_burst(Vec2::new(400.0, 300.0), 20);

        assert_eq!(spawned, 20);
        assert_eq!(sim.store().len(), before + 20);
        let bursts: Vec<&Particle> = sim
            .store()
            .iter()
            .filter(|p| p.kind() == ParticleKind::Burst)
            .collect();
        assert_eq!(bursts.len(), 20);
        for p in bursts {
            assert_eq!(p.pos(), Vec2::new(400.0, 300.0));
            assert!((-4.0..4.0).contains(&p.vel().x));
            assert!((-4.0..4.0).contains(&p.vel().y));
        }
    }

    #[test]
    fn spawn_burst_drops_requests_over_capacity() {
        let cfg = Config {
            max_particles: 60,
            ..Config::default()
        };
        let mut sim = Simulation::new(Viewport::new(100.0, 100.0), cfg, StdRng::seed_from_u64(4));

        assert_eq!(sim.spawn_burst(Vec2::ZERO, 20), 10);
        assert_eq!(sim.store().len(), 60);
        assert_eq!(sim.spawn_burst(Vec2::ZERO, usize::MAX), 0);
        assert!(!sim.spawn_ambient(Vec2::ZERO));
    }

    #[test]
    fn life_drops_by_one_each_tick() {
        let mut sim = sim(5);
        let mut rec = Recorder::new();

        for expected in (90..100).rev() {
            sim.tick(&mut rec);
            assert!(sim.store().iter().all(|p| p.life() == expected));
        }
    }

    #[test]
    fn tick_moves_then_damps() {
        let mut sim = empty_sim();
        sim.store.push(Particle::new(
            Vec2::new(10.0, 10.0),
            Vec2::new(2.0, -1.0),
            2.0,
            crate::color::Rgb::WHITE,
            ParticleKind::Burst,
            100,
        ));

        sim.tick(&mut Recorder::new());

        let p = sim.store().iter().next().unwrap();
        assert_eq!(p.pos(), Vec2::new(12.0, 9.0));
        assert_eq!(p.vel(), Vec2::new(2.0 * 0.99, -0.99));
    }

    #[test]
    fn tick_clears_then_draws_every_live_particle() {
        let mut sim = sim(6);
        let mut rec = Recorder::new();

        let stats = sim.tick(&mut rec);

        assert_eq!(rec.commands[0], DrawCommand::Clear(Viewport::new(800.0, 600.0)));
        assert_eq!(rec.clear_count(), 1);
        assert_eq!(rec.circle_count(), 50);
        assert_eq!(stats.drawn, 50);
        assert_eq!(stats.tick, 1);

        for cmd in &rec.commands[1..] {
            match cmd {
                DrawCommand::Circle { radius, fill, .. } => {
                    assert!((1.0..5.0).contains(radius));
                    // opacity 99 / 100
                    assert_eq!(fill.a, 252);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn expired_particles_are_removed_and_never_drawn() {
        let cfg = Config {
            max_life: 1,
            ..Config::default()
        };
        let mut sim = Simulation::new(Viewport::new(200.0, 200.0), cfg, StdRng::seed_from_u64(8));
        let mut rec = Recorder::new();

        let stats = sim.tick(&mut rec);

        assert_eq!(rec.circle_count(), 0);
        assert_eq!(stats.removed, 50);
        assert_eq!(stats.replenished, 50);
        assert!(sim.store().iter().all(|p| p.life() == 1));
    }

    #[test]
    fn density_converges_back_to_target() {
        let mut sim = sim(9);
        let mut rec = Recorder::new();

        for _ in 0..99 {
            let stats = sim.tick(&mut rec);
            assert_eq!(stats.removed, 0);
            assert_eq!(stats.live, 50);
        }

        let stats = sim.tick(&mut rec);
        assert_eq!(stats.removed, 50);
        assert_eq!(stats.replenished, 50);
        assert_eq!(sim.store().len(), 50);
        assert!(sim.store().iter().all(|p| p.life() == 100));

        for _ in 0..250 {
            rec.take();
            assert!(sim.tick(&mut rec).live >= 50);
        }
    }

    #[test]
    fn replenishment_stops_at_target_not_at_removal_count() {
        let mut sim = sim(10);
        let mut rec = Recorder::new();

        for _ in 0..50 {
            sim.tick(&mut rec);
        }
        sim.spawn_burst(Vec2::new(400.0, 300.0), 20);
        assert_eq!(sim.store().len(), 70);

        for _ in 0..49 {
            sim.tick(&mut rec);
        }
        // The original ambient population dies; 20 bursts are still alive.
        let stats = sim.tick(&mut rec);
        assert_eq!(stats.removed, 50);
        assert_eq!(stats.replenished, 30);
        assert_eq!(sim.store().len(), 50);
        assert_eq!(sim.store().count_kind(ParticleKind::Burst), 20);

        for _ in 0..49 {
            sim.tick(&mut rec);
        }
        let stats = sim.tick(&mut rec);
        assert_eq!(stats.removed, 20);
        assert_eq!(stats.replenished, 20);
        assert_eq!(sim.store().count_kind(ParticleKind::Burst), 0);
        assert_eq!(sim.store().len(), 50);
    }

    #[test]
    fn no_replenishment_when_population_stays_above_target() {
        let mut sim = sim(11);
        let mut rec = Recorder::new();
        sim.spawn_burst(Vec2::ZERO, 30);
        for _ in 0..99 {
            sim.tick(&mut rec);
        }
        sim.spawn_burst(Vec2::ZERO, 60);

        let stats = sim.tick(&mut rec);
        assert_eq!(stats.removed, 80);
        assert_eq!(stats.replenished, 0);
        assert_eq!(stats.live, 60);
    }

    #[test]
    fn ticking_an_empty_store_only_clears() {
        let mut sim = empty_sim();
        let mut rec = Recorder::new();

        let stats = sim.tick(&mut rec);

        assert_eq!(rec.commands, vec![DrawCommand::Clear(Viewport::new(800.0, 600.0))]);
        assert_eq!(stats.drawn, 0);
        assert_eq!(stats.live, 0);
        assert!(sim.store().is_empty());
    }

    #[test]
    fn zero_area_viewport_draws_nothing() {
        let mut sim = Simulation::new(
            Viewport::new(0.0, 0.0),
            Config::default(),
            StdRng::seed_from_u64(12),
        );
        let mut rec = Recorder::new();

        assert_eq!(sim.store().len(), 50);
        assert!(sim.store().iter().all(|p| p.pos() == Vec2::ZERO));

        let stats = sim.tick(&mut rec);
        assert_eq!(rec.circle_count(), 0);
        assert_eq!(stats.drawn, 0);
        assert_eq!(sim.render(&mut rec), 0);
    }

    #[test]
    fn resize_changes_spawn_bounds_but_not_positions() {
        let mut sim = sim(13);
        let before: Vec<Vec2> = sim.store().iter().map(|p| p.pos()).collect();

        sim.resize(Viewport::new(10.0, 20.0));

        let after: Vec<Vec2> = sim.store().iter().map(|p| p.pos()).collect();
        assert_eq!(before, after);
        assert!(after.iter().any(|p| !sim.viewport().contains(*p)));

        for _ in 0..500 {
            let p = sim.random_position();
            assert!((0.0..10.0).contains(&p.x));
            assert!((0.0..20.0).contains(&p.y));
        }
    }

    #[test]
    fn render_draws_without_advancing() {
        let mut sim = sim(14);
        let mut rec = Recorder::new();

        assert_eq!(sim.render(&mut rec), 50);
        assert_eq!(sim.ticks(), 0);
        assert!(sim.store().iter().all(|p| p.life() == 100));
        assert!(matches!(rec.commands[1], DrawCommand::Circle { fill, .. } if fill.a == 255));
    }

    #[test]
    fn scripted_source_reproduces_exact_spawns() {
        let cfg = Config {
            seed_on_start: false,
            ..Config::default()
        };
        let mut sim = Simulation::new(
            Viewport::new(100.0, 100.0),
            cfg,
            ScriptedRandom::new(vec![0.25, 0.5, 0.5, 0.5]),
        );

        sim.spawn_burst(Vec2::new(5.0, 5.0), 2);

        let all: Vec<&Particle> = sim.store().iter().collect();
        assert_eq!(all[0], all[1]);
        assert_eq!(all[0].size(), 3.0);
        assert_eq!(all[0].vel(), Vec2::ZERO);
    }

    #[test]
    fn reset_reseeds() {
        let mut sim = sim(15);
        let mut rec = Recorder::new();
        sim.spawn_burst(Vec2::ZERO, 40);
        sim.tick(&mut rec);

        sim.reset();
        assert_eq!(sim.store().len(), 50);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.store().count_kind(ParticleKind::Burst), 0);
    }

    #[test]
    fn clear_bursts_keeps_density_at_target() {
        let mut sim = sim(17);
        let mut rec = Recorder::new();
        sim.spawn_burst(Vec2::new(400.0, 300.0), 40);
        for _ in 0..30 {
            sim.tick(&mut rec);
        }

        assert_eq!(sim.clear_bursts(), 40);
        assert_eq!(sim.store().count_kind(ParticleKind::Burst), 0);
        assert_eq!(sim.store().len(), 50);

        for _ in 0..300 {
            rec.take();
            assert!(sim.tick(&mut rec).live >= sim.config().ambient_target);
        }
    }

    #[test]
    fn clear_bursts_refills_a_depleted_store() {
        let cfg = Config {
            seed_on_start: false,
            ..Config::default()
        };
        let mut sim = Simulation::new(Viewport::new(300.0, 200.0), cfg, StdRng::seed_from_u64(18));
        sim.spawn_burst(Vec2::ZERO, 10);

        assert_eq!(sim.clear_bursts(), 10);
        assert_eq!(sim.store().count_kind(ParticleKind::Ambient), 50);

        let mut rec = Recorder::new();
        for _ in 0..300 {
            sim.tick(&mut rec);
        }
        assert_eq!(sim.store().len(), 50);
    }

    #[test]
    fn set_config_updates_capacity() {
        let mut sim = sim(16);
        let cfg = Config {
            max_particles: 55,
            ..Config::default()
        };
        sim.set_config(cfg);

        assert_eq!(sim.spawn_burst(Vec2::ZERO, 10), 5);
        assert_eq!(sim.config().max_particles, 55);
    }
}
