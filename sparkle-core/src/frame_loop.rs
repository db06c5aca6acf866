//! Start/stop controller that drives a [`Simulation`] from the host's
//! display-refresh callback.
//!
//! The host calls [`FrameLoop::on_refresh`] once per refresh and schedules
//! another refresh while [`FrameLoop::is_running`] is `true`. Tests call
//! [`FrameLoop::step`] directly instead.

use crate::{
    random::RandomSource,
    simulation::{Simulation, TickStats},
    surface::DrawSurface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct FrameLoop<R: RandomSource> {
    sim: Simulation<R>,
    state: LoopState,
    last: Option<TickStats>,
}

impl<R: RandomSource> FrameLoop<R> {
    /// Wraps `sim` in a stopped loop.
    pub fn new(sim: Simulation<R>) -> Self {
        Self {
            sim,
            state: LoopState::Stopped,
            last: None,
        }
    }

    pub fn start(&mut self) {
        if self.state != LoopState::Running {
            log::debug!("Frame loop started at tick {}", self.sim.ticks());
            self.state = LoopState::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::debug!("Frame loop stopped at tick {}", self.sim.ticks());
            self.state = LoopState::Stopped;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            LoopState::Running => self.stop(),
            LoopState::Stopped => self.start(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Host refresh callback.
    ///
    /// While running, advances and draws one tick. While stopped, redraws
    /// the frozen state so the surface is never left blank.
    ///
    /// ### Returns
    /// The tick's stats, or `None` when stopped.
    pub fn on_refresh(&mut self, surface: &mut impl DrawSurface) -> Option<TickStats> {
        match self.state {
            LoopState::Running => Some(self.step(surface)),
            LoopState::Stopped => {
                self.sim.render(surface);
                None
            }
        }
    }

    /// Runs exactly one tick regardless of state.
    pub fn step(&mut self, surface: &mut impl DrawSurface) -> TickStats {
        let stats = self.sim.tick(surface);
        self.last = Some(stats);
        stats
    }

    /// Stats of the most recent tick.
    pub fn last_stats(&self) -> Option<TickStats> {
        self.last
    }

    pub fn simulation(&self) -> &Simulation<R> {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<R> {
        &mut self.sim
    }
}
