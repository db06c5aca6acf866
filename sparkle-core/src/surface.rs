//! The 2-D drawing surface the simulation renders into.

use crate::{color::Rgba, types::Viewport};
use glam::Vec2;

/// Minimal immediate-mode paint API: clear, then fill circles.
///
/// Implementations composite `fill` with its alpha channel over whatever
/// is already drawn in the same frame.
pub trait DrawSurface {
    /// Erases the rectangle `(0, 0)..(viewport.width, viewport.height)`.
    fn clear(&mut self, viewport: Viewport);

    /// Fills a circle of `radius` pixels centered at `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba);
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn clear(&mut self, viewport: Viewport) {
        (**self).clear(viewport);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba) {
        (**self).fill_circle(center, radius, fill);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Viewport),
    Circle { center: Vec2, radius: f32, fill: Rgba },
}

/// A surface that records draw calls instead of painting.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear(_)))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.commands.len() - self.clear_count()
    }
}

impl DrawSurface for Recorder {
    fn clear(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Clear(viewport));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }
}
