//! Injectable random source for spawn sampling.
//!
//! Every random draw the simulation makes (palette index, size, velocity,
//! position) goes through [`RandomSource`]. Any [`rand::Rng`] is a source,
//! so production code can use `rand::rng()` or a seeded `StdRng`, while
//! [`ScriptedRandom`] replays a fixed list of values for exact scenarios.

use rand::Rng;

/// Largest `f32` strictly below `1.0`.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

pub trait RandomSource {
    /// Returns a float in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Returns a float in `[min, max)`, or `min` when the range is empty.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        let v = min + self.next_unit() * (max - min);
        // Rounding can land exactly on `max`.
        if v < max { v } else { min }
    }

    /// Returns `(u - 0.5) * scale`, i.e. a value in `[-scale/2, scale/2)`.
    fn centered(&mut self, scale: f32) -> f32 {
        (self.next_unit() - 0.5) * scale
    }

    /// Returns an index in `0..len`. `len == 0` yields `0`.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }
}

impl<R: Rng> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed sequence of unit values, wrapping around at the end.
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, BELOW_ONE) })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same value.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
