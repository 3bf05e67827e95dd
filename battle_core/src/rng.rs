//! Probability utilities shared by every battle component
//!
//! Every random decision in the engine goes through [`Dice`], which is
//! implemented for any `rand::Rng` and for [`ScriptedDice`] (a fixed replay
//! sequence used for deterministic tests and battle replays).
//!
//! The provided helpers derive from a single unit draw in `[0, 1)`, so with
//! [`ScriptedDice`] one call to `chance`, `uniform`, `int_inclusive` or
//! `weighted_index` consumes exactly one scripted draw. Any `rand::Rng`
//! samples ranges and chances through `gen_range` and `gen_bool` instead.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Source of randomness for battle resolution
pub trait Dice {
    /// Uniform draw in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniform float in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }

    /// Uniform integer in `[low, high]`
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        let roll = self.unit();
        if high <= low {
            return low;
        }
        let span = high - low;
        let offset = (roll * (span + 1) as f64).floor() as i64;
        low + offset.min(span)
    }

    /// Returns true with the given probability (0.0 to 1.0)
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Pick an index proportionally to `weights`
    ///
    /// Non-positive weights are never picked. Returns `None` when no weight is
    /// positive.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let target = self.unit() * total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(index);
            if target < cumulative {
                return Some(index);
            }
        }

        // Float rounding can leave target == total
        last_positive
    }
}

/// Real generators sample through rand's own range and bool samplers
impl<R: Rng + ?Sized> Dice for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.gen_range(low..high)
    }

    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays a fixed sequence of unit draws
///
/// Once the script is exhausted every draw returns the fallback value. The
/// default fallback of `0.99` makes every ordinary chance roll fail and every
/// range roll land near its upper bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedDice {
    script: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedDice {
    /// Create scripted dice that replay `draws` in order
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        ScriptedDice {
            script: draws.into_iter().map(clamp_unit).collect(),
            fallback: 0.99,
            consumed: 0,
        }
    }

    /// Override the value returned once the script runs out
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = clamp_unit(fallback);
        self
    }

    /// Append more draws to the end of the script
    pub fn push(&mut self, draw: f64) {
        self.script.push_back(clamp_unit(draw));
    }

    /// Number of scripted draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Total draws taken, scripted or fallback
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl Default for ScriptedDice {
    /// Empty script: every draw is the fallback
    fn default() -> Self {
        ScriptedDice::new(Vec::new())
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        self.consumed += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// Unit draw that makes `int_inclusive(low, high)` return `value`
///
/// Convenience for building scripts; picks the middle of the value's bucket.
pub fn unit_for_int(low: i64, high: i64, value: i64) -> f64 {
    if high <= low {
        return 0.0;
    }
    let buckets = (high - low + 1) as f64;
    ((value - low) as f64 + 0.5) / buckets
}

/// Unit draw that makes `uniform(low, high)` return `value`
pub fn unit_for_uniform(low: f64, high: f64, value: f64) -> f64 {
    if high <= low {
        return 0.0;
    }
    (value - low) / (high - low)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0 - f64::EPSILON)
}
