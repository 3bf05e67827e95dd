//! StatValue - The triple modifier container (Flat → Increased → More)

use serde::{Deserialize, Serialize};

const FLOOR_TOLERANCE: f64 = 1e-9;

/// A stat that follows the Flat → Increased → More model
///
/// Final value is `(base + flat) × (1 + increased) × Π(1 + more)`, floored
/// to an integer by [`StatValue::resolve`].
///
/// - `increased`: summed decimals (0.40 = 40%)
/// - `more`: each entry multiplies separately; negative entries shrink the stat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub increased: f64,
    pub more: Vec<f64>,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            flat: 0.0,
            increased: 0.0,
            more: Vec::new(),
        }
    }

    /// Calculate final value: (base + flat) × (1 + increased) × Π(1 + more)
    pub fn compute(&self) -> f64 {
        let base_total = self.base + self.flat;
        let increased_mult = 1.0 + self.increased;
        base_total * increased_mult * self.total_more_multiplier()
    }

    /// Final value floored to a whole stat, never negative
    ///
    /// A small tolerance keeps products like 20 × 1.15 from flooring to 22.
    pub fn resolve(&self) -> i64 {
        ((self.compute() + FLOOR_TOLERANCE).floor() as i64).max(0)
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    pub fn add_more(&mut self, value: f64) {
        self.more.push(value);
    }

    pub fn total_more_multiplier(&self) -> f64 {
        self.more.iter().map(|m| 1.0 + m).product()
    }
}
