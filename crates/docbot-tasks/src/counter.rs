#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bounded retry counter gating repeated probabilistic attempts.
///
/// The boundary is inclusive: a counter sitting exactly at its maximum still
/// counts as "not maxed", so an attempt budget of `max` admits `max + 1`
/// draws before exhausting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdCounter {
    count: u32,
    max: u32,
}

impl ThresholdCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn not_maxed(&self) -> bool {
        self.count <= self.max
    }
}
