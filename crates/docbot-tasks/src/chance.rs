use docbot_core::DeterministicRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Success odds for diagnosis and repair checks.
///
/// A roll draws a uniform integer in `[0, sides)` and succeeds iff the draw
/// is strictly greater than `cutoff`. The shipped tuning is `sides = 10`,
/// `cutoff = 1`: an 8-in-10 success chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairOdds {
    pub sides: u32,
    pub cutoff: u32,
}

impl Default for RepairOdds {
    fn default() -> Self {
        Self {
            sides: 10,
            cutoff: 1,
        }
    }
}

impl RepairOdds {
    pub fn draw(&self, rng: &mut dyn DeterministicRng) -> u32 {
        debug_assert!(self.sides > 0, "RepairOdds.sides must be positive");
        (rng.next_u64() % u64::from(self.sides.max(1))) as u32
    }

    pub fn roll(&self, rng: &mut dyn DeterministicRng) -> bool {
        self.draw(rng) > self.cutoff
    }
}
