use crate::chance::RepairOdds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Workshop tuning constants.
///
/// Defaults mirror the shipped scene: the agent parks 5 units short of its
/// target, customers interact within 20 units, and both error budgets allow
/// three recorded failures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorkshopConfig {
    /// Arrival radius for `MoveTo`.
    pub stop_distance: f32,
    /// Customer proximity radius for `CheckCustomer`/`Idle`/`DischargeCustomer`.
    pub interaction_distance: f32,
    /// Local (per-attempt) error budget.
    pub max_local_errors: u32,
    /// Universal (per-visit) error budget.
    pub max_universal_errors: u32,
    /// Downward offset applied when staging the patient on a conveyor
    /// waypoint, so it sits on the belt surface rather than at the marker.
    pub spawn_offset: f32,
    /// Diagnosis/repair success odds.
    pub odds: RepairOdds,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            stop_distance: 5.0,
            interaction_distance: 20.0,
            max_local_errors: 3,
            max_universal_errors: 3,
            spawn_offset: 0.5,
            odds: RepairOdds::default(),
        }
    }
}
