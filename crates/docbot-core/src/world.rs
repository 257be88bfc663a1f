use core::fmt::Debug;

/// Stable identifier for an agent.
///
/// Deterministic simulation requires stable ordering (`Ord`) and a stable
/// numeric ID (`stable_id`) for RNG seeding and trace output.
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only world access.
///
/// The kernel does not prescribe which queries a world must expose; task
/// subsystems define extension traits (positions, registries, input) on top
/// of this seam.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
