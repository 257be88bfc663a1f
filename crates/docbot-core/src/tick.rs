use crate::{rng, AgentId, SplitMix64};

/// Per-invocation context handed to every task.
///
/// `seed` is the scenario seed; combined with the agent id and a stream
/// constant it yields reproducible randomness without any global generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    /// RNG for `(agent, stream)`, stable across ticks.
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }

    /// RNG for `(agent, stream)` at this tick.
    ///
    /// Conditions that redraw every tick (diagnosis checks and the like) need
    /// a fresh draw per tick; mixing the tick into the stream gives each tick
    /// its own generator while staying a pure function of the context.
    pub fn tick_rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        self.rng_for_agent(agent, stream ^ rng::mix64(self.tick))
    }
}
