//! Deterministic, engine-agnostic task-kernel primitives.
//!
//! This crate defines the contract between a host behavior-tree engine and a
//! set of leaf tasks: a tri-state outcome, a tickable [`Action`] trait, and
//! the small amount of runtime bookkeeping a host needs to re-invoke a
//! running task or abandon it.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod rng;
pub mod tick;
pub mod world;

pub use action::{Action, ActionKey, ActionOutcome, ActionRuntime, ActionStatus};
pub use blackboard::{BbKey, Blackboard};
pub use rng::{DeterministicRng, SequenceRng, SplitMix64};
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
