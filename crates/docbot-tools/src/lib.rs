//! Deterministic trace primitives for the workshop task layer.
//!
//! Everything the tasks would "log" (prompts waiting on the player, lookup
//! failures, repair-counter progress) is recorded as plain data so a run can
//! be replayed, diffed, and asserted on. Host-process logging (`tracing`)
//! belongs to integration crates, not here.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
