//! Greedy minute-stepped scheduler.
//!
//! Tasks are started in topological priority order whenever their
//! dependencies have finished and the resource pool can cover them; the
//! clock then advances one minute at a time until every task finishes or
//! the horizon is reached.

mod core;
mod pool;
mod state;

pub use core::{schedule, GreedyScheduler, SchedulerError};
pub use pool::ResourcePool;
pub use state::{Completion, RunState, TaskPhase};
