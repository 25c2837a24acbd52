//! Greedy minute-stepped scheduler implementation.

use thiserror::Error;

use crate::catalog::{Catalog, ValidationError};
use crate::config::SchedulerConfig;
use crate::critical_path::{critical_path, CriticalPath};
use crate::models::{Resource, ScheduleEntry, ScheduleResult, Task};
use crate::ordering::{topological_order, CycleError, TopologicalOrder};
use crate::{log_changes, log_checks, log_debug};

use super::state::{Completion, RunState, TaskPhase};

/// Errors that abort a scheduling call before any simulation step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Greedy resource-constrained scheduler over a validated catalog.
///
/// Construction validates the input and fixes the priority order; `run`
/// can then be called any number of times. Each run owns a fresh
/// `RunState`, so runs never observe each other.
#[derive(Debug, Clone)]
pub struct GreedyScheduler {
    catalog: Catalog,
    topo: TopologicalOrder,
    config: SchedulerConfig,
}

impl GreedyScheduler {
    /// Validate and order the catalog.
    ///
    /// # Returns
    /// * `Err(SchedulerError::Validation)` for structurally invalid input
    /// * `Err(SchedulerError::Cycle)` if the dependency graph has a cycle
    pub fn new(
        tasks: &[Task],
        resources: &[Resource],
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        let catalog = Catalog::new(tasks, resources)?;
        let topo = topological_order(&catalog)?;

        log_debug!(
            config.verbosity,
            "Priority order: {}",
            topo.order
                .iter()
                .map(|&idx| catalog.task_id(idx))
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(Self {
            catalog,
            topo,
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Task ids in scheduling priority order (highest first).
    pub fn order(&self) -> Vec<String> {
        self.topo
            .order
            .iter()
            .map(|&idx| self.catalog.task_id(idx).to_string())
            .collect()
    }

    /// Longest dependency chain, ignoring resources.
    pub fn critical_path(&self) -> CriticalPath {
        critical_path(&self.catalog, &self.topo)
    }

    /// Run the simulation.
    pub fn run(&self) -> ScheduleResult {
        self.run_observed(|_| {})
    }

    /// Run the simulation, handing the state to `observe` once per simulated
    /// minute, right after that minute's start phase.
    pub fn run_observed<F>(&self, mut observe: F) -> ScheduleResult
    where
        F: FnMut(&RunState),
    {
        let verbosity = self.config.verbosity;
        let horizon = self.config.horizon;
        let mut state = RunState::new(&self.catalog, &self.topo);

        loop {
            self.start_ready_tasks(&mut state);
            observe(&state);

            if state.all_finished() {
                break;
            }
            if state.clock >= horizon {
                log_changes!(
                    verbosity,
                    "t={}: horizon reached with {}/{} tasks finished",
                    state.clock,
                    state.finished_count(),
                    self.catalog.len()
                );
                break;
            }

            self.advance_clock(&mut state);
            self.complete_finished_tasks(&mut state);
        }

        self.build_result(&state)
    }

    /// Start ready tasks in priority order until one cannot get its resources.
    ///
    /// Nothing is released during this phase, so a task refused now stays
    /// refused for the rest of the minute and a single ordered pass is the
    /// fixed point. Stopping at the first refusal means lower-priority tasks
    /// never overtake a higher-priority one waiting on resources.
    fn start_ready_tasks(&self, state: &mut RunState) {
        let verbosity = self.config.verbosity;

        while let Some(&priority) = state.ready.first() {
            let task = self.topo.task_at(priority);
            let requirements = &self.catalog.requirements[task];

            if !state.pool.reserve(requirements) {
                log_checks!(
                    verbosity,
                    "t={}: {} waits for resources, holding back {} ready task(s)",
                    state.clock,
                    self.catalog.task_id(task),
                    state.ready.len() - 1
                );
                break;
            }

            state.ready.pop_first();
            state.phases[task] = TaskPhase::Running;
            state.starts[task] = Some(state.clock);
            state.running.insert(priority, self.catalog.durations[task]);

            log_changes!(
                verbosity,
                "t={}: start {} ({} min)",
                state.clock,
                self.catalog.task_id(task),
                self.catalog.durations[task]
            );
        }
    }

    fn advance_clock(&self, state: &mut RunState) {
        state.clock += 1;
        for remaining in state.running.values_mut() {
            *remaining -= 1;
        }
        log_debug!(
            self.config.verbosity,
            "t={}: {} running, available {:?}",
            state.clock,
            state.running.len(),
            state.pool.available_counts()
        );
    }

    /// Finish every task whose countdown hit zero, in priority order.
    fn complete_finished_tasks(&self, state: &mut RunState) {
        let done: Vec<_> = state
            .running
            .iter()
            .filter(|(_, &remaining)| remaining == 0)
            .map(|(&priority, _)| priority)
            .collect();

        for priority in done {
            let task = self.topo.task_at(priority);
            state.running.remove(&priority);
            state.phases[task] = TaskPhase::Finished;
            state.pool.release(&self.catalog.requirements[task]);

            let start = state.starts[task].unwrap_or(state.clock);
            state.completed.push(Completion {
                task,
                start,
                end: state.clock,
            });

            log_changes!(
                self.config.verbosity,
                "t={}: finish {} (started {})",
                state.clock,
                self.catalog.task_id(task),
                start
            );

            for &dependent in &self.catalog.dependents[task] {
                state.pending_deps[dependent] -= 1;
                if state.pending_deps[dependent] == 0 {
                    state.phases[dependent] = TaskPhase::Ready;
                    state.ready.insert(self.topo.priority[dependent]);
                }
            }
        }
    }

    fn build_result(&self, state: &RunState) -> ScheduleResult {
        let entries = state
            .completed
            .iter()
            .map(|c| ScheduleEntry {
                task_id: self.catalog.task_id(c.task).to_string(),
                start: c.start,
                end: c.end,
            })
            .collect();

        let mut warnings = Vec::new();
        if !state.all_finished() {
            warnings.push(format!(
                "Not all tasks fit within {} minutes. Completed: {}/{}. Last simulated time: {} min.",
                self.config.horizon,
                state.finished_count(),
                self.catalog.len(),
                state.clock
            ));
        }

        ScheduleResult { entries, warnings }
    }
}

/// Validate, order, and simulate in one call.
pub fn schedule(
    tasks: &[Task],
    resources: &[Resource],
    config: &SchedulerConfig,
) -> Result<ScheduleResult, SchedulerError> {
    Ok(GreedyScheduler::new(tasks, resources, config.clone())?.run())
}
