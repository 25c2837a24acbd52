//! Per-run simulation state.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::interner::IdIndex;
use crate::ordering::{Priority, TopologicalOrder};

use super::pool::ResourcePool;

/// Lifecycle of a task within one run.
///
/// `Blocked -> Ready -> Running -> Finished`; a task with no dependencies
/// starts out `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    /// Some dependency has not finished.
    Blocked,
    /// Waiting for resources.
    Ready,
    /// Resources reserved, counting down.
    Running,
    /// Resources released, end recorded.
    Finished,
}

/// A task that finished during the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub task: IdIndex,
    pub start: u32,
    pub end: u32,
}

/// Everything one scheduling run mutates.
///
/// Built fresh for every run and dropped when it returns; nothing here is
/// shared between runs. Ready and running tasks are keyed by priority so
/// iteration is always in priority order.
#[derive(Clone, Debug)]
pub struct RunState {
    pub clock: u32,
    /// Per task index.
    pub phases: Vec<TaskPhase>,
    /// Per task index: dependencies not yet finished.
    pub pending_deps: Vec<usize>,
    /// Per task index: start minute once running.
    pub starts: Vec<Option<u32>>,
    pub ready: BTreeSet<Priority>,
    /// Priority -> remaining minutes.
    pub running: BTreeMap<Priority, u32>,
    /// Finished tasks in completion order.
    pub completed: Vec<Completion>,
    pub pool: ResourcePool,
}

impl RunState {
    /// Initial state at clock 0 with a full pool.
    pub fn new(catalog: &Catalog, topo: &TopologicalOrder) -> Self {
        let n = catalog.len();
        let pending_deps: Vec<usize> = catalog.dependencies.iter().map(Vec::len).collect();

        let mut phases = vec![TaskPhase::Blocked; n];
        let mut ready = BTreeSet::new();
        for idx in 0..n {
            if pending_deps[idx] == 0 {
                phases[idx] = TaskPhase::Ready;
                ready.insert(topo.priority[idx]);
            }
        }

        Self {
            clock: 0,
            phases,
            pending_deps,
            starts: vec![None; n],
            ready,
            running: BTreeMap::new(),
            completed: Vec::with_capacity(n),
            pool: ResourcePool::new(&catalog.capacities),
        }
    }

    pub fn all_finished(&self) -> bool {
        self.completed.len() == self.phases.len()
    }

    pub fn finished_count(&self) -> usize {
        self.completed.len()
    }

    pub fn phase(&self, task: IdIndex) -> TaskPhase {
        self.phases[task]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, Task};
    use crate::ordering::topological_order;

    #[test]
    fn test_initial_phases() {
        let tasks = vec![
            Task::new("B".into(), "B".into(), 5, vec![], vec!["A".into()]),
            Task::new("A".into(), "A".into(), 5, vec![("tech".into(), 1)], vec![]),
        ];
        let catalog = Catalog::new(&tasks, &[Resource::new("tech".into(), 2)]).unwrap();
        let topo = topological_order(&catalog).unwrap();

        let state = RunState::new(&catalog, &topo);

        assert_eq!(state.clock, 0);
        assert_eq!(state.phase(0), TaskPhase::Blocked);
        assert_eq!(state.phase(1), TaskPhase::Ready);
        assert_eq!(state.ready.iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(state.running.is_empty());
        assert_eq!(state.pool.available(0), 2);
        assert!(!state.all_finished());
    }
}
