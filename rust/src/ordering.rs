//! Topological ordering of the task graph with Kahn's algorithm.
//!
//! The order produced here is the system-wide scheduling priority: position
//! 0 is the most important task. Tasks that become orderable at the same
//! time are taken in catalog declaration order, never by id.

use std::collections::VecDeque;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::interner::IdIndex;

/// The dependency graph is not a DAG.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected among tasks: {}", .tasks.join(", "))]
pub struct CycleError {
    /// Tasks left unordered (on a cycle or downstream of one), declaration order.
    pub tasks: Vec<String>,
}

/// Priority of a task: its position in the topological order (0 = first).
pub type Priority = usize;

/// A total order over the catalog with the priority of each task reified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Task indices, highest priority first.
    pub order: Vec<IdIndex>,
    /// Per task index: its priority.
    pub priority: Vec<Priority>,
}

impl TopologicalOrder {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Task index holding the given priority.
    #[inline]
    pub fn task_at(&self, priority: Priority) -> IdIndex {
        self.order[priority]
    }
}

/// Order all catalog tasks so that each dependency precedes its dependents.
///
/// # Returns
/// * `Ok(TopologicalOrder)` covering every task exactly once
/// * `Err(CycleError)` if any cycle exists; no partial order is returned
pub fn topological_order(catalog: &Catalog) -> Result<TopologicalOrder, CycleError> {
    let n = catalog.len();

    let mut in_degree: Vec<usize> = catalog.dependencies.iter().map(Vec::len).collect();

    // Seed in declaration order
    let mut queue: VecDeque<IdIndex> = (0..n).filter(|&idx| in_degree[idx] == 0).collect();

    let mut order: Vec<IdIndex> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        order.push(idx);

        // Dependents are stored in declaration order, which keeps ties stable
        for &dependent in &catalog.dependents[idx] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != n {
        let tasks = (0..n)
            .filter(|&idx| in_degree[idx] > 0)
            .map(|idx| catalog.task_id(idx).to_string())
            .collect();
        return Err(CycleError { tasks });
    }

    let mut priority = vec![0; n];
    for (rank, &idx) in order.iter().enumerate() {
        priority[idx] = rank;
    }

    Ok(TopologicalOrder { order, priority })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn task(id: &str, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            name: id.to_string(),
            duration: 5,
            requirements: vec![],
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn order_ids(tasks: &[Task]) -> Result<Vec<String>, CycleError> {
        let catalog = Catalog::new(tasks, &[]).unwrap();
        let order = topological_order(&catalog)?;
        Ok(order
            .order
            .iter()
            .map(|&idx| catalog.task_id(idx).to_string())
            .collect())
    }

    #[test]
    fn test_independent_tasks_keep_declaration_order() {
        let tasks = vec![task("zeta", &[]), task("alpha", &[]), task("mid", &[])];
        assert_eq!(order_ids(&tasks).unwrap(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        // Declared dependent-first on purpose
        let tasks = vec![
            task("D", &["B", "C"]),
            task("C", &["A"]),
            task("B", &["A"]),
            task("A", &[]),
        ];
        let order = order_ids(&tasks).unwrap();
        assert_eq!(order, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_every_task_once_and_edges_respected() {
        let tasks = vec![
            task("A", &[]),
            task("B", &["A"]),
            task("C", &["A"]),
            task("D", &["B", "C"]),
            task("E", &["D"]),
            task("F", &["E"]),
            task("G", &["E"]),
            task("H", &["F", "G"]),
            task("I", &["A"]),
            task("J", &["I"]),
        ];
        let catalog = Catalog::new(&tasks, &[]).unwrap();
        let topo = topological_order(&catalog).unwrap();

        let mut sorted = topo.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..tasks.len()).collect::<Vec<_>>());

        for (idx, deps) in catalog.dependencies.iter().enumerate() {
            for &dep in deps {
                assert!(topo.priority[dep] < topo.priority[idx]);
            }
        }
        for (rank, &idx) in topo.order.iter().enumerate() {
            assert_eq!(topo.task_at(rank), idx);
            assert_eq!(topo.priority[idx], rank);
        }
    }

    #[test]
    fn test_cycle_detected() {
        let tasks = vec![
            task("root", &[]),
            task("a", &["c"]),
            task("b", &["a"]),
            task("c", &["b"]),
            task("after", &["c"]),
        ];
        let err = order_ids(&tasks).unwrap_err();
        assert_eq!(err.tasks, vec!["a", "b", "c", "after"]);
        assert!(err.to_string().starts_with("Circular dependency detected"));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(order_ids(&[]).unwrap().is_empty());
    }
}
