//! Core data types for the scheduling engine.

use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// A unit of work competing for resources.
///
/// `requirements` keeps the declared order; it is also the order in which
/// resources are reserved and released.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    /// Display-only name.
    #[pyo3(get, set)]
    pub name: String,
    /// Duration in minutes, must be positive.
    #[pyo3(get, set)]
    pub duration: u32,
    /// (resource id, units) pairs.
    #[pyo3(get, set)]
    pub requirements: Vec<(String, u32)>,
    /// Ids of tasks that must finish before this one starts.
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, name, duration, requirements=Vec::new(), dependencies=Vec::new()))]
    pub fn new(
        id: String,
        name: String,
        duration: u32,
        requirements: Vec<(String, u32)>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            requirements,
            dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration={}, requirements={}, deps={})",
            self.id,
            self.duration,
            self.requirements.len(),
            self.dependencies.len()
        )
    }
}

/// A reusable resource with a fixed number of parallel units.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub capacity: u32,
}

#[pymethods]
impl Resource {
    #[new]
    pub fn new(id: String, capacity: u32) -> Self {
        Self { id, capacity }
    }

    fn __repr__(&self) -> String {
        format!("Resource(id={:?}, capacity={})", self.id, self.capacity)
    }
}

/// A finished task's placement, in minutes from the simulation origin.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub start: u32,
    #[pyo3(get)]
    pub end: u32,
}

#[pymethods]
impl ScheduleEntry {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleEntry(task_id={:?}, start={}, end={})",
            self.task_id, self.start, self.end
        )
    }
}

/// Output of one scheduling run.
///
/// `entries` holds only finished tasks, in completion order (ties within a
/// minute follow scheduling priority). `warnings` is empty when every task
/// finished within the horizon.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleResult {
    #[pyo3(get)]
    pub entries: Vec<ScheduleEntry>,
    #[pyo3(get)]
    pub warnings: Vec<String>,
}

impl ScheduleResult {
    /// Look up the entry for a task, if it finished.
    pub fn get(&self, task_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.task_id == task_id)
    }

    /// Task id -> (start, end), ordered by id.
    pub fn as_map(&self) -> BTreeMap<&str, (u32, u32)> {
        self.entries
            .iter()
            .map(|e| (e.task_id.as_str(), (e.start, e.end)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[pymethods]
impl ScheduleResult {
    /// Task id -> (start, end) for every finished task.
    fn plan(&self) -> HashMap<String, (u32, u32)> {
        self.entries
            .iter()
            .map(|e| (e.task_id.clone(), (e.start, e.end)))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.entries.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(entries={}, warnings={})",
            self.entries.len(),
            self.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(task_id: &str, start: u32, end: u32) -> ScheduleEntry {
        ScheduleEntry {
            task_id: task_id.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_result_lookup() {
        let result = ScheduleResult {
            entries: vec![entry("b", 0, 10), entry("a", 10, 25)],
            warnings: vec![],
        };

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("a"), Some(&entry("a", 10, 25)));
        assert!(result.get("c").is_none());

        let map = result.as_map();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map["b"], (0, 10));
    }

    #[test]
    fn test_task_constructor_keeps_declared_order() {
        let task = Task::new(
            "B".to_string(),
            "Verify backups".to_string(),
            15,
            vec![("tech".to_string(), 1), ("server".to_string(), 1)],
            vec!["A".to_string()],
        );
        assert_eq!(task.requirements[0].0, "tech");
        assert_eq!(task.requirements[1].0, "server");
    }
}
