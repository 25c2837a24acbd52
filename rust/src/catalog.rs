//! Input validation and the interned task/resource catalog.
//!
//! Every structural problem is rejected here, before any simulation runs, so
//! a bad catalog can never show up later as a stall that eats the horizon.
//! Checks run in this order and the first failure is returned:
//! 1. Resources: duplicate ids, zero capacity
//! 2. Tasks: duplicate ids
//! 3. Each task in declaration order: duration, dependencies, requirements

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::interner::{IdIndex, IdInterner};
use crate::models::{Resource, Task};

/// Structurally invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),
    #[error("Duplicate resource id: {0}")]
    DuplicateResource(String),
    #[error("Resource {resource} must have a positive capacity")]
    ZeroCapacity { resource: String },
    #[error("Task {task} must have a positive duration")]
    ZeroDuration { task: String },
    #[error("Task {task} depends on itself")]
    SelfDependency { task: String },
    #[error("Task {task} lists dependency {dependency} more than once")]
    DuplicateDependency { task: String, dependency: String },
    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("Task {task} lists resource {resource} more than once")]
    DuplicateRequirement { task: String, resource: String },
    #[error("Task {task} requires unknown resource {resource}")]
    UnknownResource { task: String, resource: String },
    #[error("Task {task} requires {required} units of {resource}, but its capacity is {capacity}")]
    ExceedsCapacity {
        task: String,
        resource: String,
        required: u32,
        capacity: u32,
    },
}

/// Validated catalog with ids replaced by dense indices.
///
/// Task index `i` is the `i`-th declared task; resource index likewise.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub task_ids: IdInterner,
    pub resource_ids: IdInterner,
    pub durations: Vec<u32>,
    pub capacities: Vec<u32>,
    /// Per task: (resource index, units), declared order.
    pub requirements: Vec<Vec<(IdIndex, u32)>>,
    /// Per task: indices of the tasks it waits for.
    pub dependencies: Vec<Vec<IdIndex>>,
    /// Per task: indices of the tasks waiting for it, in declaration order.
    pub dependents: Vec<Vec<IdIndex>>,
}

impl Catalog {
    /// Validate raw input and build the catalog.
    pub fn new(tasks: &[Task], resources: &[Resource]) -> Result<Self, ValidationError> {
        let mut resource_ids = IdInterner::with_capacity(resources.len());
        let mut capacities = Vec::with_capacity(resources.len());
        for resource in resources {
            if resource_ids.insert_new(&resource.id).is_none() {
                return Err(ValidationError::DuplicateResource(resource.id.clone()));
            }
            if resource.capacity == 0 {
                return Err(ValidationError::ZeroCapacity {
                    resource: resource.id.clone(),
                });
            }
            capacities.push(resource.capacity);
        }

        // Dependencies may point forward, so all task ids are interned first
        let mut task_ids = IdInterner::with_capacity(tasks.len());
        for task in tasks {
            if task_ids.insert_new(&task.id).is_none() {
                return Err(ValidationError::DuplicateTask(task.id.clone()));
            }
        }

        let n = tasks.len();
        let mut durations = Vec::with_capacity(n);
        let mut requirements = Vec::with_capacity(n);
        let mut dependencies = Vec::with_capacity(n);
        let mut dependents: Vec<Vec<IdIndex>> = vec![Vec::new(); n];

        for (idx, task) in tasks.iter().enumerate() {
            if task.duration == 0 {
                return Err(ValidationError::ZeroDuration {
                    task: task.id.clone(),
                });
            }
            durations.push(task.duration);

            let deps = resolve_dependencies(task, &task_ids)?;
            for &dep in &deps {
                dependents[dep].push(idx);
            }
            dependencies.push(deps);

            requirements.push(resolve_requirements(task, &resource_ids, &capacities)?);
        }

        Ok(Self {
            task_ids,
            resource_ids,
            durations,
            capacities,
            requirements,
            dependencies,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Id of the task at `idx`. Indices come from this catalog, so the
    /// lookup cannot miss.
    pub fn task_id(&self, idx: IdIndex) -> &str {
        self.task_ids.resolve(idx).unwrap_or_default()
    }

    pub fn resource_id(&self, idx: IdIndex) -> &str {
        self.resource_ids.resolve(idx).unwrap_or_default()
    }
}

fn resolve_dependencies(task: &Task, task_ids: &IdInterner) -> Result<Vec<IdIndex>, ValidationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut resolved = Vec::with_capacity(task.dependencies.len());

    for dep in &task.dependencies {
        if *dep == task.id {
            return Err(ValidationError::SelfDependency {
                task: task.id.clone(),
            });
        }
        if !seen.insert(dep.as_str()) {
            return Err(ValidationError::DuplicateDependency {
                task: task.id.clone(),
                dependency: dep.clone(),
            });
        }
        let idx = task_ids
            .get(dep)
            .ok_or_else(|| ValidationError::UnknownDependency {
                task: task.id.clone(),
                dependency: dep.clone(),
            })?;
        resolved.push(idx);
    }

    Ok(resolved)
}

fn resolve_requirements(
    task: &Task,
    resource_ids: &IdInterner,
    capacities: &[u32],
) -> Result<Vec<(IdIndex, u32)>, ValidationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut resolved = Vec::with_capacity(task.requirements.len());

    for (resource, units) in &task.requirements {
        if !seen.insert(resource.as_str()) {
            return Err(ValidationError::DuplicateRequirement {
                task: task.id.clone(),
                resource: resource.clone(),
            });
        }
        let idx = resource_ids
            .get(resource)
            .ok_or_else(|| ValidationError::UnknownResource {
                task: task.id.clone(),
                resource: resource.clone(),
            })?;
        let capacity = capacities[idx];
        if *units > capacity {
            return Err(ValidationError::ExceedsCapacity {
                task: task.id.clone(),
                resource: resource.clone(),
                required: *units,
                capacity,
            });
        }
        resolved.push((idx, *units));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, duration: u32, reqs: &[(&str, u32)], deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            name: format!("task {id}"),
            duration,
            requirements: reqs.iter().map(|(r, u)| (r.to_string(), *u)).collect(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn res(id: &str, capacity: u32) -> Resource {
        Resource {
            id: id.to_string(),
            capacity,
        }
    }

    #[test]
    fn test_builds_indices_in_declaration_order() {
        let tasks = vec![
            task("C", 5, &[], &["A", "B"]),
            task("A", 10, &[("tech", 1)], &[]),
            task("B", 15, &[("server", 1), ("tech", 2)], &["A"]),
        ];
        let resources = vec![res("tech", 2), res("server", 1)];

        let catalog = Catalog::new(&tasks, &resources).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.task_id(0), "C");
        assert_eq!(catalog.durations, vec![5, 10, 15]);
        assert_eq!(catalog.dependencies[0], vec![1, 2]);
        assert_eq!(catalog.requirements[2], vec![(1, 1), (0, 2)]);
        // A is waited on by C (declared first) and B
        assert_eq!(catalog.dependents[1], vec![0, 2]);
        assert_eq!(catalog.dependents[2], vec![0]);
    }

    #[test]
    fn test_requirement_above_capacity_rejected() {
        let tasks = vec![task("big", 10, &[("tech", 2)], &[])];
        let err = Catalog::new(&tasks, &[res("tech", 1)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ExceedsCapacity {
                task: "big".to_string(),
                resource: "tech".to_string(),
                required: 2,
                capacity: 1,
            }
        );
        assert!(err.to_string().contains("big"));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = Catalog::new(&[task("A", 0, &[], &[])], &[]).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroDuration { task } if task == "A"));
    }

    #[test]
    fn test_unknown_references_rejected() {
        let err = Catalog::new(&[task("A", 5, &[], &["ghost"])], &[]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownDependency { ref dependency, .. } if dependency == "ghost"));

        let err = Catalog::new(&[task("A", 5, &[("gpu", 1)], &[])], &[res("tech", 1)]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownResource { ref resource, .. } if resource == "gpu"));
    }

    #[test]
    fn test_self_and_duplicate_dependency_rejected() {
        let err = Catalog::new(&[task("A", 5, &[], &["A"])], &[]).unwrap_err();
        assert!(matches!(err, ValidationError::SelfDependency { .. }));

        let tasks = vec![task("A", 5, &[], &[]), task("B", 5, &[], &["A", "A"])];
        let err = Catalog::new(&tasks, &[]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateDependency { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let tasks = vec![task("A", 5, &[], &[]), task("A", 7, &[], &[])];
        assert_eq!(
            Catalog::new(&tasks, &[]).unwrap_err(),
            ValidationError::DuplicateTask("A".to_string())
        );

        let resources = vec![res("tech", 1), res("tech", 2)];
        assert_eq!(
            Catalog::new(&[], &resources).unwrap_err(),
            ValidationError::DuplicateResource("tech".to_string())
        );

        let tasks = vec![task("A", 5, &[("tech", 1), ("tech", 1)], &[])];
        assert!(matches!(
            Catalog::new(&tasks, &[res("tech", 2)]).unwrap_err(),
            ValidationError::DuplicateRequirement { .. }
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Catalog::new(&[], &[res("radio", 0)]).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroCapacity { resource } if resource == "radio"));
    }

    #[test]
    fn test_zero_unit_requirement_accepted() {
        let tasks = vec![task("A", 5, &[("tech", 0)], &[])];
        let catalog = Catalog::new(&tasks, &[res("tech", 1)]).unwrap();
        assert_eq!(catalog.requirements[0], vec![(0, 0)]);
    }
}
