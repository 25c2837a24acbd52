//! Greedy resource-constrained task scheduling on a one-minute clock.
//!
//! Tasks with dependencies and discrete resource requirements are placed by
//! a deterministic time-stepped simulation bounded by a hard horizon. The
//! engine is a pure function of (tasks, resources, horizon); rendering lives
//! in [`report`].

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod catalog;
mod config;
pub mod critical_path;
mod interner;
pub mod logging;
mod models;
pub mod ordering;
pub mod report;
pub mod scheduler;

pub use catalog::{Catalog, ValidationError};
pub use config::{ReportConfig, SchedulerConfig, DEFAULT_HORIZON_MINUTES, DEFAULT_SLICE_MINUTES};
pub use critical_path::CriticalPath;
pub use interner::{IdIndex, IdInterner};
pub use models::{Resource, ScheduleEntry, ScheduleResult, Task};
pub use ordering::{CycleError, Priority, TopologicalOrder};
pub use report::{ReportRow, ScheduleReport};
pub use scheduler::{schedule, GreedyScheduler, ResourcePool, SchedulerError, TaskPhase};

impl From<SchedulerError> for PyErr {
    fn from(err: SchedulerError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

/// Schedule tasks against resources within a horizon.
///
/// # Arguments
/// * `tasks` - Tasks in declaration (priority) order
/// * `resources` - Resource catalog
/// * `horizon` - Inclusive upper bound on the clock, in minutes
/// * `verbosity` - 0=silent, 1=changes, 2=checks, 3=debug (stderr)
///
/// # Returns
/// * ScheduleResult with finished tasks and any horizon warning
///
/// # Raises
/// * ValueError on invalid input or a dependency cycle
#[pyfunction(name = "schedule")]
#[pyo3(signature = (tasks, resources, horizon=DEFAULT_HORIZON_MINUTES, verbosity=0))]
fn py_schedule(
    tasks: Vec<Task>,
    resources: Vec<Resource>,
    horizon: u32,
    verbosity: u8,
) -> PyResult<ScheduleResult> {
    let config = SchedulerConfig { horizon, verbosity };
    Ok(schedule(&tasks, &resources, &config)?)
}

/// Task ids in scheduling priority order.
///
/// # Raises
/// * ValueError on invalid input or a dependency cycle
#[pyfunction(name = "topological_order")]
fn py_topological_order(tasks: Vec<Task>, resources: Vec<Resource>) -> PyResult<Vec<String>> {
    let scheduler = GreedyScheduler::new(&tasks, &resources, SchedulerConfig::default())?;
    Ok(scheduler.order())
}

/// Critical path as (length in minutes, task ids first to last).
#[pyfunction(name = "critical_path")]
fn py_critical_path(tasks: Vec<Task>, resources: Vec<Resource>) -> PyResult<(u32, Vec<String>)> {
    let scheduler = GreedyScheduler::new(&tasks, &resources, SchedulerConfig::default())?;
    let path = scheduler.critical_path();
    Ok((path.length, path.tasks))
}

/// Render table, Gantt chart and summary for a schedule.
#[pyfunction(name = "render_report")]
#[pyo3(signature = (tasks, result, horizon=DEFAULT_HORIZON_MINUTES, config=None))]
fn py_render_report(
    tasks: Vec<Task>,
    result: ScheduleResult,
    horizon: u32,
    config: Option<ReportConfig>,
) -> String {
    ScheduleReport::new(&tasks, &result, horizon, config.unwrap_or_default()).to_string()
}

/// The horizon_sched Python module.
#[pymodule]
fn horizon_sched(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<Resource>()?;
    m.add_class::<ScheduleEntry>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<SchedulerConfig>()?;
    m.add_class::<ReportConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_topological_order, m)?)?;
    m.add_function(wrap_pyfunction!(py_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_render_report, m)?)?;

    Ok(())
}
