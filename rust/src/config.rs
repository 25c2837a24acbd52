//! Configuration types for the scheduling engine and its report.

use chrono::NaiveDateTime;
use pyo3::prelude::*;

/// Horizon used when the caller does not supply one.
pub const DEFAULT_HORIZON_MINUTES: u32 = 120;

/// Width of one Gantt character, in minutes.
pub const DEFAULT_SLICE_MINUTES: u32 = 5;

/// Configuration for a scheduling run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Inclusive upper bound on the simulated clock, in minutes.
    #[pyo3(get, set)]
    pub horizon: u32,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON_MINUTES,
            verbosity: 0,
        }
    }
}

impl SchedulerConfig {
    /// Default configuration with a different horizon.
    pub fn with_horizon(horizon: u32) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (horizon=None, verbosity=None))]
    fn new(horizon: Option<u32>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            horizon: horizon.unwrap_or(defaults.horizon),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerConfig(horizon={}, verbosity={})",
            self.horizon, self.verbosity
        )
    }
}

/// Configuration for rendering a schedule.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Minutes represented by one Gantt character.
    #[pyo3(get, set)]
    pub slice_minutes: u32,
    /// Wall-clock instant of minute 0; adds clock columns to the table when set.
    #[pyo3(get, set)]
    pub origin: Option<NaiveDateTime>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            slice_minutes: DEFAULT_SLICE_MINUTES,
            origin: None,
        }
    }
}

#[pymethods]
impl ReportConfig {
    #[new]
    #[pyo3(signature = (slice_minutes=None, origin=None))]
    fn new(slice_minutes: Option<u32>, origin: Option<NaiveDateTime>) -> Self {
        let defaults = Self::default();
        Self {
            // A zero-width slice would divide by zero in the Gantt view
            slice_minutes: slice_minutes.unwrap_or(defaults.slice_minutes).max(1),
            origin,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ReportConfig(slice_minutes={}, origin={:?})",
            self.slice_minutes, self.origin
        )
    }
}
