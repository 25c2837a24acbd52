//! Text rendering of a schedule: sorted table, ASCII Gantt and makespan verdict.
//!
//! This sits outside the engine. It only reads the entries and warnings of
//! a `ScheduleResult` plus the task catalog for display names.

use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;
use std::fmt::{self, Write};

use crate::config::ReportConfig;
use crate::models::{ScheduleResult, Task};

/// One table/Gantt line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub start: u32,
    pub end: u32,
    pub task_id: String,
    pub name: String,
    pub duration: u32,
    pub requirements: Vec<(String, u32)>,
}

/// A schedule prepared for display.
#[derive(Clone, Debug)]
pub struct ScheduleReport {
    rows: Vec<ReportRow>,
    warnings: Vec<String>,
    horizon: u32,
    config: ReportConfig,
}

impl ScheduleReport {
    /// Build a report. Rows are sorted by (start, end); equal rows keep the
    /// result's completion order, which already follows priority.
    pub fn new(tasks: &[Task], result: &ScheduleResult, horizon: u32, config: ReportConfig) -> Self {
        let by_id: FxHashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut rows: Vec<ReportRow> = result
            .entries
            .iter()
            .map(|entry| {
                let task = by_id.get(entry.task_id.as_str());
                ReportRow {
                    start: entry.start,
                    end: entry.end,
                    task_id: entry.task_id.clone(),
                    name: task.map(|t| t.name.clone()).unwrap_or_default(),
                    duration: task.map_or(entry.end - entry.start, |t| t.duration),
                    requirements: task.map(|t| t.requirements.clone()).unwrap_or_default(),
                }
            })
            .collect();
        rows.sort_by_key(|row| (row.start, row.end));

        Self {
            rows,
            warnings: result.warnings.clone(),
            horizon,
            config,
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// End of the last-finishing task, 0 for an empty schedule.
    pub fn makespan(&self) -> u32 {
        self.rows.iter().map(|r| r.end).max().unwrap_or(0)
    }

    /// Every task finished and the last one ended within the horizon.
    pub fn fits(&self) -> bool {
        self.warnings.is_empty() && self.makespan() <= self.horizon
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== SCHEDULE (minutes from t=0) ===");
        let _ = write!(
            out,
            "{:>6} {:>6}  {:<4}  {:<35} {:>4}  Resources",
            "Start", "End", "ID", "Task", "Dur."
        );
        if self.config.origin.is_some() {
            out.push_str("  Clock");
        }
        out.push('\n');

        for row in &self.rows {
            let _ = write!(
                out,
                "{:>6} {:>6}  {:<4}  {:<35} {:>4}  {}",
                row.start,
                row.end,
                row.task_id,
                row.name,
                row.duration,
                format_requirements(&row.requirements)
            );
            if let Some(origin) = self.config.origin {
                let _ = write!(
                    out,
                    "  {}-{}",
                    clock_time(origin, row.start),
                    clock_time(origin, row.end)
                );
            }
            out.push('\n');
        }
        out
    }

    pub fn render_gantt(&self) -> String {
        let slice = self.config.slice_minutes.max(1);
        let mut out = String::new();
        let _ = writeln!(out, "=== GANTT (each # = {slice} min) ===");

        for row in &self.rows {
            let offset = (row.start / slice) as usize;
            let width = ((row.end - row.start) / slice).max(1) as usize;
            let _ = writeln!(
                out,
                "{:<4} {}{}  {}",
                row.task_id,
                "·".repeat(offset),
                "#".repeat(width),
                row.name
            );
        }
        out
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        if !self.warnings.is_empty() {
            let _ = writeln!(out, "WARNINGS");
            for warning in &self.warnings {
                let _ = writeln!(out, " - {warning}");
            }
        }
        let _ = writeln!(out, "Makespan: {} min", self.makespan());
        let verdict = if self.fits() {
            format!("Plan fits within the {}-minute window.", self.horizon)
        } else if !self.warnings.is_empty() {
            format!("Plan is incomplete within the {}-minute window.", self.horizon)
        } else {
            format!("Plan exceeds the {}-minute window.", self.horizon)
        };
        let _ = writeln!(out, "{verdict}");
        out
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}",
            self.render_table(),
            self.render_gantt(),
            self.render_summary()
        )
    }
}

fn format_requirements(requirements: &[(String, u32)]) -> String {
    if requirements.is_empty() {
        return "-".to_string();
    }
    requirements
        .iter()
        .map(|(resource, units)| format!("{resource}×{units}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn clock_time(origin: NaiveDateTime, minutes: u32) -> String {
    (origin + Duration::minutes(i64::from(minutes)))
        .format("%H:%M")
        .to_string()
}
