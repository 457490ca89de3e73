// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ScenarioRecord, Status, StepRecord};
use crate::{
    errors::EmptyCollectionError,
    events::FeatureEvent,
    helpers::{OutputNaming, average_duration, formatted_duration, summary_percent},
    time::{StopwatchStart, stopwatch},
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::debug;

/// A feature, with its background and scenarios.
///
/// A record is created when the feature starts and closed when it finishes. Aggregate statistics
/// are computed on demand from the scenarios and steps collected in between.
#[derive(Clone, Debug)]
pub struct FeatureRecord {
    stopwatch: StopwatchStart,
    description: Option<String>,
    parent_filename: String,
    scenarios: Vec<ScenarioRecord>,
    background: Vec<StepRecord>,
    close: Option<FeatureClose>,
}

#[derive(Clone, Debug)]
struct FeatureClose {
    title: String,
    file: Utf8PathBuf,
    duration: Duration,
}

impl FeatureRecord {
    /// Creates a new record for `event` and starts timing it.
    ///
    /// `parent_filename` is the physical file that produced this feature. It can differ from the
    /// feature's own file when one source file yields several logical features.
    pub fn new(event: &FeatureEvent, parent_filename: impl Into<String>) -> Self {
        Self {
            stopwatch: stopwatch(),
            description: event.description.clone(),
            parent_filename: parent_filename.into(),
            scenarios: Vec::new(),
            background: Vec::new(),
            close: None,
        }
    }

    /// Closes this record using the default output naming.
    pub fn close(&mut self, event: &FeatureEvent) {
        self.close_with(event, &OutputNaming::default());
    }

    /// Closes this record, deriving the report file from the feature's source file with `naming`.
    pub fn close_with(&mut self, event: &FeatureEvent, naming: &OutputNaming) {
        let duration = self.stopwatch.snapshot().duration;
        let file = naming.report_file_for(&event.file);
        debug!(
            title = %event.title,
            %file,
            ?duration,
            scenarios = self.scenarios.len(),
            "closed feature",
        );
        self.close = Some(FeatureClose {
            title: event.title.clone(),
            file,
            duration,
        });
    }

    /// Returns true if [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.close.is_some()
    }

    /// Returns the feature title, or `None` if not yet closed.
    pub fn title(&self) -> Option<&str> {
        self.close.as_ref().map(|close| close.title.as_str())
    }

    /// Returns the report file for this feature, or `None` if not yet closed.
    pub fn file(&self) -> Option<&Utf8Path> {
        self.close.as_ref().map(|close| close.file.as_path())
    }

    /// Returns the time between creation and close, or `None` if not yet closed.
    pub fn duration(&self) -> Option<Duration> {
        self.close.as_ref().map(|close| close.duration)
    }

    /// Returns the time at which this feature started.
    pub fn start_time(&self) -> DateTime<Local> {
        self.stopwatch.start_time()
    }

    /// Returns the description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns true if the description is present and non-empty.
    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Returns the physical file that produced this feature.
    pub fn parent_filename(&self) -> &str {
        &self.parent_filename
    }

    /// Appends a scenario, which becomes the current scenario.
    pub fn add_scenario(&mut self, scenario: ScenarioRecord) -> &mut ScenarioRecord {
        let index = self.scenarios.len();
        self.scenarios.push(scenario);
        &mut self.scenarios[index]
    }

    /// Appends a background entry: either the background heading or one of its steps.
    pub fn add_background_step(&mut self, step: StepRecord) {
        self.background.push(step);
    }

    /// Returns the scenarios in execution order.
    pub fn scenarios(&self) -> &[ScenarioRecord] {
        &self.scenarios
    }

    /// Returns the most recently added scenario.
    pub fn current_scenario(&self) -> Option<&ScenarioRecord> {
        self.scenarios.last()
    }

    /// Returns the most recently added scenario, mutably.
    pub fn current_scenario_mut(&mut self) -> Option<&mut ScenarioRecord> {
        self.scenarios.last_mut()
    }

    /// Returns every background entry, including the heading.
    pub fn background(&self) -> &[StepRecord] {
        &self.background
    }

    /// Returns true if any background entries were captured.
    pub fn has_background(&self) -> bool {
        !self.background.is_empty()
    }

    /// Returns the background heading: the single background entry without a keyword.
    pub fn background_title(&self) -> Option<&StepRecord> {
        self.background.iter().find(|step| step.is_background_header())
    }

    /// Returns the background entries that are actual steps.
    pub fn background_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.background.iter().filter(|step| !step.is_background_header())
    }

    /// Returns the steps of every scenario, in scenario order and then step order.
    pub fn steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.scenarios.iter().flat_map(|scenario| scenario.steps())
    }

    /// Returns the scenarios that finished with `status`.
    pub fn scenarios_for(&self, status: Status) -> impl Iterator<Item = &ScenarioRecord> {
        self.scenarios
            .iter()
            .filter(move |scenario| scenario.status() == Some(status))
    }

    /// Returns the share of scenarios that finished with `status`, for example `"3 (75.0%)"`.
    pub fn scenario_summary_for(&self, status: Status) -> Result<String, EmptyCollectionError> {
        summary_percent(
            self.scenarios_for(status).count(),
            self.scenarios.len(),
            "scenarios",
        )
    }

    /// Returns the share of scenario steps that finished with `status`.
    pub fn step_summary_for(&self, status: Status) -> Result<String, EmptyCollectionError> {
        let (matching, total) = self.steps().fold((0, 0), |(matching, total), step| {
            let matches = step.status == Some(status);
            (matching + usize::from(matches), total + 1)
        });
        summary_percent(matching, total, "steps")
    }

    /// Returns the mean duration of the populated scenarios, formatted with
    /// [`formatted_duration`].
    pub fn scenario_average_duration(&self) -> Result<String, EmptyCollectionError> {
        let average = average_duration(
            self.scenarios.iter().filter_map(|scenario| scenario.duration()),
            "scenarios",
        )?;
        Ok(formatted_duration(average))
    }

    /// Returns the mean duration of the scenario steps, formatted with [`formatted_duration`].
    pub fn step_average_duration(&self) -> Result<String, EmptyCollectionError> {
        let average = average_duration(self.steps().filter_map(|step| step.duration), "steps")?;
        Ok(formatted_duration(average))
    }
}
