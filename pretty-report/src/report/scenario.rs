// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Location, Status, StepRecord};
use crate::{
    events::ScenarioEvent,
    time::{StopwatchStart, stopwatch},
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// A scenario, or one row of a scenario outline's examples table.
///
/// A record is created when the scenario starts, collects steps while it runs, and is populated
/// from the engine's scenario event once it finishes.
#[derive(Clone, Debug)]
pub struct ScenarioRecord {
    stopwatch: StopwatchStart,
    steps: Vec<StepRecord>,
    outcome: Option<ScenarioOutcome>,
    image: Option<ScenarioImage>,
}

#[derive(Clone, Debug)]
struct ScenarioOutcome {
    name: String,
    location: Location,
    status: Status,
    duration: Duration,
}

/// A visual artifact, such as a screenshot, attached to a scenario.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScenarioImage {
    /// The path to the image, relative to the report.
    pub path: String,
    /// A label to show alongside the image.
    pub label: String,
    /// A unique identifier for the image element.
    pub id: String,
}

impl ScenarioRecord {
    /// Creates a new record and starts timing it.
    pub fn new() -> Self {
        Self {
            stopwatch: stopwatch(),
            steps: Vec::new(),
            outcome: None,
            image: None,
        }
    }

    /// Appends a finished step.
    pub fn append_step(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Populates this record from the engine's scenario event, recording the elapsed time.
    ///
    /// Calling this more than once overwrites the previous values.
    pub fn populate(&mut self, event: &ScenarioEvent) {
        let snapshot = self.stopwatch.snapshot();
        debug!(
            name = event.name(),
            status = %event.status(),
            duration = ?snapshot.duration,
            "populated scenario",
        );
        self.outcome = Some(ScenarioOutcome {
            name: event.name().to_owned(),
            location: event.location().clone(),
            status: event.status(),
            duration: snapshot.duration,
        });
    }

    /// Returns true if [`populate`](Self::populate) has been called.
    pub fn is_populated(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the steps in execution order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Returns the time at which this scenario started.
    pub fn start_time(&self) -> DateTime<Local> {
        self.stopwatch.start_time()
    }

    /// Returns the scenario name, or `None` if not yet populated.
    pub fn name(&self) -> Option<&str> {
        self.outcome.as_ref().map(|outcome| outcome.name.as_str())
    }

    /// Returns the scenario location, or `None` if not yet populated.
    pub fn location(&self) -> Option<&Location> {
        self.outcome.as_ref().map(|outcome| &outcome.location)
    }

    /// Returns the terminal status, or `None` if not yet populated.
    pub fn status(&self) -> Option<Status> {
        self.outcome.as_ref().map(|outcome| outcome.status)
    }

    /// Returns the time between creation and population, or `None` if not yet populated.
    pub fn duration(&self) -> Option<Duration> {
        self.outcome.as_ref().map(|outcome| outcome.duration)
    }

    /// Attaches an image to this scenario, replacing any previous one.
    pub fn attach_image(&mut self, image: ScenarioImage) {
        self.image = Some(image);
    }

    /// Returns the attached image, if any.
    pub fn image(&self) -> Option<&ScenarioImage> {
        self.image.as_ref()
    }

    /// Returns true if an image has been attached.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

impl Default for ScenarioRecord {
    fn default() -> Self {
        Self::new()
    }
}
