// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events produced by a test-execution engine.
//!
//! An engine running in-process constructs these values directly and hands them to a
//! [`ReportTree`]. A recorded run can also be stored as JSON lines, one [`ReportEvent`] per line,
//! and replayed with an [`EventReader`].

use crate::{
    errors::EventReadError,
    report::{Location, ReportTree, Status},
};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::{io, time::Duration};
use tracing::debug;

/// A feature as seen by the execution engine.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct FeatureEvent {
    /// The title of the feature.
    pub title: String,

    /// The path to the source feature file, for example `features/login/signup.feature`.
    pub file: Utf8PathBuf,

    /// Free-form description text following the feature title.
    #[serde(default)]
    pub description: Option<String>,
}

/// A scenario as seen by the execution engine when it finishes.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScenarioEvent {
    /// A plain scenario.
    Scenario {
        /// The scenario name.
        name: String,
        /// Where the scenario is defined.
        location: Location,
        /// The terminal status of the scenario.
        status: Status,
    },

    /// One row of a scenario outline's examples table.
    ExampleRow {
        /// The name of the scenario outline that owns this row.
        outline_name: String,
        /// Where the row is defined.
        backtrace_line: Location,
        /// The terminal status of this row.
        status: Status,
    },
}

impl ScenarioEvent {
    /// Returns the name a report should show for this scenario.
    pub fn name(&self) -> &str {
        match self {
            ScenarioEvent::Scenario { name, .. } => name,
            ScenarioEvent::ExampleRow { outline_name, .. } => outline_name,
        }
    }

    /// Returns the location a report should link to for this scenario.
    pub fn location(&self) -> &Location {
        match self {
            ScenarioEvent::Scenario { location, .. } => location,
            ScenarioEvent::ExampleRow { backtrace_line, .. } => backtrace_line,
        }
    }

    /// Returns the terminal status of this scenario.
    pub fn status(&self) -> Status {
        match self {
            ScenarioEvent::Scenario { status, .. } | ScenarioEvent::ExampleRow { status, .. } => {
                *status
            }
        }
    }
}

/// A finished step as seen by the execution engine.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepEvent {
    /// A step that was executed (or skipped) by the engine.
    Executed(ExecutedStep),

    /// The heading of a background block. It is not executable and carries no keyword, status or
    /// duration.
    BackgroundHeader(BackgroundHeader),
}

/// A step that was executed by the engine.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExecutedStep {
    /// The step text, without the keyword.
    pub name: String,

    /// Where the step is defined.
    pub location: Location,

    /// The keyword the step was written with, for example `"Given "`.
    pub keyword: String,

    /// The keyword the engine actually matched, if it differs from the planned one. For example, a
    /// step written with `And` following a `Given` may report `Given` here.
    #[serde(default)]
    pub actual_keyword: Option<String>,

    /// The terminal status of the step.
    pub status: Status,

    /// How long the step took.
    #[serde(with = "duration_secs")]
    pub duration: Duration,

    /// A data table attached to the step.
    #[serde(default)]
    pub table: Option<Table>,

    /// A doc string attached to the step.
    #[serde(default)]
    pub multiline_arg: Option<String>,

    /// The failure raised by the step, if any.
    #[serde(default)]
    pub error: Option<StepFailure>,
}

impl ExecutedStep {
    /// Returns the actual keyword if the engine reported one, otherwise the planned keyword.
    pub fn effective_keyword(&self) -> &str {
        self.actual_keyword.as_deref().unwrap_or(&self.keyword)
    }
}

/// The heading of a background block.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct BackgroundHeader {
    /// The background name.
    pub name: String,

    /// Where the background is defined.
    pub location: Location,
}

/// A data table attached to a step.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Table {
    /// The rows of the table, including the header row.
    pub rows: Vec<Vec<String>>,
}

/// A failure raised while executing a step.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct StepFailure {
    /// The failure message.
    pub message: String,

    /// The backtrace, one frame per entry.
    #[serde(default)]
    pub backtrace: Vec<String>,
}

/// A single lifecycle event in a recorded event stream.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReportEvent {
    /// A feature began.
    FeatureStarted {
        /// The feature.
        feature: FeatureEvent,
        /// The physical file that produced this feature.
        parent_filename: String,
    },

    /// The steps that follow belong to the current feature's background.
    BackgroundStarted,

    /// Background steps are over.
    BackgroundFinished,

    /// A scenario began.
    ScenarioStarted,

    /// A step finished.
    StepFinished {
        /// The step.
        step: StepEvent,
    },

    /// The current scenario finished.
    ScenarioFinished {
        /// The scenario.
        scenario: ScenarioEvent,
    },

    /// The current feature finished.
    FeatureFinished {
        /// The feature.
        feature: FeatureEvent,
    },
}

impl ReportEvent {
    /// Returns the kebab-case name of this event, as it appears in the `type` field.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ReportEvent::FeatureStarted { .. } => "feature-started",
            ReportEvent::BackgroundStarted => "background-started",
            ReportEvent::BackgroundFinished => "background-finished",
            ReportEvent::ScenarioStarted => "scenario-started",
            ReportEvent::StepFinished { .. } => "step-finished",
            ReportEvent::ScenarioFinished { .. } => "scenario-finished",
            ReportEvent::FeatureFinished { .. } => "feature-finished",
        }
    }
}

/// Reads a JSON-lines event stream, one [`ReportEvent`] per line.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
#[derive(Debug)]
pub struct EventReader<R> {
    lines: io::Lines<R>,
    line_number: usize,
}

impl<R: io::BufRead> EventReader<R> {
    /// Creates a new reader over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Folds every remaining event into `tree`, stopping at the first error.
    ///
    /// Returns the number of events applied.
    pub fn fold_into(self, tree: &mut ReportTree) -> Result<usize, EventReadError> {
        let mut applied = 0;
        for next in self {
            let (line_number, event) = next?;
            tree.apply(event)
                .map_err(|error| EventReadError::Sequencing { line_number, error })?;
            applied += 1;
        }
        debug!(applied, "finished reading event stream");
        Ok(applied)
    }
}

impl<R: io::BufRead> Iterator for EventReader<R> {
    type Item = Result<(usize, ReportEvent), EventReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(error) => return Some(Err(EventReadError::Read { error })),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }

            let line_number = self.line_number;
            return Some(
                serde_json::from_str(&line)
                    .map(|event| (line_number, event))
                    .map_err(|error| EventReadError::Parse { line_number, error }),
            );
        }
    }
}

/// Serializes durations as floating-point seconds.
pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub(crate) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| D::Error::custom(format!("invalid duration: {secs} seconds")))
    }
}
