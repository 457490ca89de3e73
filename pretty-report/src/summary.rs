// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A serializable view of a [`ReportTree`], with every derived statistic computed up front.
//!
//! Statistics over empty collections are omitted rather than reported as errors, so a summary can
//! always be built from any tree.

use crate::{
    events::{StepFailure, Table},
    helpers::ImageNaming,
    report::{
        FeatureRecord, Location, ReportTree, ScenarioImage, ScenarioRecord, Status, StepRecord,
    },
};
use camino::Utf8Path;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;

/// The summary of an entire report.
#[derive(Clone, Debug, Serialize)]
pub struct ReportSummary<'a> {
    /// The features, in discovery order.
    pub features: Vec<FeatureSummary<'a>>,
}

impl<'a> ReportSummary<'a> {
    /// Builds a summary of `tree`, naming status icons with `images`.
    pub fn new(tree: &'a ReportTree, images: &ImageNaming) -> Self {
        Self {
            features: tree
                .features()
                .iter()
                .map(|feature| FeatureSummary::new(feature, images))
                .collect(),
        }
    }
}

/// The summary of a single feature.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureSummary<'a> {
    /// The title, or `None` if the feature never finished.
    pub title: Option<&'a str>,
    /// The report file, or `None` if the feature never finished.
    pub file: Option<&'a Utf8Path>,
    /// The description, if present and non-empty.
    pub description: Option<&'a str>,
    /// The physical file that produced this feature.
    pub parent_filename: &'a str,
    /// When the feature started.
    pub start_time: DateTime<Local>,
    /// How long the feature took, in seconds.
    pub duration: Option<f64>,
    /// The background, if one was captured.
    pub background: Option<BackgroundSummary<'a>>,
    /// The number of scenarios.
    pub scenario_count: usize,
    /// The number of scenario steps.
    pub step_count: usize,
    /// Scenario counts per status. Empty if there are no scenarios.
    pub scenario_summaries: BTreeMap<Status, String>,
    /// Step counts per status. Empty if there are no scenario steps.
    pub step_summaries: BTreeMap<Status, String>,
    /// The formatted mean scenario duration.
    pub scenario_average_duration: Option<String>,
    /// The formatted mean step duration.
    pub step_average_duration: Option<String>,
    /// The scenarios, in execution order.
    pub scenarios: Vec<ScenarioSummary<'a>>,
}

impl<'a> FeatureSummary<'a> {
    fn new(feature: &'a FeatureRecord, images: &ImageNaming) -> Self {
        // Icon paths are relative to the generated report.
        let source = feature.file().map(Utf8Path::as_str);
        let background = feature.has_background().then(|| BackgroundSummary {
            title: feature.background_title().map(|title| title.name.as_str()),
            steps: feature
                .background_steps()
                .map(|step| StepSummary::new(step, images, source))
                .collect(),
        });

        Self {
            title: feature.title(),
            file: feature.file(),
            description: feature.description().filter(|_| feature.has_description()),
            parent_filename: feature.parent_filename(),
            start_time: feature.start_time(),
            duration: feature.duration().map(|duration| duration.as_secs_f64()),
            background,
            scenario_count: feature.scenarios().len(),
            step_count: feature.steps().count(),
            scenario_summaries: per_status(|status| feature.scenario_summary_for(status).ok()),
            step_summaries: per_status(|status| feature.step_summary_for(status).ok()),
            scenario_average_duration: feature.scenario_average_duration().ok(),
            step_average_duration: feature.step_average_duration().ok(),
            scenarios: feature
                .scenarios()
                .iter()
                .map(|scenario| ScenarioSummary::new(scenario, images, source))
                .collect(),
        }
    }
}

fn per_status(mut summary_for: impl FnMut(Status) -> Option<String>) -> BTreeMap<Status, String> {
    Status::ALL
        .into_iter()
        .filter_map(|status| Some((status, summary_for(status)?)))
        .collect()
}

/// The summary of a feature's background.
#[derive(Clone, Debug, Serialize)]
pub struct BackgroundSummary<'a> {
    /// The background heading, if one was captured.
    pub title: Option<&'a str>,
    /// The background steps, excluding the heading.
    pub steps: Vec<StepSummary<'a>>,
}

/// The summary of a single scenario.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioSummary<'a> {
    /// The name, or `None` if the scenario never finished.
    pub name: Option<&'a str>,
    /// The location, or `None` if the scenario never finished.
    pub location: Option<&'a Location>,
    /// The terminal status, or `None` if the scenario never finished.
    pub status: Option<Status>,
    /// The path to the status icon, relative to the feature's report.
    pub status_icon: Option<String>,
    /// When the scenario started.
    pub start_time: DateTime<Local>,
    /// How long the scenario took, in seconds.
    pub duration: Option<f64>,
    /// An attached image.
    pub image: Option<&'a ScenarioImage>,
    /// The steps, in execution order.
    pub steps: Vec<StepSummary<'a>>,
}

impl<'a> ScenarioSummary<'a> {
    fn new(scenario: &'a ScenarioRecord, images: &ImageNaming, source: Option<&str>) -> Self {
        Self {
            name: scenario.name(),
            location: scenario.location(),
            status: scenario.status(),
            status_icon: scenario
                .status()
                .map(|status| images.image_path(status, source)),
            start_time: scenario.start_time(),
            duration: scenario.duration().map(|duration| duration.as_secs_f64()),
            image: scenario.image(),
            steps: scenario
                .steps()
                .iter()
                .map(|step| StepSummary::new(step, images, source))
                .collect(),
        }
    }
}

/// The summary of a single step.
#[derive(Clone, Debug, Serialize)]
pub struct StepSummary<'a> {
    /// The keyword the step was written with.
    pub keyword: Option<&'a str>,
    /// The step text.
    pub name: &'a str,
    /// Where the step is defined.
    pub location: &'a Location,
    /// The terminal status.
    pub status: Option<Status>,
    /// The path to the status icon, relative to the feature's report.
    pub status_icon: Option<String>,
    /// How long the step took, in seconds.
    pub duration: Option<f64>,
    /// An attached data table.
    pub table: Option<&'a Table>,
    /// An attached doc string. Omitted if a data table is attached.
    pub multiline_arg: Option<&'a str>,
    /// The failure, for failed steps only.
    pub error: Option<&'a StepFailure>,
}

impl<'a> StepSummary<'a> {
    fn new(step: &'a StepRecord, images: &ImageNaming, source: Option<&str>) -> Self {
        Self {
            keyword: step.keyword.as_deref(),
            name: &step.name,
            location: &step.location,
            status: step.status,
            status_icon: step.status.map(|status| images.image_path(status, source)),
            duration: step.duration.map(|duration| duration.as_secs_f64()),
            table: step.table.as_ref(),
            multiline_arg: step
                .multiline_arg
                .as_deref()
                .filter(|_| step.has_multiline_arg()),
            error: step.error.as_ref().filter(|_| step.failed_with_error()),
        }
    }
}
