// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{FeatureRecord, ScenarioRecord, StepRecord};
use crate::{
    config::ReportConfig,
    errors::{ReportOperation, SequencingError},
    events::{FeatureEvent, ReportEvent, ScenarioEvent, StepEvent},
    helpers::{ImageNaming, OutputNaming},
    summary::ReportSummary,
};
use tracing::{debug, warn};

/// The report for a single test run: an ordered list of features that lifecycle events are folded
/// into.
///
/// The current feature is always the last feature, and the current scenario is always the last
/// scenario of the current feature. Neither is stored separately.
///
/// A `ReportTree` is not synchronized. Concurrent runs must each use their own tree.
#[derive(Clone, Debug)]
pub struct ReportTree {
    features: Vec<FeatureRecord>,
    processing_background: bool,
    naming: OutputNaming,
}

impl ReportTree {
    /// Creates an empty tree that names report files with the default [`OutputNaming`].
    pub fn new() -> Self {
        Self::with_naming(OutputNaming::default())
    }

    /// Creates an empty tree that names report files with `naming`.
    pub fn with_naming(naming: OutputNaming) -> Self {
        Self {
            features: Vec::new(),
            processing_background: false,
            naming,
        }
    }

    /// Creates an empty tree configured by `config`.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::with_naming(config.output_naming())
    }

    /// Returns the features in discovery order.
    pub fn features(&self) -> &[FeatureRecord] {
        &self.features
    }

    /// Consumes the tree, returning its features.
    pub fn into_features(self) -> Vec<FeatureRecord> {
        self.features
    }

    /// Returns the naming used when closing features.
    pub fn naming(&self) -> &OutputNaming {
        &self.naming
    }

    /// Returns the most recently added feature.
    pub fn current_feature(&self) -> Option<&FeatureRecord> {
        self.features.last()
    }

    /// Returns the most recently added feature, mutably.
    pub fn current_feature_mut(&mut self) -> Option<&mut FeatureRecord> {
        self.features.last_mut()
    }

    /// Returns the most recently added scenario of the current feature.
    pub fn current_scenario(&self) -> Option<&ScenarioRecord> {
        self.current_feature()?.current_scenario()
    }

    /// Returns the most recently added scenario of the current feature, mutably.
    pub fn current_scenario_mut(&mut self) -> Option<&mut ScenarioRecord> {
        self.current_feature_mut()?.current_scenario_mut()
    }

    /// Starts a new feature, which becomes the current feature.
    pub fn add_feature(
        &mut self,
        event: &FeatureEvent,
        parent_filename: impl Into<String>,
    ) -> &mut FeatureRecord {
        if self.processing_background {
            warn!(
                file = %event.file,
                "feature started while background capture is still active",
            );
        }
        let parent_filename = parent_filename.into();
        debug!(file = %event.file, %parent_filename, "added feature");
        let index = self.features.len();
        self.features.push(FeatureRecord::new(event, parent_filename));
        &mut self.features[index]
    }

    /// Routes subsequent steps to the current feature's background.
    pub fn begin_background(&mut self) {
        self.processing_background = true;
    }

    /// Routes subsequent steps to the current scenario.
    pub fn end_background(&mut self) {
        self.processing_background = false;
    }

    /// Returns true if steps are currently routed to the background.
    pub fn is_processing_background(&self) -> bool {
        self.processing_background
    }

    /// Starts a new scenario in the current feature, which becomes the current scenario.
    pub fn add_scenario(&mut self) -> Result<&mut ScenarioRecord, SequencingError> {
        let feature = self.require_feature(ReportOperation::AddScenario)?;
        Ok(feature.add_scenario(ScenarioRecord::new()))
    }

    /// Adds a finished step to the current feature's background if background capture is active,
    /// or to the current scenario otherwise.
    pub fn add_step(&mut self, event: StepEvent) -> Result<(), SequencingError> {
        let step = StepRecord::new(event);
        if self.processing_background {
            self.require_feature(ReportOperation::AddStep)?
                .add_background_step(step);
        } else {
            self.require_scenario(ReportOperation::AddStep)?
                .append_step(step);
        }
        Ok(())
    }

    /// Populates the current scenario from the engine's scenario event.
    pub fn close_scenario(&mut self, event: &ScenarioEvent) -> Result<(), SequencingError> {
        self.require_scenario(ReportOperation::CloseScenario)?
            .populate(event);
        Ok(())
    }

    /// Closes the current feature, naming its report file with this tree's naming.
    pub fn close_feature(&mut self, event: &FeatureEvent) -> Result<(), SequencingError> {
        let Self { features, naming, .. } = self;
        features
            .last_mut()
            .ok_or(SequencingError::NoCurrentFeature {
                operation: ReportOperation::CloseFeature,
            })?
            .close_with(event, naming);
        Ok(())
    }

    /// Folds a single event into the tree.
    pub fn apply(&mut self, event: ReportEvent) -> Result<(), SequencingError> {
        debug!(event = event.kind_str(), "applying event");
        match event {
            ReportEvent::FeatureStarted {
                feature,
                parent_filename,
            } => {
                self.add_feature(&feature, parent_filename);
            }
            ReportEvent::BackgroundStarted => self.begin_background(),
            ReportEvent::BackgroundFinished => self.end_background(),
            ReportEvent::ScenarioStarted => {
                self.add_scenario()?;
            }
            ReportEvent::StepFinished { step } => self.add_step(step)?,
            ReportEvent::ScenarioFinished { scenario } => self.close_scenario(&scenario)?,
            ReportEvent::FeatureFinished { feature } => self.close_feature(&feature)?,
        }
        Ok(())
    }

    /// Builds a serializable summary of this tree for the rendering layer, with status icons
    /// named by the default [`ImageNaming`].
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary::new(self, &ImageNaming::default())
    }

    fn require_feature(
        &mut self,
        operation: ReportOperation,
    ) -> Result<&mut FeatureRecord, SequencingError> {
        self.features
            .last_mut()
            .ok_or(SequencingError::NoCurrentFeature { operation })
    }

    fn require_scenario(
        &mut self,
        operation: ReportOperation,
    ) -> Result<&mut ScenarioRecord, SequencingError> {
        self.require_feature(operation)?
            .current_scenario_mut()
            .ok_or(SequencingError::NoCurrentScenario { operation })
    }
}

impl Default for ReportTree {
    fn default() -> Self {
        Self::new()
    }
}
