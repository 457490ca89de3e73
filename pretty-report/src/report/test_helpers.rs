// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event builders shared by the report tests.

use super::{Location, Status};
use crate::events::{BackgroundHeader, ExecutedStep, FeatureEvent, ScenarioEvent, StepEvent};
use std::time::Duration;

pub(crate) const FEATURE_FILE: &str = "features/login/signup.feature";

pub(crate) fn executed(name: &str, status: Status) -> ExecutedStep {
    ExecutedStep {
        name: name.to_owned(),
        location: Location::new(FEATURE_FILE, 4),
        keyword: "Given ".to_owned(),
        actual_keyword: None,
        status,
        duration: Duration::from_millis(10),
        table: None,
        multiline_arg: None,
        error: None,
    }
}

pub(crate) fn step(name: &str, status: Status, duration: Duration) -> StepEvent {
    let mut step = executed(name, status);
    step.duration = duration;
    StepEvent::Executed(step)
}

pub(crate) fn background_header(name: &str) -> StepEvent {
    StepEvent::BackgroundHeader(BackgroundHeader {
        name: name.to_owned(),
        location: Location::new(FEATURE_FILE, 2),
    })
}

pub(crate) fn scenario(name: &str, status: Status) -> ScenarioEvent {
    ScenarioEvent::Scenario {
        name: name.to_owned(),
        location: Location::new(FEATURE_FILE, 6),
        status,
    }
}

pub(crate) fn feature(title: &str) -> FeatureEvent {
    FeatureEvent {
        title: title.to_owned(),
        file: FEATURE_FILE.into(),
        description: Some("As a visitor\nI want an account".to_owned()),
    }
}
