// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{LocationParseError, StatusParseError};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The terminal outcome of a step or scenario.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The step or scenario passed.
    Passed,
    /// The step or scenario failed.
    Failed,
    /// The step was skipped, usually because an earlier step failed.
    Skipped,
    /// No step definition matched.
    Undefined,
    /// The step definition is marked as pending.
    Pending,
}

impl Status {
    /// All statuses, in display order.
    pub const ALL: [Status; 5] = [
        Status::Passed,
        Status::Failed,
        Status::Skipped,
        Status::Undefined,
        Status::Pending,
    ];

    /// Returns string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["passed", "failed", "skipped", "undefined", "pending"]
    }

    /// Returns the string representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Undefined => "undefined",
            Status::Pending => "pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError::new(s))
    }
}

/// A `file:line` reference into a feature file.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Location {
    /// The feature file.
    pub file: Utf8PathBuf,
    /// The 1-based line number.
    pub line: u32,
}

impl Location {
    /// Creates a new `Location`.
    pub fn new(file: impl Into<Utf8PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl FromStr for Location {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (file, line) = s
            .rsplit_once(':')
            .ok_or_else(|| LocationParseError::new(s, "expected `file:line`"))?;
        if file.is_empty() {
            return Err(LocationParseError::new(s, "file is empty"));
        }
        let line = line
            .parse()
            .map_err(|_| LocationParseError::new(s, "line is not a valid number"))?;
        Ok(Self::new(file, line))
    }
}
