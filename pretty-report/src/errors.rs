// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by pretty-report.

use crate::report::Status;
use camino::Utf8PathBuf;
use config::ConfigError;
use std::{fmt, io};
use thiserror::Error;

/// An event arrived when the record it needs to attach to did not exist.
///
/// This indicates that the driving engine produced events out of order.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SequencingError {
    /// An operation required a current feature, but no feature has been added yet.
    #[error("{operation} requires a current feature, but no feature has been started")]
    NoCurrentFeature {
        /// The operation that was attempted.
        operation: ReportOperation,
    },

    /// An operation required a current scenario, but the current feature has no scenarios.
    #[error("{operation} requires a current scenario, but no scenario has been started")]
    NoCurrentScenario {
        /// The operation that was attempted.
        operation: ReportOperation,
    },
}

impl SequencingError {
    /// Returns the operation that was attempted.
    pub fn operation(&self) -> ReportOperation {
        match self {
            Self::NoCurrentFeature { operation } | Self::NoCurrentScenario { operation } => {
                *operation
            }
        }
    }
}

/// An operation on a [`ReportTree`](crate::report::ReportTree) that has sequencing preconditions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReportOperation {
    /// Adding a scenario.
    AddScenario,
    /// Adding a step.
    AddStep,
    /// Closing the current scenario.
    CloseScenario,
    /// Closing the current feature.
    CloseFeature,
}

impl fmt::Display for ReportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AddScenario => "adding a scenario",
            Self::AddStep => "adding a step",
            Self::CloseScenario => "closing a scenario",
            Self::CloseFeature => "closing a feature",
        };
        f.write_str(s)
    }
}

/// A statistic was requested over a collection with no elements.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("cannot compute {statistic} over an empty collection of {collection}")]
pub struct EmptyCollectionError {
    statistic: &'static str,
    collection: &'static str,
}

impl EmptyCollectionError {
    pub(crate) fn new(statistic: &'static str, collection: &'static str) -> Self {
        Self {
            statistic,
            collection,
        }
    }

    /// Returns the name of the statistic that was requested.
    pub fn statistic(&self) -> &'static str {
        self.statistic
    }

    /// Returns the name of the empty collection.
    pub fn collection(&self) -> &'static str {
        self.collection
    }
}

/// Error returned while parsing a [`Status`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for status: {input}\n(known values: {})",
    Status::variants().join(", "),
)]
pub struct StatusParseError {
    input: String,
}

impl StatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Error returned while parsing a [`Location`](crate::report::Location) from `file:line` text.
#[derive(Clone, Debug, Error)]
#[error("invalid location `{input}`: {reason}")]
pub struct LocationParseError {
    input: String,
    reason: &'static str,
}

impl LocationParseError {
    pub(crate) fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

/// An error that occurred while parsing the report config.
#[derive(Debug, Error)]
#[error(
    "failed to parse report config at `{}`",
    .config_file.as_deref().map_or("<default>", |f| f.as_str()),
)]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Option<Utf8PathBuf>,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: Option<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self { config_file, kind }
    }

    /// Returns the config file that failed to parse, if one was specified.
    pub fn config_file(&self) -> Option<&Utf8PathBuf> {
        self.config_file.as_ref()
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing the report config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the layered config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),

    /// A config value was rejected after deserialization.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        /// The key that held the invalid value.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// An error that occurred while reading and folding a recorded event stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EventReadError {
    /// Reading from the underlying stream failed.
    #[error("error reading event stream")]
    Read {
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// A line could not be parsed as an event.
    #[error("error parsing event on line {line_number}")]
    Parse {
        /// The 1-based line number.
        line_number: usize,
        /// The underlying parse error.
        #[source]
        error: serde_json::Error,
    },

    /// An event was out of sequence for the report being built.
    #[error("event on line {line_number} is out of sequence")]
    Sequencing {
        /// The 1-based line number.
        line_number: usize,
        /// The sequencing error.
        #[source]
        error: SequencingError,
    },
}
