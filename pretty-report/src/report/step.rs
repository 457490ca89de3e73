// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Location, Status};
use crate::events::{StepEvent, StepFailure, Table};
use std::time::Duration;

/// A single finished step, or the heading of a background block.
///
/// Background headings have no keyword, status or duration.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    /// The step text, without the keyword.
    pub name: String,

    /// The keyword, or `None` for a background heading.
    pub keyword: Option<String>,

    /// Where the step is defined.
    pub location: Location,

    /// The terminal status, or `None` for a background heading.
    pub status: Option<Status>,

    /// How long the step took, or `None` for a background heading.
    pub duration: Option<Duration>,

    /// A data table attached to the step.
    pub table: Option<Table>,

    /// A doc string attached to the step.
    pub multiline_arg: Option<String>,

    /// The failure raised by the step. Only meaningful if the status is [`Status::Failed`].
    pub error: Option<StepFailure>,
}

impl StepRecord {
    /// Creates a new record from a finished step event.
    pub fn new(event: StepEvent) -> Self {
        match event {
            StepEvent::Executed(step) => {
                let keyword = step.actual_keyword.unwrap_or(step.keyword);
                Self {
                    name: step.name,
                    keyword: Some(keyword),
                    location: step.location,
                    status: Some(step.status),
                    duration: Some(step.duration),
                    table: step.table,
                    multiline_arg: step.multiline_arg,
                    error: step.error,
                }
            }
            StepEvent::BackgroundHeader(header) => Self {
                name: header.name,
                keyword: None,
                location: header.location,
                status: None,
                duration: None,
                table: None,
                multiline_arg: None,
                error: None,
            },
        }
    }

    /// Returns true if this is the heading of a background block.
    pub fn is_background_header(&self) -> bool {
        self.keyword.is_none()
    }

    /// Returns true if this step failed and the failure was captured.
    pub fn failed_with_error(&self) -> bool {
        self.status == Some(Status::Failed) && self.error.is_some()
    }

    /// Returns true if a data table is attached.
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Returns true if a doc string is attached and no data table is.
    pub fn has_multiline_arg(&self) -> bool {
        self.multiline_arg.is_some() && !self.has_table()
    }
}
