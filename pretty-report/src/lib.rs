// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Incremental report construction for feature/scenario/step test runs.
//!
//! A test-execution engine emits lifecycle events in strict nesting order:
//!
//! ```text
//! feature-started
//!   [background-started step-finished* background-finished]
//!   (scenario-started step-finished* scenario-finished)*
//! feature-finished
//! ```
//!
//! A [`ReportTree`](report::ReportTree) is folded over this stream one event at a time. Once the
//! stream ends, the tree (or its serializable [`ReportSummary`](summary::ReportSummary)) is handed
//! to a rendering layer.

pub mod config;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod report;
pub mod summary;
mod time;
