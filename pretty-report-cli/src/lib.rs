// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line frontend for `pretty-report`.
//!
//! `pretty-report build` folds a recorded event stream into a report and writes its summary as
//! JSON.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
