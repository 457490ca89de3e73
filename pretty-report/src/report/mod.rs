// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The report model: features, scenarios and steps, and the tree events are folded into.

mod feature;
mod scenario;
mod status;
mod step;
#[cfg(test)]
pub(crate) mod test_helpers;
mod tree;

pub use feature::*;
pub use scenario::*;
pub use status::*;
pub use step::*;
pub use tree::*;
