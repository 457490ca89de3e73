// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatting helpers used by the report model and the rendering layer.
//!
//! Everything here is a pure string computation with no filesystem access.

use crate::{errors::EmptyCollectionError, report::Status};
use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;
use swrite::{SWrite, swrite};

/// The default directory status icons live in, relative to the report root.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// The default extension of status icons.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// The default extension of source feature files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "feature";

/// The default extension of generated report files.
pub const DEFAULT_REPORT_EXTENSION: &str = "html";

/// Formats `count` as a share of `total`, for example `"3 (75.0%)"`.
///
/// The percentage is rendered with exactly one decimal place. Returns an error if `total` is zero.
pub fn summary_percent(
    count: usize,
    total: usize,
    collection: &'static str,
) -> Result<String, EmptyCollectionError> {
    if total == 0 {
        return Err(EmptyCollectionError::new("a summary", collection));
    }
    let percent = (count as f64 / total as f64) * 100.0;
    Ok(format!("{count} ({percent:.1}%)"))
}

/// Formats a duration as whole minutes and seconds to three decimal places, for example
/// `"2m5.457s"`.
///
/// Minutes are computed by floor division, so the seconds component is in `[0, 60)` before
/// rounding. Rounding is not carried into the minutes: 59.9999 seconds renders as `"0m60.000s"`.
pub fn formatted_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let remainder = duration - Duration::from_secs(minutes * 60);
    format!("{minutes}m{:.3}s", remainder.as_secs_f64())
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Returns the arithmetic mean of `durations`, or an error if there are none.
///
/// The sum is kept in nanoseconds as a `u128`, which cannot overflow for any realistic number of
/// durations, even when each one is close to [`Duration::MAX`].
pub(crate) fn average_duration(
    durations: impl IntoIterator<Item = Duration>,
    collection: &'static str,
) -> Result<Duration, EmptyCollectionError> {
    let (sum_nanos, count) = durations
        .into_iter()
        .fold((0u128, 0u128), |(sum, count), duration| {
            (sum + duration.as_nanos(), count + 1)
        });
    if count == 0 {
        return Err(EmptyCollectionError::new("an average duration", collection));
    }
    // The mean is never larger than the largest input, so both parts fit.
    let mean = sum_nanos / count;
    Ok(Duration::new(
        (mean / NANOS_PER_SEC) as u64,
        (mean % NANOS_PER_SEC) as u32,
    ))
}

/// Returns the relative prefix that leads from a report generated for `source` back to the report
/// root: one `../` per path separator in `source`.
pub fn directory_prefix_for(source: Option<&str>) -> String {
    let depth = source.map_or(0, |source| source.matches('/').count());
    "../".repeat(depth)
}

/// Builds paths to status icons.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageNaming {
    dir: String,
    extension: String,
}

impl ImageNaming {
    /// Creates a new `ImageNaming` with the given directory and extension (without the leading
    /// `.`).
    pub fn new(dir: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Returns the images directory.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Returns the image extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the relative path to the icon for `status`, as seen from the report generated for
    /// `source`.
    pub fn image_path(&self, status: Status, source: Option<&str>) -> String {
        let mut path = directory_prefix_for(source);
        swrite!(path, "{}/{}.{}", self.dir, status, self.extension);
        path
    }

    /// Returns an HTML `<img>` tag for the icon for `status`.
    pub fn image_tag_for(&self, status: Status, source: Option<&str>) -> String {
        format!(
            "<img src=\"{}\" alt=\"{status}\" title=\"{status}\" width=\"30\">",
            self.image_path(status, source),
        )
    }
}

impl Default for ImageNaming {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGES_DIR, DEFAULT_IMAGE_EXTENSION)
    }
}

/// Maps source feature files to the report files generated for them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputNaming {
    source_extension: String,
    report_extension: String,
}

impl OutputNaming {
    /// Creates a new `OutputNaming`. Extensions are given without the leading `.`.
    pub fn new(source_extension: impl Into<String>, report_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
            report_extension: report_extension.into(),
        }
    }

    /// Returns the source extension.
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Returns the report extension.
    pub fn report_extension(&self) -> &str {
        &self.report_extension
    }

    /// Returns the report file for `source`: the source extension is rewritten to the report
    /// extension, then the first path segment is dropped.
    ///
    /// For example, `features/login/signup.feature` maps to `login/signup.html`. A source with a
    /// different extension keeps it, and a source with no directory keeps its only segment.
    pub fn report_file_for(&self, source: &Utf8Path) -> Utf8PathBuf {
        let renamed = if source.extension() == Some(self.source_extension.as_str()) {
            source.with_extension(&self.report_extension)
        } else {
            source.to_owned()
        };
        match renamed.as_str().split_once('/') {
            Some((_, rest)) => Utf8PathBuf::from(rest),
            None => renamed,
        }
    }
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSION, DEFAULT_REPORT_EXTENSION)
    }
}

/// Returns the relative path to the icon for `status` using the default image naming.
pub fn image_path(status: Status, source: Option<&str>) -> String {
    ImageNaming::default().image_path(status, source)
}

/// Returns an HTML `<img>` tag for the icon for `status` using the default image naming.
pub fn image_tag_for(status: Status, source: Option<&str>) -> String {
    ImageNaming::default().image_tag_for(status, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use test_strategy::proptest;

    #[test_case(3, 4, "3 (75.0%)"; "three quarters")]
    #[test_case(1, 4, "1 (25.0%)"; "one quarter")]
    #[test_case(0, 5, "0 (0.0%)"; "none")]
    #[test_case(7, 7, "7 (100.0%)"; "all")]
    #[test_case(1, 3, "1 (33.3%)"; "one third")]
    #[test_case(2, 3, "2 (66.7%)"; "two thirds")]
    fn summary_percent_cases(count: usize, total: usize, expected: &str) {
        assert_eq!(
            summary_percent(count, total, "scenarios").expect("total is non-zero"),
            expected
        );
    }

    #[test]
    fn summary_percent_empty() {
        let error = summary_percent(0, 0, "steps").expect_err("total is zero");
        assert_eq!(error.collection(), "steps");
        assert_eq!(
            error.to_string(),
            "cannot compute a summary over an empty collection of steps"
        );
    }

    #[proptest]
    fn summary_percent_shape(
        #[strategy(0usize..10_000)] count: usize,
        #[strategy(1usize..10_000)] total: usize,
    ) {
        let summary = summary_percent(count, total, "steps").expect("total is non-zero");
        let (count_str, rest) = summary
            .split_once(" (")
            .expect("summary has a count and a percentage");
        assert_eq!(count_str, count.to_string());

        let percent = rest.strip_suffix("%)").expect("summary ends with %)");
        let (_, decimals) = percent.split_once('.').expect("percentage has a decimal point");
        assert_eq!(decimals.len(), 1);

        let expected = (count as f64 / total as f64) * 100.0;
        let actual: f64 = percent.parse().expect("percentage parses");
        assert!((actual - expected).abs() <= 0.05 + f64::EPSILON * expected);
    }

    #[test_case(Duration::from_secs_f64(125.4567), "2m5.457s"; "minutes and seconds")]
    #[test_case(Duration::ZERO, "0m0.000s"; "zero")]
    #[test_case(Duration::from_secs(60), "1m0.000s"; "exactly one minute")]
    #[test_case(Duration::from_millis(1500), "0m1.500s"; "sub minute")]
    #[test_case(Duration::from_secs(3725), "62m5.000s"; "minutes are not split into hours")]
    fn formatted_duration_cases(duration: Duration, expected: &str) {
        assert_eq!(formatted_duration(duration), expected);
    }

    #[test]
    fn formatted_duration_rounding_boundary() {
        // The remainder rounds up to 60 without carrying into the minutes.
        assert_eq!(
            formatted_duration(Duration::from_secs_f64(59.9999)),
            "0m60.000s"
        );
        assert_eq!(
            formatted_duration(Duration::from_secs_f64(119.9996)),
            "1m60.000s"
        );
    }

    #[test]
    fn average_duration_mean() {
        let average = average_duration(
            [
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(6),
            ],
            "steps",
        )
        .expect("durations are non-empty");
        assert_eq!(average, Duration::from_secs(3));

        let error = average_duration(Vec::new(), "scenarios").expect_err("no durations");
        assert_eq!(error.statistic(), "an average duration");
    }

    #[test]
    fn average_duration_near_max() {
        let average = average_duration([Duration::MAX, Duration::MAX], "steps")
            .expect("durations are non-empty");
        assert_eq!(average, Duration::MAX);

        let huge = Duration::from_secs_f64(1e19);
        let average = average_duration([huge, huge, Duration::ZERO, Duration::ZERO], "steps")
            .expect("durations are non-empty");
        assert_eq!(average, huge / 2);
    }

    #[test_case(None, ""; "no source")]
    #[test_case(Some("signup.feature"), ""; "top level")]
    #[test_case(Some("features/signup.feature"), "../"; "one level")]
    #[test_case(Some("a/b/c.feature"), "../../"; "two levels")]
    fn directory_prefix_cases(source: Option<&str>, expected: &str) {
        assert_eq!(directory_prefix_for(source), expected);
    }

    #[test]
    fn image_paths() {
        assert_eq!(
            image_path(Status::Failed, Some("a/b/c.feature")),
            "../../images/failed.png"
        );
        assert_eq!(image_path(Status::Failed, None), "images/failed.png");

        let naming = ImageNaming::new("assets/icons", "svg");
        assert_eq!(
            naming.image_path(Status::Pending, Some("features/x.feature")),
            "../assets/icons/pending.svg"
        );
    }

    #[test_case("features/login/signup.feature", "login/signup.html"; "nested")]
    #[test_case("features/signup.feature", "signup.html"; "one directory")]
    #[test_case("signup.feature", "signup.html"; "no directory")]
    #[test_case("features/a/b/c.feature", "a/b/c.html"; "deeply nested")]
    #[test_case("features/notes.txt", "notes.txt"; "other extension")]
    #[test_case("/abs/signup.feature", "abs/signup.html"; "absolute")]
    fn report_file_cases(source: &str, expected: &str) {
        assert_eq!(
            OutputNaming::default().report_file_for(Utf8Path::new(source)),
            expected
        );
    }

    #[test]
    fn report_file_custom_extensions() {
        let naming = OutputNaming::new("story", "xhtml");
        assert_eq!(
            naming.report_file_for(Utf8Path::new("stories/checkout/pay.story")),
            "checkout/pay.xhtml"
        );
        assert_eq!(
            naming.report_file_for(Utf8Path::new("features/pay.feature")),
            "pay.feature"
        );
    }

    #[test]
    fn image_tag() {
        assert_eq!(
            image_tag_for(Status::Passed, Some("features/login.feature")),
            "<img src=\"../images/passed.png\" alt=\"passed\" title=\"passed\" width=\"30\">"
        );
    }
}
