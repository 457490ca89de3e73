// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use pretty_report::errors::{ConfigParseError, ConfigParseErrorKind, EventReadError};
use std::error::Error;
use thiserror::Error;
use tracing::error;

/// Documented exit codes for `pretty-report` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReportExitCode {}

impl ReportExitCode {
    /// No errors occurred and the report was written.
    pub const OK: i32 = 0;

    /// The config file could not be read or was invalid.
    pub const CONFIG_PARSE_FAILED: i32 = 10;

    /// The event stream could not be read or was malformed.
    pub const EVENT_STREAM_FAILED: i32 = 20;

    /// The summary could not be written.
    pub const WRITE_OUTPUT_FAILED: i32 = 30;
}

// The #[error()] strings are placeholder messages. Errors are meant to be printed with
// display_to_stderr, which colorizes them.

/// An expected error that causes `pretty-report` to exit with a documented code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to open event stream")]
    EventStreamOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read event stream")]
    EventStreamReadError {
        path: Utf8PathBuf,
        #[source]
        err: EventReadError,
    },
    #[error("failed to write summary")]
    WriteOutputError {
        path: Option<Utf8PathBuf>,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to serialize summary")]
    SerializeSummaryError {
        #[source]
        err: serde_json::Error,
    },
}

impl ExpectedError {
    pub(crate) fn event_stream_open_error(path: Utf8PathBuf, err: std::io::Error) -> Self {
        Self::EventStreamOpenError { path, err }
    }

    pub(crate) fn event_stream_read_error(path: Utf8PathBuf, err: EventReadError) -> Self {
        Self::EventStreamReadError { path, err }
    }

    pub(crate) fn write_output_error(path: Option<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::WriteOutputError { path, err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. } => ReportExitCode::CONFIG_PARSE_FAILED,
            Self::EventStreamOpenError { .. } | Self::EventStreamReadError { .. } => {
                ReportExitCode::EVENT_STREAM_FAILED
            }
            Self::WriteOutputError { .. } | Self::SerializeSummaryError { .. } => {
                ReportExitCode::WRITE_OUTPUT_FAILED
            }
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::ConfigParseError { err } => {
                let config_file = err
                    .config_file()
                    .map_or("<default>".to_owned(), |file| file.to_string());
                match err.kind() {
                    ConfigParseErrorKind::BuildError(error) => {
                        error!(
                            "failed to parse config at `{}`",
                            config_file.style(styles.bold)
                        );
                        Some(error.as_ref() as &dyn Error)
                    }
                    ConfigParseErrorKind::DeserializeError(error) => {
                        error!(
                            "failed to parse config at `{}`: key `{}` is invalid",
                            config_file.style(styles.bold),
                            error.path().style(styles.bold),
                        );
                        Some(error.inner() as &dyn Error)
                    }
                    ConfigParseErrorKind::InvalidValue { key, reason } => {
                        error!(
                            "invalid value for `{}` in config at `{}`: {reason}",
                            key.style(styles.bold),
                            config_file.style(styles.bold),
                        );
                        None
                    }
                    _ => {
                        error!(
                            "failed to parse config at `{}`",
                            config_file.style(styles.bold)
                        );
                        Some(err as &dyn Error)
                    }
                }
            }
            Self::EventStreamOpenError { path, err } => {
                error!("failed to open event stream `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::EventStreamReadError { path, err } => {
                error!(
                    "failed to build report from event stream `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { path, err } => {
                match path {
                    Some(path) => {
                        error!("failed to write summary to `{}`", path.style(styles.bold));
                    }
                    None => error!("failed to write summary to stdout"),
                }
                Some(err as &dyn Error)
            }
            Self::SerializeSummaryError { err } => {
                error!("failed to serialize summary");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_report::{
        config::ReportConfig,
        errors::{ReportOperation, SequencingError},
    };

    #[test]
    fn exit_codes_by_failure_family() {
        let config_error = ReportConfig::from_sources(Some(Utf8Path::new("does-not-exist.toml")))
            .expect_err("missing config file is an error");
        assert_eq!(
            ExpectedError::from(config_error).process_exit_code(),
            ReportExitCode::CONFIG_PARSE_FAILED
        );

        let read_error = ExpectedError::event_stream_read_error(
            "events.jsonl".into(),
            EventReadError::Sequencing {
                line_number: 1,
                error: SequencingError::NoCurrentFeature {
                    operation: ReportOperation::AddStep,
                },
            },
        );
        assert_eq!(
            read_error.process_exit_code(),
            ReportExitCode::EVENT_STREAM_FAILED
        );

        let write_error = ExpectedError::write_output_error(
            None,
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        );
        assert_eq!(
            write_error.process_exit_code(),
            ReportExitCode::WRITE_OUTPUT_FAILED
        );
    }

    #[test]
    fn config_errors_display_every_kind() {
        let dir = camino_tempfile::Utf8TempDir::new().expect("created temp dir");
        let wrong_type = dir.path().join("wrong-type.toml");
        std::fs::write(&wrong_type, "[images]\nextension = [1]\n").expect("wrote config");
        let invalid_value = dir.path().join("invalid-value.toml");
        std::fs::write(&invalid_value, "[images]\nextension = \".png\"\n").expect("wrote config");

        let styles = StderrStyles::default();
        for path in [
            Utf8Path::new("does-not-exist.toml"),
            wrong_type.as_path(),
            invalid_value.as_path(),
        ] {
            let err = ReportConfig::from_sources(Some(path)).expect_err("config is invalid");
            ExpectedError::from(err).display_to_stderr(&styles);
        }
    }
}
