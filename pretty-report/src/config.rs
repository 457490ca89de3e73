// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for report naming.
//!
//! The default config is embedded at build time. A user config file, if provided, is layered on
//! top of it.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    helpers::{ImageNaming, OutputNaming},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Trait for handling configuration warnings.
///
/// This allows warnings to be logged (the default behavior) or collected for testing purposes.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(&mut self, config_file: Option<&Utf8Path>, unknown: &BTreeSet<String>);
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the `tracing` crate.
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: Option<&Utf8Path>, unknown: &BTreeSet<String>) {
        let config_file = config_file.map_or("<default>", |file| file.as_str());
        warn!(
            "ignoring unknown configuration keys in config file {config_file}: {}",
            unknown.iter().join(", ")
        );
    }
}

/// Overall report configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportConfig {
    #[serde(skip)]
    config_file: Option<Utf8PathBuf>,
    output: OutputConfig,
    images: ImagesConfig,
}

/// The `[output]` section.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// The extension of source feature files, without the leading `.`.
    pub source_extension: String,
    /// The extension of generated report files, without the leading `.`.
    pub report_extension: String,
}

/// The `[images]` section.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImagesConfig {
    /// The directory status icons live in, relative to the report root.
    pub dir: String,
    /// The extension of status icons, without the leading `.`.
    pub extension: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigDeserialize {
    output: OutputConfig,
    images: ImagesConfig,
}

impl ReportConfig {
    /// The default configuration, embedded at build time.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the configuration, layering `config_file` (if any) over the default config.
    ///
    /// Unknown keys are logged as warnings. A config file that is specified but does not exist is
    /// an error.
    pub fn from_sources(config_file: Option<&Utf8Path>) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(config_file, &mut DefaultConfigWarnings)
    }

    /// Reads the configuration with custom warning handling.
    pub fn from_sources_with_warnings(
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let mut builder = Self::make_default_config();
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::new(config_file.as_str(), FileFormat::Toml));
        }

        let config_file = config_file.map(Utf8Path::to_owned);
        let (deserialized, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file.clone(), kind))?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(config_file.as_deref(), &unknown);
        }

        let ReportConfigDeserialize { output, images } = deserialized;
        validate_extension("output.source-extension", &output.source_extension)
            .and_then(|()| validate_extension("output.report-extension", &output.report_extension))
            .and_then(|()| validate_extension("images.extension", &images.extension))
            .and_then(|()| validate_non_empty("images.dir", &images.dir))
            .map_err(|kind| ConfigParseError::new(config_file.clone(), kind))?;

        Ok(Self {
            config_file,
            output,
            images,
        })
    }

    /// Reads the embedded default config with no user config layered on top.
    pub fn default_config() -> Result<Self, ConfigParseError> {
        Self::from_sources(None)
    }

    /// Returns the user config file this configuration was read from, if any.
    pub fn config_file(&self) -> Option<&Utf8Path> {
        self.config_file.as_deref()
    }

    /// Returns the `[output]` section.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the `[images]` section.
    pub fn images(&self) -> &ImagesConfig {
        &self.images
    }

    /// Returns the naming for report files.
    pub fn output_naming(&self) -> OutputNaming {
        OutputNaming::new(&self.output.source_extension, &self.output.report_extension)
    }

    /// Returns the naming for status icons.
    pub fn image_naming(&self) -> ImageNaming {
        ImageNaming::new(&self.images.dir, &self.images.extension)
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// This returns a tuple of (config, ignored paths).
    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReportConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReportConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // Both serde_path_to_error and the config crate report the key. Drop the key from
                // the config error so it is only printed once.
                let path = error.path().clone();
                let config_error = error.into_inner();
                let error = match config_error {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

fn validate_extension(key: &'static str, extension: &str) -> Result<(), ConfigParseErrorKind> {
    validate_non_empty(key, extension)?;
    if extension.starts_with('.') {
        return Err(ConfigParseErrorKind::InvalidValue {
            key,
            reason: format!("`{extension}` must not start with `.`"),
        });
    }
    Ok(())
}

fn validate_non_empty(key: &'static str, value: &str) -> Result<(), ConfigParseErrorKind> {
    if value.is_empty() {
        return Err(ConfigParseErrorKind::InvalidValue {
            key,
            reason: "must not be empty".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;

    #[derive(Default)]
    struct CollectWarnings {
        unknown: Vec<String>,
    }

    impl ConfigWarnings for CollectWarnings {
        fn unknown_config_keys(
            &mut self,
            _config_file: Option<&Utf8Path>,
            unknown: &BTreeSet<String>,
        ) {
            self.unknown.extend(unknown.iter().cloned());
        }
    }

    fn write_config(dir: &Utf8TempDir, contents: &str) -> Utf8PathBuf {
        let path = dir.path().join("pretty-report.toml");
        std::fs::write(&path, contents).expect("wrote config file");
        path
    }

    #[test]
    fn default_config_matches_helpers() {
        let config = ReportConfig::default_config().expect("default config is valid");
        assert_eq!(config.config_file(), None);
        assert_eq!(config.output_naming(), OutputNaming::default());
        assert_eq!(config.image_naming(), ImageNaming::default());
    }

    #[test]
    fn user_config_overrides_defaults() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = write_config(
            &dir,
            indoc! {r#"
                [output]
                report-extension = "xhtml"

                [images]
                dir = "assets/icons"
            "#},
        );

        let mut warnings = CollectWarnings::default();
        let config =
            ReportConfig::from_sources_with_warnings(Some(path.as_path()), &mut warnings)
                .expect("config is valid");
        assert!(warnings.unknown.is_empty(), "{:?}", warnings.unknown);
        assert_eq!(config.config_file(), Some(path.as_path()));
        assert_eq!(config.output().source_extension, "feature");
        assert_eq!(
            config
                .output_naming()
                .report_file_for(Utf8Path::new("features/a/b.feature")),
            "a/b.xhtml"
        );
        assert_eq!(
            config.image_naming().image_path(Status::Passed, None),
            "assets/icons/passed.png"
        );
    }

    #[test]
    fn unknown_keys_are_reported() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = write_config(
            &dir,
            indoc! {r#"
                [output]
                report-extensions = "xhtml"

                [theme]
                name = "dark"
            "#},
        );

        let mut warnings = CollectWarnings::default();
        ReportConfig::from_sources_with_warnings(Some(path.as_path()), &mut warnings)
            .expect("unknown keys are not errors");
        assert_eq!(warnings.unknown, ["output.report-extensions", "theme"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = write_config(
            &dir,
            indoc! {r#"
                [output]
                report-extension = ".html"
            "#},
        );

        let error = ReportConfig::from_sources(Some(path.as_path())).unwrap_err();
        assert_eq!(error.config_file(), Some(&path));
        assert!(
            matches!(
                error.kind(),
                ConfigParseErrorKind::InvalidValue {
                    key: "output.report-extension",
                    ..
                }
            ),
            "unexpected error kind: {:?}",
            error.kind()
        );
    }

    #[test]
    fn wrong_type_reports_key_path() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = write_config(
            &dir,
            indoc! {r#"
                [images]
                dir = 42
                extension = ["png"]
            "#},
        );

        let error = ReportConfig::from_sources(Some(path.as_path())).unwrap_err();
        let ConfigParseErrorKind::DeserializeError(error) = error.kind() else {
            panic!("expected a deserialize error, found {:?}", error.kind());
        };
        assert_eq!(error.path().to_string(), "images.extension");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("does-not-exist.toml");

        let error = ReportConfig::from_sources(Some(path.as_path())).unwrap_err();
        assert!(
            matches!(error.kind(), ConfigParseErrorKind::BuildError(_)),
            "unexpected error kind: {:?}",
            error.kind()
        );
    }
}
