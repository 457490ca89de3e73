// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    output::{OutputContext, OutputOpts, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use pretty_report::{
    config::ReportConfig, events::EventReader, report::ReportTree, summary::ReportSummary,
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
};
use tracing::{debug, info};

/// Builds feature/scenario/step reports from recorded test events.
#[derive(Debug, Parser)]
#[command(version, name = "pretty-report", styles = clap_styles::style())]
pub struct PrettyReportApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl PrettyReportApp {
    /// Initializes the output context, including logging.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, writing to stdout if no output file was given.
    pub fn exec(self) -> Result<(), ExpectedError> {
        self.exec_with(&mut io::stdout().lock())
    }

    fn exec_with(self, stdout: &mut dyn Write) -> Result<(), ExpectedError> {
        match self.command {
            Command::Build(opts) => opts.exec(stdout),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fold a recorded event stream into a report and write its summary as JSON
    ///
    /// The event stream is a JSON-lines file with one lifecycle event per line.
    Build(BuildOpts),
}

#[derive(Debug, Args)]
struct BuildOpts {
    /// Recorded event stream to read
    #[arg(long, value_name = "FILE")]
    events: Utf8PathBuf,

    /// Config file layered over the defaults
    #[arg(long, value_name = "FILE", env = "PRETTY_REPORT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Write the summary to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<Utf8PathBuf>,
}

impl BuildOpts {
    fn exec(self, stdout: &mut dyn Write) -> Result<(), ExpectedError> {
        let config = ReportConfig::from_sources(self.config.as_deref())?;
        debug!(config_file = ?config.config_file(), "loaded config");

        let mut tree = ReportTree::from_config(&config);
        let file = File::open(&self.events)
            .map_err(|err| ExpectedError::event_stream_open_error(self.events.clone(), err))?;
        let applied = EventReader::new(BufReader::new(file))
            .fold_into(&mut tree)
            .map_err(|err| ExpectedError::event_stream_read_error(self.events.clone(), err))?;
        info!(
            "folded {applied} events into {} features",
            tree.features().len()
        );

        let summary = ReportSummary::new(&tree, &config.image_naming());
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .map_err(|err| ExpectedError::write_output_error(Some(path.clone()), err))?;
                write_summary(&summary, Some(path), BufWriter::new(file))?;
                info!("wrote summary to {path}");
            }
            None => write_summary(&summary, None, stdout)?,
        }
        Ok(())
    }
}

fn write_summary(
    summary: &ReportSummary<'_>,
    path: Option<&Utf8Path>,
    mut writer: impl Write,
) -> Result<(), ExpectedError> {
    let write_error =
        |err: io::Error| ExpectedError::write_output_error(path.map(Utf8Path::to_owned), err);

    serde_json::to_writer_pretty(&mut writer, summary).map_err(|err| {
        if err.is_io() {
            write_error(err.into())
        } else {
            ExpectedError::SerializeSummaryError { err }
        }
    })?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(write_error)
}
