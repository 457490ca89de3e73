// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use pretty_report_cli::PrettyReportApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = PrettyReportApp::parse();
    let output = app.init_output();

    match app.exec() {
        Ok(()) => std::process::exit(0),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}
