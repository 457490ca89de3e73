// Copyright (c) The pretty-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folds recorded event streams end to end.

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use indoc::indoc;
use pretty_assertions::assert_eq;
use pretty_report::{
    config::ReportConfig,
    errors::{EventReadError, ReportOperation, SequencingError},
    events::EventReader,
    report::{ReportTree, Status},
    summary::ReportSummary,
};
use std::{fs::File, io::BufReader};

fn fixture_path(name: &str) -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fold_fixture(name: &str, tree: &mut ReportTree) -> usize {
    let file = File::open(fixture_path(name)).expect("fixture exists");
    EventReader::new(BufReader::new(file))
        .fold_into(tree)
        .expect("fixture is well-formed")
}

#[test]
fn fold_signup_fixture() {
    let mut tree = ReportTree::new();
    let applied = fold_fixture("signup.jsonl", &mut tree);
    assert_eq!(applied, 20);

    let [signup, logout] = tree.features() else {
        panic!("expected two features");
    };

    assert_eq!(signup.title(), Some("Sign up"));
    assert_eq!(signup.file(), Some(Utf8Path::new("login/signup.html")));
    assert_eq!(signup.background_title().map(|s| s.name.as_str()), Some("Logged out"));
    assert_eq!(signup.background_steps().count(), 1);
    assert_eq!(signup.scenarios().len(), 2);
    assert_eq!(signup.scenario_summary_for(Status::Passed).unwrap(), "1 (50.0%)");
    assert_eq!(signup.scenario_summary_for(Status::Failed).unwrap(), "1 (50.0%)");
    assert_eq!(signup.step_summary_for(Status::Passed).unwrap(), "3 (60.0%)");
    assert_eq!(signup.step_summary_for(Status::Skipped).unwrap(), "1 (20.0%)");
    assert_eq!(signup.step_average_duration().unwrap(), "0m0.200s");

    let outline = &signup.scenarios()[1];
    assert_eq!(outline.name(), Some("Sign up as <role>"));
    assert_eq!(outline.location().map(|l| l.line), Some(21));
    let failed = &outline.steps()[0];
    assert!(failed.failed_with_error());

    let filled_in = &signup.scenarios()[0].steps()[1];
    assert_eq!(filled_in.keyword.as_deref(), Some("When "));
    assert!(filled_in.has_table());

    assert_eq!(logout.file(), Some(Utf8Path::new("logout.html")));
    assert!(!logout.has_description());
    assert!(logout.steps().all(|step| step.has_multiline_arg()));
}

#[test]
fn summary_uses_configured_naming() {
    let dir = Utf8TempDir::new().expect("created temp dir");
    let config_path = dir.path().join("pretty-report.toml");
    std::fs::write(
        &config_path,
        indoc! {r#"
            [output]
            report-extension = "xhtml"

            [images]
            dir = "icons"
            extension = "svg"
        "#},
    )
    .expect("wrote config");

    let config =
        ReportConfig::from_sources(Some(config_path.as_path())).expect("config is valid");
    let mut tree = ReportTree::from_config(&config);
    fold_fixture("signup.jsonl", &mut tree);

    let summary = ReportSummary::new(&tree, &config.image_naming());
    let signup = &summary.features[0];
    assert_eq!(signup.file, Some(Utf8Path::new("login/signup.xhtml")));
    assert_eq!(
        signup.scenarios[1].status_icon.as_deref(),
        Some("../icons/failed.svg")
    );

    let logout = &summary.features[1];
    assert_eq!(logout.scenario_summaries[&Status::Pending], "1 (100.0%)");
    assert_eq!(
        logout.scenarios[0].status_icon.as_deref(),
        Some("icons/pending.svg")
    );
}

#[test]
fn out_of_order_stream_reports_line() {
    let input = indoc! {r#"
        {"type": "feature-started", "feature": {"title": "A", "file": "features/a.feature"}, "parent_filename": "features/a.feature"}

        {"type": "step-finished", "step": {"kind": "executed", "name": "x", "location": {"file": "features/a.feature", "line": 2}, "keyword": "Given ", "status": "passed", "duration": 0.1}}
    "#};

    let mut tree = ReportTree::new();
    let error = EventReader::new(input.as_bytes())
        .fold_into(&mut tree)
        .unwrap_err();
    match error {
        EventReadError::Sequencing { line_number, error } => {
            assert_eq!(line_number, 3);
            assert_eq!(
                error,
                SequencingError::NoCurrentScenario {
                    operation: ReportOperation::AddStep,
                }
            );
        }
        other => panic!("expected a sequencing error, found {other:?}"),
    }
    // Events before the bad one stay applied.
    assert_eq!(tree.features().len(), 1);
}

#[test]
fn huge_step_durations_average_without_overflow() {
    let input = indoc! {r#"
        {"type": "feature-started", "feature": {"title": "A", "file": "features/a.feature"}, "parent_filename": "features/a.feature"}
        {"type": "scenario-started"}
        {"type": "step-finished", "step": {"kind": "executed", "name": "x", "location": {"file": "features/a.feature", "line": 2}, "keyword": "Given ", "status": "passed", "duration": 1e19}}
        {"type": "step-finished", "step": {"kind": "executed", "name": "y", "location": {"file": "features/a.feature", "line": 3}, "keyword": "Then ", "status": "passed", "duration": 1e19}}
        {"type": "scenario-finished", "scenario": {"kind": "scenario", "name": "s", "location": {"file": "features/a.feature", "line": 1}, "status": "passed"}}
    "#};

    let mut tree = ReportTree::new();
    EventReader::new(input.as_bytes())
        .fold_into(&mut tree)
        .expect("stream is well-formed");

    let feature = &tree.features()[0];
    assert_eq!(
        feature.step_average_duration().unwrap(),
        "166666666666666666m40.000s"
    );

    let summary = tree.summary();
    assert_eq!(
        summary.features[0].step_average_duration.as_deref(),
        Some("166666666666666666m40.000s")
    );
}

#[test]
fn unrecognized_scenario_shape_aborts() {
    let input = indoc! {r#"
        {"type": "feature-started", "feature": {"title": "A", "file": "features/a.feature"}, "parent_filename": "features/a.feature"}
        {"type": "scenario-started"}
        {"type": "scenario-finished", "scenario": {"kind": "rule", "name": "x"}}
    "#};

    let mut tree = ReportTree::new();
    let error = EventReader::new(input.as_bytes())
        .fold_into(&mut tree)
        .unwrap_err();
    match error {
        EventReadError::Parse { line_number, .. } => assert_eq!(line_number, 3),
        other => panic!("expected a parse error, found {other:?}"),
    }
    assert!(!tree.current_scenario().unwrap().is_populated());
}
