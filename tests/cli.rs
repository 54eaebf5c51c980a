use castle_escape::{
    adapters::MsgPackRepository,
    app::App,
    cli::commands::{
        evaluate::{self, EvaluateArgs, EvaluationOutcome},
        inspect::{self, InspectArgs},
        train::{self, TrainArgs},
    },
    ports::TableRepository,
    q_learning::TrainerKind,
};
use clap::Parser;
use tempfile::tempdir;

#[test]
fn train_writes_table_summary_and_trace() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("guided.msgpack");
    let summary = tmp.path().join("summary.json");
    let trace = tmp.path().join("trace.jsonl");

    let args = TrainArgs::parse_from([
        "castle-train",
        "guided",
        "--episodes",
        "4",
        "--seed",
        "21",
        "--output",
        output.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
        "--trace",
        trace.to_str().unwrap(),
        "--no-progress",
    ]);
    train::execute(args).expect("training should succeed");

    let saved = MsgPackRepository::new().load(&output).unwrap();
    assert_eq!(saved.algorithm, TrainerKind::Guided);
    assert_eq!(saved.metadata.episodes, Some(4));
    assert_eq!(saved.metadata.seed, Some(21));
    assert!(!saved.table().is_empty());

    let contents = std::fs::read_to_string(&summary).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["total_episodes"], 4);

    let lines = std::fs::read_to_string(&trace).unwrap().lines().count();
    assert!(lines > 0);
}

#[test]
fn config_file_overrides_defaults_and_flags_override_file() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("config.json");
    let output = tmp.path().join("baseline.msgpack");
    std::fs::write(
        &config,
        r#"{"training": {"num_episodes": 50}, "baseline": {"epsilon_decay": 0.9}}"#,
    )
    .unwrap();

    let args = TrainArgs::parse_from([
        "castle-train",
        "baseline",
        "--config",
        config.to_str().unwrap(),
        "--episodes",
        "2",
        "--seed",
        "4",
        "--output",
        output.to_str().unwrap(),
        "--no-progress",
    ]);
    train::execute(args).unwrap();

    let saved = MsgPackRepository::new().load(&output).unwrap();
    assert_eq!(saved.algorithm, TrainerKind::Baseline);
    assert_eq!(saved.metadata.episodes, Some(2));
    let epsilon = saved.metadata.final_epsilon.unwrap();
    assert!((epsilon - 0.81).abs() < 1e-12);
}

#[test]
fn evaluate_and_inspect_a_trained_table() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("table.msgpack");
    train::execute(TrainArgs::parse_from([
        "castle-train",
        "guided",
        "--episodes",
        "3",
        "--seed",
        "8",
        "--output",
        output.to_str().unwrap(),
        "--no-progress",
    ]))
    .unwrap();

    let args = EvaluateArgs::parse_from([
        "castle-evaluate",
        output.to_str().unwrap(),
        "--seed",
        "8",
        "--max-steps",
        "50",
    ]);
    let outcome = evaluate::evaluate(&App::new(), &args).unwrap();
    match outcome {
        EvaluationOutcome::Completed(report) => {
            assert!(report.steps <= 50);
            assert_eq!(report.truncated, !report.success && report.terminal.is_none());
        }
        EvaluationOutcome::Unusable(message) => assert!(message.contains("state")),
        EvaluationOutcome::MissingArtifact(path) => panic!("artifact missing at {path:?}"),
    }
    evaluate::execute(args).unwrap();

    inspect::execute(InspectArgs::parse_from([
        "castle-inspect",
        output.to_str().unwrap(),
        "--limit",
        "5",
    ]))
    .unwrap();
}

#[test]
fn evaluate_missing_table_exits_cleanly() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nothing-here.msgpack");
    let args = EvaluateArgs::parse_from(["castle-evaluate", missing.to_str().unwrap()]);

    let outcome = evaluate::evaluate(&App::new(), &args).unwrap();
    assert_eq!(outcome, EvaluationOutcome::MissingArtifact(missing.clone()));

    evaluate::execute(EvaluateArgs::parse_from([
        "castle-evaluate",
        missing.to_str().unwrap(),
    ]))
    .unwrap();
}

#[test]
fn evaluate_garbage_file_exits_cleanly() {
    let tmp = tempdir().unwrap();
    let garbage = tmp.path().join("garbage.msgpack");
    std::fs::write(&garbage, b"not a table").unwrap();
    let args = EvaluateArgs::parse_from(["castle-evaluate", garbage.to_str().unwrap()]);

    let outcome = evaluate::evaluate(&App::new(), &args).unwrap();
    assert!(matches!(outcome, EvaluationOutcome::Unusable(_)));
}
