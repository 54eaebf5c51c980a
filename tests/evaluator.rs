mod common;

use std::path::Path;

use castle_escape::{
    Error,
    adapters::MsgPackRepository,
    encode,
    pipeline::GreedyEvaluator,
    ports::TableRepository,
    q_learning::{QTable, SavedQTable, TrainerKind, TrainingMetadata},
    types::{Action, Health, TerminalKind},
};
use common::{ScriptedEnvironment, obs, open_castle, pos, transition};
use tempfile::tempdir;

fn corridor_table() -> QTable {
    let mut table = QTable::new();
    for col in 0..4 {
        let state = encode(&obs(4, col, Health::Full, None));
        table.update(state, Action::Right, 1.0);
    }
    table
}

#[test]
fn greedy_rollout_is_deterministic() {
    let table = corridor_table();
    let evaluator = GreedyEvaluator::new(&table);

    let first = evaluator.run(&mut open_castle(pos(4, 0), 1), &mut []).unwrap();
    let second = evaluator.run(&mut open_castle(pos(4, 0), 1), &mut []).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.steps, 4);
    assert!(first.success);
    assert_eq!(first.terminal, Some(TerminalKind::Goal));
}

#[test]
fn evaluation_never_writes_to_the_table() {
    let table = corridor_table();
    let before = table.clone();

    GreedyEvaluator::new(&table)
        .run(&mut open_castle(pos(4, 0), 1), &mut [])
        .unwrap();

    assert_eq!(table, before);
    assert_eq!(table.len(), 4);
}

#[test]
fn argmax_is_not_masked_at_walls() {
    let mut table = QTable::new();
    let start = obs(0, 0, Health::Full, None);
    table.update(encode(&start), Action::Up, 5.0);

    let mut env = ScriptedEnvironment::new(start, vec![transition(start, -1.0, true)]);
    let report = GreedyEvaluator::new(&table).run(&mut env, &mut []).unwrap();

    assert_eq!(env.actions, vec![Action::Up]);
    assert!(!report.success);
}

#[test]
fn guard_state_uses_plain_argmax() {
    let mut table = QTable::new();
    let start = obs(1, 2, Health::Injured, Some("G3"));
    table.update(encode(&start), Action::Hide, 2.0);
    table.update(encode(&start), Action::Fight, 1.0);

    let mut env = ScriptedEnvironment::new(start, vec![transition(start, 50.0, true)]);
    let report = GreedyEvaluator::new(&table).run(&mut env, &mut []).unwrap();

    assert_eq!(env.actions, vec![Action::Hide]);
    assert!(report.success);
}

#[test]
fn unseen_state_is_reported() {
    let mut table = QTable::new();
    table.update(encode(&obs(4, 0, Health::Full, None)), Action::Right, 1.0);

    let err = GreedyEvaluator::new(&table)
        .run(&mut open_castle(pos(4, 0), 1), &mut [])
        .unwrap_err();

    let missing = encode(&obs(4, 1, Health::Full, None)).value();
    assert!(matches!(err, Error::MissingState { index } if index == missing));
}

#[test]
fn missing_artifact_is_reported() {
    let dir = tempdir().unwrap();
    let repo = MsgPackRepository::new();
    let err = repo.load(&dir.path().join("advanced_q_table.msgpack")).unwrap_err();
    assert!(matches!(err, Error::ArtifactNotFound { .. }));
}

#[test]
fn saved_table_replays_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.msgpack");
    let repo = MsgPackRepository::new();
    let saved = SavedQTable::new(
        TrainerKind::Baseline,
        corridor_table(),
        TrainingMetadata::default(),
    );
    repo.save(&saved, &path).unwrap();

    let loaded = repo.load(Path::new(&path)).unwrap();
    let original = GreedyEvaluator::new(saved.table())
        .run(&mut open_castle(pos(4, 0), 9), &mut [])
        .unwrap();
    let replayed = GreedyEvaluator::new(loaded.table())
        .run(&mut open_castle(pos(4, 0), 9), &mut [])
        .unwrap();
    assert_eq!(original, replayed);
}
