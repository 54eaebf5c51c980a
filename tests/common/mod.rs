//! Common test utilities for the castle escape test suite.
//!
//! Provides a scripted environment that replays fixed transitions, a
//! deterministic guard-free castle, and an observer that records steps.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex},
};

use castle_escape::{
    Result,
    adapters::{CastleRules, SimulatedCastle},
    ports::{EpisodeReport, Environment, Observer, StepInfo, Transition},
    types::{Action, GuardId, Health, Observation, Position, TerminalKind, WorldState},
};

pub fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

pub fn obs(row: usize, col: usize, health: Health, guard: Option<&str>) -> Observation {
    Observation {
        player_position: pos(row, col),
        player_health: health,
        guard_in_cell: guard.map(|label| GuardId::parse(label).unwrap()),
    }
}

pub fn transition(observation: Observation, reward: f64, done: bool) -> Transition {
    Transition {
        observation,
        reward,
        done,
        info: StepInfo::default(),
    }
}

/// Environment that ignores actions and replays a fixed list of transitions.
///
/// Once the script runs out it keeps returning the last observation with
/// zero reward and `done = false`.
pub struct ScriptedEnvironment {
    start: Observation,
    script: Vec<Transition>,
    remaining: VecDeque<Transition>,
    current: Observation,
    terminal: Option<TerminalKind>,
    pub goal: Position,
    pub sampled_action: Action,
    pub sample_calls: usize,
    pub actions: Vec<Action>,
}

impl ScriptedEnvironment {
    pub fn new(start: Observation, script: Vec<Transition>) -> Self {
        Self {
            start,
            remaining: script.iter().cloned().collect(),
            script,
            current: start,
            terminal: None,
            goal: pos(4, 4),
            sampled_action: Action::Hide,
            sample_calls: 0,
            actions: Vec::new(),
        }
    }
}

impl Environment for ScriptedEnvironment {
    fn reset(&mut self) -> Result<Transition> {
        self.remaining = self.script.iter().cloned().collect();
        self.current = self.start;
        self.terminal = None;
        Ok(transition(self.start, 0.0, false))
    }

    fn step(&mut self, action: Action) -> Result<Transition> {
        self.actions.push(action);
        let mut next = self
            .remaining
            .pop_front()
            .unwrap_or_else(|| transition(self.current, 0.0, false));
        next.info.action = Some(action);
        self.current = next.observation;
        if next.done {
            self.terminal = Some(if next.reward > 0.0 {
                TerminalKind::Goal
            } else {
                TerminalKind::Defeat
            });
        }
        Ok(next)
    }

    fn sample_action(&mut self) -> Action {
        self.sample_calls += 1;
        self.sampled_action
    }

    fn goal_room(&self) -> Position {
        self.goal
    }

    fn current_state(&self) -> WorldState {
        WorldState {
            player_position: self.current.player_position,
            player_health: self.current.player_health,
            guard_positions: BTreeMap::new(),
        }
    }

    fn is_terminal(&self) -> Option<TerminalKind> {
        self.terminal
    }
}

/// Guard-free castle without slips: every move lands where it points.
pub fn open_castle(start: Position, seed: u64) -> SimulatedCastle {
    let rules = CastleRules {
        start,
        slip_probability: 0.0,
        guards: BTreeMap::new(),
        ..CastleRules::default()
    };
    SimulatedCastle::new(rules, Some(seed))
}

/// Observer that copies every step and report into shared storage.
#[derive(Clone, Default)]
pub struct Recorder {
    pub steps: Arc<Mutex<Vec<Transition>>>,
    pub reports: Arc<Mutex<Vec<EpisodeReport>>>,
}

impl Recorder {
    pub fn steps(&self) -> Vec<Transition> {
        self.steps.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<EpisodeReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl Observer for Recorder {
    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        self.steps.lock().unwrap().push(transition.clone());
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}
