//! Seeded stand-in for the Castle Escape environment.
//!
//! Lets the CLI and integration tests run end to end without the external
//! simulator. The player starts in the north-west room and must reach the
//! south-east treasure room; four guards patrol the castle. Moving into a
//! guard's room forces a choice between fighting, hiding, or fleeing.

use std::collections::BTreeMap;

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Environment, StepInfo, Transition},
    types::{
        ACTION_COUNT, Action, GRID_SIZE, GuardId, Health, Observation, Position, TerminalKind,
        WorldState,
    },
};

/// Combat traits of a single guard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardProfile {
    /// Probability the guard wins a fight
    pub strength: f64,
    /// Probability the guard spots a hiding or fleeing player
    pub keenness: f64,
}

/// Rewards and dynamics of the simulated castle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastleRules {
    pub start: Position,
    pub goal: Position,
    /// Chance a move goes in a random other direction
    pub slip_probability: f64,
    /// Chance each guard wanders to a neighbouring room after a step
    pub patrol_probability: f64,
    pub goal_reward: f64,
    pub combat_win_reward: f64,
    pub combat_loss_reward: f64,
    pub defeat_reward: f64,
    pub guards: BTreeMap<GuardId, GuardProfile>,
}

impl Default for CastleRules {
    fn default() -> Self {
        let profiles = [(0.8, 0.1), (0.6, 0.3), (0.9, 0.2), (0.7, 0.5)];
        let guards = GuardId::all()
            .zip(profiles)
            .map(|(id, (strength, keenness))| (id, GuardProfile { strength, keenness }))
            .collect();
        Self {
            start: Position { row: 0, col: 0 },
            goal: Position {
                row: GRID_SIZE - 1,
                col: GRID_SIZE - 1,
            },
            slip_probability: 0.1,
            patrol_probability: 0.5,
            goal_reward: 10_000.0,
            combat_win_reward: 10.0,
            combat_loss_reward: -1_000.0,
            defeat_reward: -1_000.0,
            guards,
        }
    }
}

/// Simulated castle implementing the [`Environment`] port.
#[derive(Debug, Clone)]
pub struct SimulatedCastle {
    rules: CastleRules,
    state: WorldState,
    terminal: Option<TerminalKind>,
    started: bool,
    rng: StdRng,
}

impl SimulatedCastle {
    pub fn new(rules: CastleRules, seed: Option<u64>) -> Self {
        let rng = crate::q_learning::build_rng(seed);
        let state = WorldState {
            player_position: rules.start,
            player_health: Health::Full,
            guard_positions: BTreeMap::new(),
        };
        let mut castle = Self {
            rules,
            state,
            terminal: None,
            started: false,
            rng,
        };
        castle.place_guards();
        castle
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(CastleRules::default(), Some(seed))
    }

    pub fn rules(&self) -> &CastleRules {
        &self.rules
    }

    /// Lowest-numbered guard sharing the player's room.
    fn guard_in_cell(&self) -> Option<GuardId> {
        self.state
            .guard_positions
            .iter()
            .find(|(_, position)| **position == self.state.player_position)
            .map(|(id, _)| *id)
    }

    fn observation(&self) -> Observation {
        Observation {
            player_position: self.state.player_position,
            player_health: self.state.player_health,
            guard_in_cell: self.guard_in_cell(),
        }
    }

    fn random_room(&mut self) -> Position {
        loop {
            let room = Position {
                row: self.rng.random_range(0..GRID_SIZE),
                col: self.rng.random_range(0..GRID_SIZE),
            };
            if room != self.rules.goal && room != self.state.player_position {
                return room;
            }
        }
    }

    fn place_guards(&mut self) {
        let ids: Vec<GuardId> = self.rules.guards.keys().copied().collect();
        self.state.guard_positions.clear();
        for id in ids {
            let room = self.random_room();
            self.state.guard_positions.insert(id, room);
        }
    }

    fn relocate(&mut self, guard: GuardId) {
        let room = self.random_room();
        self.state.guard_positions.insert(guard, room);
    }

    fn patrol(&mut self) {
        let ids: Vec<GuardId> = self.state.guard_positions.keys().copied().collect();
        for id in ids {
            if self.rng.random::<f64>() >= self.rules.patrol_probability {
                continue;
            }
            let Some(current) = self.state.guard_positions.get(&id).copied() else {
                continue;
            };
            let options: Vec<Position> = Action::MOVEMENTS
                .iter()
                .filter_map(|action| current.step(*action))
                .filter(|room| *room != self.rules.goal)
                .collect();
            if let Some(room) = options.choose(&mut self.rng) {
                self.state.guard_positions.insert(id, *room);
            }
        }
    }

    fn lose_fight(&mut self, event: &mut String) -> f64 {
        match self.state.player_health.degrade() {
            Some(health) => {
                self.state.player_health = health;
                event.push_str(&format!(", health now {health}"));
                self.rules.combat_loss_reward
            }
            None => {
                self.terminal = Some(TerminalKind::Defeat);
                event.push_str(", player defeated");
                self.rules.defeat_reward
            }
        }
    }

    fn walk(&mut self, action: Action, event: &mut String) -> f64 {
        let mut direction = action;
        if self.rng.random::<f64>() < self.rules.slip_probability {
            let others: Vec<Action> = Action::MOVEMENTS
                .into_iter()
                .filter(|a| *a != action)
                .collect();
            if let Some(slipped) = others.choose(&mut self.rng) {
                direction = *slipped;
                note(event, &format!("slipped {direction}"));
            }
        }
        match self.state.player_position.step(direction) {
            Some(room) => self.state.player_position = room,
            None => note(event, "bumped into a wall"),
        }
        if self.state.player_position == self.rules.goal {
            self.terminal = Some(TerminalKind::Goal);
            note(event, "reached the goal");
            return self.rules.goal_reward;
        }
        0.0
    }

    fn resolve(&mut self, action: Action) -> (f64, String) {
        let mut event = String::new();
        let reward = match (self.guard_in_cell(), action) {
            (Some(guard), Action::Fight) => {
                let profile = self.rules.guards[&guard];
                if self.rng.random::<f64>() >= profile.strength {
                    event.push_str(&format!("defeated {guard}"));
                    self.relocate(guard);
                    self.rules.combat_win_reward
                } else {
                    event.push_str(&format!("lost fight to {guard}"));
                    self.lose_fight(&mut event)
                }
            }
            (Some(guard), Action::Hide) => {
                let profile = self.rules.guards[&guard];
                if self.rng.random::<f64>() >= profile.keenness {
                    event.push_str(&format!("hid from {guard}"));
                    self.relocate(guard);
                    0.0
                } else {
                    event.push_str(&format!("{guard} found the player"));
                    self.lose_fight(&mut event)
                }
            }
            (Some(guard), movement) => {
                let profile = self.rules.guards[&guard];
                if self.rng.random::<f64>() < profile.keenness {
                    event.push_str(&format!("{guard} caught the fleeing player"));
                    self.lose_fight(&mut event)
                } else {
                    self.walk(movement, &mut event)
                }
            }
            (None, Action::Fight | Action::Hide) => 0.0,
            (None, movement) => self.walk(movement, &mut event),
        };
        (reward, event)
    }
}

fn note(event: &mut String, text: &str) {
    if !event.is_empty() {
        event.push_str("; ");
    }
    event.push_str(text);
}

impl Environment for SimulatedCastle {
    fn reset(&mut self) -> Result<Transition> {
        self.state.player_position = self.rules.start;
        self.state.player_health = Health::Full;
        self.terminal = None;
        self.started = true;
        self.place_guards();
        Ok(Transition {
            observation: self.observation(),
            reward: 0.0,
            done: false,
            info: StepInfo::default(),
        })
    }

    fn step(&mut self, action: Action) -> Result<Transition> {
        if !self.started {
            return Err(Error::Environment {
                message: format!("{action} issued before the first reset"),
            });
        }
        if self.terminal.is_some() {
            return Ok(Transition {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: StepInfo {
                    action: Some(action),
                    event: Some("episode already over".to_string()),
                },
            });
        }

        let (reward, event) = self.resolve(action);
        if self.terminal.is_none() {
            self.patrol();
        }

        Ok(Transition {
            observation: self.observation(),
            reward,
            done: self.terminal.is_some(),
            info: StepInfo {
                action: Some(action),
                event: (!event.is_empty()).then_some(event),
            },
        })
    }

    fn sample_action(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..ACTION_COUNT)]
    }

    fn goal_room(&self) -> Position {
        self.rules.goal
    }

    fn current_state(&self) -> WorldState {
        self.state.clone()
    }

    fn is_terminal(&self) -> Option<TerminalKind> {
        self.terminal
    }
}
