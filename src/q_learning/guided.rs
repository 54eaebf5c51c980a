//! Heuristic-guided Q-learning
//!
//! Exploration is biased toward the goal, away from short movement cycles,
//! and restricted to FIGHT/HIDE while a guard shares the room. Rewards are
//! shaped for progress and revisits, the learning rate is fixed, and every
//! episode is capped at `max_steps`.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{
    QTable, TrainerKind, build_rng,
    heuristics::{
        PositionHistory, RoomStep, combat_weights, exploration_weights, sample_weighted,
        shaped_reward,
    },
};
use crate::{
    Result,
    app::GuidedConfig,
    encoding::{StateIndex, encode},
    ports::{EpisodeReport, Environment, Observer, Trainer, notify_step},
    types::{ACTION_COUNT, Action, Observation, Position},
    utils::{argmax, decayed_epsilon},
};

/// Guided trainer with goal-biased, cycle-aware exploration.
#[derive(Debug, Clone)]
pub struct GuidedTrainer {
    q_table: QTable,
    config: GuidedConfig,
    epsilon: f64,
    history: PositionHistory,
    visited: HashSet<Position>,
    rng: StdRng,
}

impl GuidedTrainer {
    /// Create a trainer with an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range values.
    pub fn new(config: GuidedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            epsilon: config.epsilon,
            history: PositionHistory::new(config.history_len),
            visited: HashSet::new(),
            rng: build_rng(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &GuidedConfig {
        &self.config
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Fixed-rate TD update; returns the new `Q(state, action)`.
    pub fn update(
        &mut self,
        state: StateIndex,
        action: Action,
        reward: f64,
        next_state: StateIndex,
    ) -> f64 {
        let best_next = self.q_table.max_q(next_state);
        let current = self.q_table.value(state, action);
        let td_target = reward + self.config.discount_factor * best_next;
        let new_q = current + self.config.learning_rate * (td_target - current);
        self.q_table.update(state, action, new_q);
        new_q
    }

    /// ε-greedy choice for the current observation. The position history
    /// must already include the current room.
    pub fn select_action(
        &mut self,
        observation: &Observation,
        state: StateIndex,
        goal: Position,
    ) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            self.explore(observation, goal)
        } else {
            self.exploit(observation, state)
        }
    }

    /// Biased random action.
    pub fn explore(&mut self, observation: &Observation, goal: Position) -> Action {
        let position = observation.player_position;
        if observation.guard_present() {
            let [fight, hide] = combat_weights(observation.player_health, &self.config);
            let mut weights = [0.0; ACTION_COUNT];
            weights[Action::Fight.index()] = fight;
            weights[Action::Hide.index()] = hide;
            return sample_weighted(&weights, &[Action::Fight, Action::Hide], &mut self.rng);
        }

        let weights = exploration_weights(position, goal, &self.history, &self.config);
        sample_weighted(&weights, &Action::valid_at(position), &mut self.rng)
    }

    /// Greedy action with guard priority and wall masking.
    pub fn exploit(&mut self, observation: &Observation, state: StateIndex) -> Action {
        let values = *self.q_table.get(state);
        if observation.guard_present() {
            return if values[Action::Fight.index()] >= values[Action::Hide.index()] {
                Action::Fight
            } else {
                Action::Hide
            };
        }

        let mut masked = values;
        for action in Action::MOVEMENTS {
            if !action.is_valid_at(observation.player_position) {
                masked[action.index()] = f64::NEG_INFINITY;
            }
        }
        Action::ALL[argmax(&masked)]
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = decayed_epsilon(
            self.epsilon,
            self.config.epsilon_decay,
            self.config.min_epsilon,
        );
    }
}

impl Trainer for GuidedTrainer {
    fn run_episode(
        &mut self,
        episode: usize,
        env: &mut dyn Environment,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeReport> {
        let epsilon = self.epsilon;
        let goal = env.goal_room();
        let start = env.reset()?;
        let mut observation = start.observation;
        let mut state = encode(&observation);
        let mut done = start.done;
        let mut total_reward = 0.0;
        let mut steps = 0;

        self.history.clear();
        self.visited.clear();

        while !done && steps < self.config.max_steps {
            let position = observation.player_position;
            let guard_present = observation.guard_present();
            self.history.push(position);
            self.visited.insert(position);

            let action = self.select_action(&observation, state, goal);

            let mut transition = env.step(action)?;
            let next_state = encode(&transition.observation);
            let room_step = RoomStep {
                before: position,
                after: transition.observation.player_position,
                done: transition.done,
                guard_present,
            };
            transition.reward = shaped_reward(
                transition.reward,
                &room_step,
                goal,
                &self.visited,
                &self.config,
            );

            self.update(state, action, transition.reward, next_state);

            total_reward += transition.reward;
            notify_step(observers, episode, steps, &transition)?;
            steps += 1;

            observation = transition.observation;
            state = next_state;
            done = transition.done;
        }

        self.decay_epsilon();

        let report = EpisodeReport {
            episode,
            total_reward,
            steps,
            terminated: done,
            terminal: if done { env.is_terminal() } else { None },
            success: done && total_reward > 0.0,
            epsilon,
        };
        debug!(
            episode,
            steps,
            total_reward,
            epsilon,
            capped = !done,
            "guided episode finished"
        );
        Ok(report)
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn kind(&self) -> TrainerKind {
        TrainerKind::Guided
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GuardId, Health};

    fn observation(row: usize, col: usize, guard: Option<&str>) -> Observation {
        Observation {
            player_position: Position::new(row, col).unwrap(),
            player_health: Health::Full,
            guard_in_cell: guard.map(|label| GuardId::parse(label).unwrap()),
        }
    }

    fn greedy_trainer() -> GuidedTrainer {
        GuidedTrainer::new(
            GuidedConfig::default()
                .with_epsilon(0.0)
                .with_min_epsilon(0.0)
                .with_seed(1),
        )
        .unwrap()
    }

    #[test]
    fn test_fixed_rate_update() {
        let mut trainer = greedy_trainer();
        let s = StateIndex::new(10).unwrap();
        let next = StateIndex::new(11).unwrap();
        trainer.q_table.update(next, Action::Up, 2.0);

        // 0 + 0.1 * (1 + 0.95 * 2 - 0) = 0.29
        let q = trainer.update(s, Action::Down, 1.0, next);
        assert!((q - 0.29).abs() < 1e-12);
    }

    #[test]
    fn test_exploit_masks_walls() {
        let mut trainer = greedy_trainer();
        let obs = observation(0, 0, None);
        let state = encode(&obs);
        trainer.q_table.update(state, Action::Up, 100.0);
        trainer.q_table.update(state, Action::Left, 50.0);
        trainer.q_table.update(state, Action::Right, 1.0);
        assert_eq!(trainer.exploit(&obs, state), Action::Right);
    }

    #[test]
    fn test_exploit_with_guard_ties_favor_fight() {
        let mut trainer = greedy_trainer();
        let obs = observation(2, 2, Some("G2"));
        let state = encode(&obs);
        trainer.q_table.update(state, Action::Down, 9.0);
        assert_eq!(trainer.exploit(&obs, state), Action::Fight);

        trainer.q_table.update(state, Action::Hide, 0.5);
        assert_eq!(trainer.exploit(&obs, state), Action::Hide);
    }

    #[test]
    fn test_explore_with_guard_only_fights_or_hides() {
        let mut trainer = GuidedTrainer::new(GuidedConfig::default().with_seed(9)).unwrap();
        let goal = Position::new(4, 4).unwrap();
        for health in [Health::Full, Health::Injured, Health::Critical] {
            let obs = Observation {
                player_health: health,
                ..observation(1, 3, Some("G1"))
            };
            for _ in 0..200 {
                let action = trainer.explore(&obs, goal);
                assert!(matches!(action, Action::Fight | Action::Hide));
            }
        }
    }
}
