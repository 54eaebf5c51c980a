//! Hyperparameter configuration for the two trainers.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for the visit-count baseline trainer.
///
/// # Examples
///
/// ```
/// use castle_escape::app::BaselineConfig;
///
/// let config = BaselineConfig::default()
///     .with_discount_factor(0.9)
///     .with_epsilon_decay(0.999)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Discount factor γ
    pub discount_factor: f64,
    /// Starting exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.999_999,
            min_epsilon: 0.01,
            seed: None,
        }
    }
}

impl BaselineConfig {
    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        check_unit("discount_factor", self.discount_factor, true)?;
        check_exploration(self.epsilon, self.epsilon_decay, self.min_epsilon)
    }
}

/// Configuration for the heuristic-guided trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedConfig {
    /// Fixed learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Starting exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Steps after which an episode is abandoned
    pub max_steps: usize,
    /// Capacity of the recent-position window used for cycle detection
    pub history_len: usize,
    /// Exploration weight for a move that closes distance to the goal
    pub goal_bias: f64,
    /// Exploration weight for a move that retraces a detected cycle
    pub retrace_weight: f64,
    /// FIGHT/HIDE weights when a guard is present and health is full
    pub healthy_combat_weights: [f64; 2],
    /// FIGHT/HIDE weights when a guard is present and health is not full
    pub wounded_combat_weights: [f64; 2],
    /// Shaping bonus for a step that reduces Manhattan distance to the goal
    pub progress_bonus: f64,
    /// Shaping penalty for stepping into an already visited room
    pub revisit_penalty: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
            max_steps: 100,
            history_len: 10,
            goal_bias: 3.0,
            retrace_weight: 0.1,
            healthy_combat_weights: [0.7, 0.3],
            wounded_combat_weights: [0.3, 0.7],
            progress_bonus: 0.5,
            revisit_penalty: 0.3,
            seed: None,
        }
    }
}

impl GuidedConfig {
    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        check_unit("learning_rate", self.learning_rate, false)?;
        check_unit("discount_factor", self.discount_factor, true)?;
        check_exploration(self.epsilon, self.epsilon_decay, self.min_epsilon)?;
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1".to_string()));
        }
        if self.history_len < 3 {
            return Err(invalid(format!(
                "history_len must be at least 3, got {}",
                self.history_len
            )));
        }
        let weights = [
            self.goal_bias,
            self.retrace_weight,
            self.healthy_combat_weights[0],
            self.healthy_combat_weights[1],
            self.wounded_combat_weights[0],
            self.wounded_combat_weights[1],
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(
                "exploration weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}

fn check_unit(name: &str, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if lower_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in (0, 1], got {value}")))
    }
}

fn check_exploration(epsilon: f64, decay: f64, floor: f64) -> Result<()> {
    check_unit("epsilon", epsilon, true)?;
    check_unit("epsilon_decay", decay, false)?;
    if !(0.0..=epsilon).contains(&floor) {
        return Err(invalid(format!(
            "min_epsilon must be in [0, epsilon], got {floor}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BaselineConfig::default().validate().is_ok());
        assert!(GuidedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        assert!(
            GuidedConfig::default()
                .with_learning_rate(0.0)
                .validate()
                .is_err()
        );
        assert!(
            BaselineConfig::default()
                .with_epsilon_decay(1.5)
                .validate()
                .is_err()
        );
        assert!(
            GuidedConfig::default()
                .with_max_steps(0)
                .validate()
                .is_err()
        );
        assert!(
            BaselineConfig::default()
                .with_epsilon(0.005)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GuidedConfig = serde_json::from_str(r#"{"max_steps": 50}"#).unwrap();
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.epsilon_decay, 0.995);
    }
}
