//! Newtype wrappers and enums modelling the Castle Escape domain.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Side length of the square castle grid.
pub const GRID_SIZE: usize = 5;

/// Number of actions available to the agent.
pub const ACTION_COUNT: usize = 6;

/// A room on the 5x5 castle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position, validating it lies on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] if either coordinate is >= 5.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Ok(Position { row, col })
        } else {
            Err(crate::Error::InvalidPosition { row, col })
        }
    }

    /// Manhattan distance to another room.
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The room reached by a movement action, or `None` when a wall blocks it
    /// (or the action is not a movement).
    pub fn step(&self, action: Action) -> Option<Position> {
        match action {
            Action::Up if self.row > 0 => Some(Position {
                row: self.row - 1,
                col: self.col,
            }),
            Action::Down if self.row + 1 < GRID_SIZE => Some(Position {
                row: self.row + 1,
                col: self.col,
            }),
            Action::Left if self.col > 0 => Some(Position {
                row: self.row,
                col: self.col - 1,
            }),
            Action::Right if self.col + 1 < GRID_SIZE => Some(Position {
                row: self.row,
                col: self.col + 1,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Player health, ordered from worst to best.
///
/// The ordinal is what the state encoder consumes: 0 = Critical, 2 = Full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Health {
    Critical,
    Injured,
    Full,
}

impl Health {
    pub const MAX_ORDINAL: usize = 2;

    pub fn ordinal(self) -> usize {
        match self {
            Health::Critical => 0,
            Health::Injured => 1,
            Health::Full => 2,
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidHealth`] for ordinals above 2.
    pub fn from_ordinal(ordinal: usize) -> Result<Self, crate::Error> {
        match ordinal {
            0 => Ok(Health::Critical),
            1 => Ok(Health::Injured),
            2 => Ok(Health::Full),
            _ => Err(crate::Error::InvalidHealth { ordinal }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Health::Critical => "Critical",
            Health::Injured => "Injured",
            Health::Full => "Full",
        }
    }

    pub fn is_full(self) -> bool {
        self.ordinal() == Self::MAX_ORDINAL
    }

    /// Health after losing a fight, or `None` if the player was already critical.
    pub fn degrade(self) -> Option<Health> {
        match self {
            Health::Full => Some(Health::Injured),
            Health::Injured => Some(Health::Critical),
            Health::Critical => None,
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of one of the castle guards (`G1`..`G4`).
///
/// Labels are validated on construction so the state encoder can rely on
/// the numeric code lying in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuardId(u8);

impl GuardId {
    pub const MAX_CODE: u8 = 4;

    /// Build a guard id from its numeric code.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGuardLabel`] if the code is outside `1..=4`.
    pub fn new(code: u8) -> Result<Self, crate::Error> {
        if (1..=Self::MAX_CODE).contains(&code) {
            Ok(GuardId(code))
        } else {
            Err(crate::Error::InvalidGuardLabel {
                label: format!("G{code}"),
            })
        }
    }

    /// Parse a guard label. The trailing character must be a digit in `1..=4`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGuardLabel`] for any other label.
    pub fn parse(label: &str) -> Result<Self, crate::Error> {
        let invalid = || crate::Error::InvalidGuardLabel {
            label: label.to_string(),
        };
        let digit = label
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(invalid)?;
        u8::try_from(digit)
            .ok()
            .and_then(|code| GuardId::new(code).ok())
            .ok_or_else(invalid)
    }

    /// Numeric code used by the state encoder.
    pub fn code(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = GuardId> {
        (1..=Self::MAX_CODE).map(GuardId)
    }
}

impl fmt::Display for GuardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl FromStr for GuardId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GuardId::parse(s)
    }
}

impl TryFrom<String> for GuardId {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GuardId::parse(&value)
    }
}

impl From<GuardId> for String {
    fn from(id: GuardId) -> Self {
        id.to_string()
    }
}

/// The six agent actions, in table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Fight,
    Hide,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Fight,
        Action::Hide,
    ];

    pub const MOVEMENTS: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] for indices above 5.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(crate::Error::InvalidAction { index })
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::Up | Action::Down | Action::Left | Action::Right
        )
    }

    /// Whether the action is structurally valid in a room. Movement into a
    /// wall is invalid; FIGHT and HIDE are always valid.
    pub fn is_valid_at(self, position: Position) -> bool {
        !self.is_movement() || position.step(self).is_some()
    }

    /// All structurally valid actions in a room, in index order.
    pub fn valid_at(position: Position) -> Vec<Action> {
        Self::ALL
            .into_iter()
            .filter(|action| action.is_valid_at(position))
            .collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::Fight => "FIGHT",
            Action::Hide => "HIDE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the agent sees after each reset or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub player_position: Position,
    pub player_health: Health,
    pub guard_in_cell: Option<GuardId>,
}

impl Observation {
    pub fn guard_present(&self) -> bool {
        self.guard_in_cell.is_some()
    }
}

/// Full environment snapshot exposed by `Environment::current_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub player_position: Position,
    pub player_health: Health,
    pub guard_positions: BTreeMap<GuardId, Position>,
}

/// How a finished episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Goal,
    Defeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(4, 4).is_ok());
        assert!(Position::new(5, 0).is_err());
        assert!(Position::new(0, 5).is_err());
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(pos(0, 0).manhattan(pos(4, 4)), 8);
        assert_eq!(pos(2, 3).manhattan(pos(2, 3)), 0);
        assert_eq!(pos(3, 1).manhattan(pos(1, 2)), 3);
    }

    #[test]
    fn test_walls_block_movement() {
        let corner = pos(0, 0);
        assert!(!Action::Up.is_valid_at(corner));
        assert!(!Action::Left.is_valid_at(corner));
        assert!(Action::Down.is_valid_at(corner));
        assert!(Action::Right.is_valid_at(corner));
        assert!(Action::Fight.is_valid_at(corner));
        assert!(Action::Hide.is_valid_at(corner));

        let far = pos(4, 4);
        assert_eq!(
            Action::valid_at(far),
            vec![Action::Up, Action::Left, Action::Fight, Action::Hide]
        );
        assert_eq!(Action::valid_at(pos(2, 2)).len(), 6);
    }

    #[test]
    fn test_action_index_roundtrip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i).unwrap(), *action);
        }
        assert!(Action::from_index(6).is_err());
    }

    #[test]
    fn test_guard_label_parsing() {
        assert_eq!(GuardId::parse("G1").unwrap().code(), 1);
        assert_eq!(GuardId::parse("G4").unwrap().code(), 4);
        assert!(GuardId::parse("G0").is_err());
        assert!(GuardId::parse("G5").is_err());
        assert!(GuardId::parse("Gx").is_err());
        assert!(GuardId::parse("").is_err());
    }

    #[test]
    fn test_health_ordinals() {
        assert_eq!(Health::Critical.ordinal(), 0);
        assert_eq!(Health::Full.ordinal(), 2);
        assert!(Health::Full.is_full());
        assert!(!Health::Injured.is_full());
        assert_eq!(Health::Full.degrade(), Some(Health::Injured));
        assert_eq!(Health::Critical.degrade(), None);
        assert!(Health::from_ordinal(3).is_err());
    }
}
