use gridbreaker_core::{cell_area, CellCount, Coord, GameConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_ROWS: Coord = 5;
pub const MAX_ROWS: Coord = 24;
pub const MIN_COLS: Coord = 5;
pub const MAX_COLS: Coord = 40;

/// The three fixed difficulties. Only these are tracked in the best-times
/// record; custom games are played but never persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((16, 30), 99),
        }
    }

    /// Stable key used in the best-times file.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }

    pub fn from_key(key: &str) -> Option<Preset> {
        Self::ALL.into_iter().find(|preset| preset.key() == key)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Difficulty {
    Preset(Preset),
    Custom(GameConfig),
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Preset(preset) => preset.config(),
            Self::Custom(config) => config,
        }
    }

    pub const fn preset(self) -> Option<Preset> {
        match self {
            Self::Preset(preset) => Some(preset),
            Self::Custom(_) => None,
        }
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("rows out of range, expected 5..=24, got {0}")]
    RowsOutOfRange(Coord),
    #[error("columns out of range, expected 5..=40, got {0}")]
    ColsOutOfRange(Coord),
    #[error("mine count out of range, expected 1..={0}, got {1}")]
    MinesOutOfRange(CellCount, CellCount),
}

/// Validates user-supplied custom dimensions before any board exists. The
/// engine is never handed values outside these ranges.
pub fn custom_config(
    rows: Coord,
    cols: Coord,
    mines: CellCount,
) -> Result<GameConfig, DifficultyError> {
    if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
        return Err(DifficultyError::RowsOutOfRange(rows));
    }
    if !(MIN_COLS..=MAX_COLS).contains(&cols) {
        return Err(DifficultyError::ColsOutOfRange(cols));
    }
    let max_mines = cell_area(rows, cols) - 1;
    if mines == 0 || mines > max_mines {
        return Err(DifficultyError::MinesOutOfRange(max_mines, mines));
    }
    Ok(GameConfig::new_unchecked((rows, cols), mines))
}
