#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::{BitOr, Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Pos,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Pos, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, cols): Pos, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let max_mines = cell_area(rows, cols).saturating_sub(1).max(1);
        let mines = mines.clamp(1, max_mines);
        Self::new_unchecked((rows, cols), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_area(self.size.0, self.size.1)
    }
}

/// Immutable mine placement for one game, plus the count of mines actually
/// placed. Adjacency numbers are derived from the mask on demand and are
/// never stored, so they cannot go stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl Minefield {
    /// Field with no mines at all, the state of a board before the first
    /// reveal request triggers placement.
    pub fn empty(size: Pos) -> Self {
        Self {
            mine_mask: Array2::default(size.to_grid_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Pos, mine_coords: &[Pos]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_grid_index());

        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[pos.to_grid_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, pos: Pos) -> Result<Pos> {
        let size = self.size();
        if pos.0 < size.0 && pos.1 < size.1 {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Pos {
        let dim = self.mine_mask.dim();
        (
            dim.0.try_into().unwrap(),
            dim.1.try_into().unwrap(),
        )
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self[pos]
    }

    pub fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.mine_mask
            .iter_neighbors(pos)
            .filter(|&neighbor| self[neighbor])
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn iter_neighbors(&self, pos: Pos) -> NeighborIter {
        self.mine_mask.iter_neighbors(pos)
    }
}

impl Index<Pos> for Minefield {
    type Output = bool;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.mine_mask[pos.to_grid_index()]
    }
}

impl IndexMut<Pos> for Minefield {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.mine_mask[pos.to_grid_index()]
    }
}

/// Outcome of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Placed,
    Removed,
}

impl FlagOutcome {
    /// Signed change to the flag counter, so callers can keep a mine
    /// counter display current without recounting the grid.
    pub const fn delta(self) -> i8 {
        match self {
            Self::NoChange => 0,
            Self::Placed => 1,
            Self::Removed => -1,
        }
    }

    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Outcome of revealing one or more cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Opened,
    MineHit,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Opened => true,
            MineHit => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when a chord opens several neighbors.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (MineHit, _) => MineHit,
            (_, MineHit) => MineHit,
            (Won, _) => Won,
            (_, Won) => Won,
            (Opened, _) => Opened,
            (_, Opened) => Opened,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Everything a single reveal or chord call changed: the merged outcome and
/// each newly affected cell, in reveal order, so a caller can repaint only
/// those cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub cells: Vec<Pos>,
}

impl RevealReport {
    pub fn none() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            cells: Vec::new(),
        }
    }

    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }

    pub fn merge(&mut self, other: RevealReport) {
        self.outcome = self.outcome | other.outcome;
        self.cells.extend(other.cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_mines_into_valid_range() {
        let config = GameConfig::new((3, 3), 100);
        assert_eq!(config.mines, 8);

        let config = GameConfig::new((3, 3), 0);
        assert_eq!(config.mines, 1);
    }

    #[test]
    fn minefield_rejects_out_of_bounds_mines() {
        let result = Minefield::from_mine_coords((3, 3), &[(3, 0)]);
        assert_eq!(result, Err(GameError::OutOfBounds));
    }

    #[test]
    fn minefield_counts_actual_mines() {
        let field = Minefield::from_mine_coords((4, 4), &[(0, 0), (3, 3)]).unwrap();
        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_cell_count(), 14);
        assert_eq!(field.adjacent_mines((1, 1)), 1);
        assert_eq!(field.adjacent_mines((2, 2)), 1);
        assert_eq!(field.adjacent_mines((1, 3)), 0);
    }

    #[test]
    fn mine_hit_dominates_merged_outcomes() {
        use RevealOutcome::*;
        assert_eq!(Opened | MineHit, MineHit);
        assert_eq!(MineHit | Won, MineHit);
        assert_eq!(Won | Opened, Won);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
