use alloc::collections::VecDeque;
use alloc::vec;
use core::num::Saturating;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardState {
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Mine-sweeping board for a single game: grid state, reveal/flag/chord
/// operations, and win/loss detection.
///
/// Mines are placed lazily. A fresh board holds an all-clear [`Minefield`]
/// until the first reveal request names the cell whose neighborhood must
/// stay clear; every operation before that point sees a grid with zero
/// mines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    seed: u64,
    minefield: Minefield,
    mines_placed: bool,
    grid: Array2<BoardCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: BoardState,
    triggered_mine: Option<Pos>,
}

impl Board {
    /// Fresh board with all cells hidden and no mines placed. The seed
    /// fully determines the eventual placement, which makes replays and
    /// tests deterministic.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            grid: Array2::default(config.size.to_grid_index()),
            minefield: Minefield::empty(config.size),
            config,
            seed,
            mines_placed: false,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    /// Board over a pre-placed minefield, for replays and tests.
    pub fn with_minefield(minefield: Minefield) -> Self {
        let config = minefield.game_config();
        Self {
            grid: Array2::default(config.size.to_grid_index()),
            minefield,
            config,
            seed: 0,
            mines_placed: true,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Pos {
        self.config.size
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// Requested mine count until placement happens, the actual placed
    /// count afterwards. The two differ only on boards too dense to honor
    /// the request.
    pub fn total_mines(&self) -> CellCount {
        if self.mines_placed {
            self.minefield.mine_count()
        } else {
            self.config.mines
        }
    }

    /// How many mines have not been flagged yet. Negative when the player
    /// has over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.total_mines() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn cell_at(&self, pos: Pos) -> BoardCell {
        self.grid[pos.to_grid_index()]
    }

    pub fn has_mine_at(&self, pos: Pos) -> bool {
        self.minefield.contains_mine(pos)
    }

    /// The mine that ended the game, once the board is lost.
    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    /// True exactly when every safe cell has been revealed.
    pub fn is_win(&self) -> bool {
        self.revealed_count.0 == self.minefield.safe_cell_count()
    }

    /// Whether a chord on this cell would currently open any neighbors.
    pub fn is_chordable(&self, pos: Pos) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.grid[pos.to_grid_index()] {
            BoardCell::Revealed(count) if count > 0 => {
                count == self.count_flagged_neighbors(pos)
            }
            _ => false,
        }
    }

    /// Scatters mines over the board, keeping `safe_pos` and its whole
    /// neighborhood clear while the pool allows. Runs at most once per
    /// board; later calls are no-ops.
    pub fn place_mines(&mut self, safe_pos: Pos) -> Result<()> {
        let safe_pos = self.minefield.validate_coords(safe_pos)?;
        if self.mines_placed {
            return Ok(());
        }

        self.minefield = ScatterGenerator::new(self.seed, safe_pos).generate(self.config);
        self.mines_placed = true;
        log::debug!(
            "placed {} mines avoiding {:?}",
            self.minefield.mine_count(),
            safe_pos
        );
        Ok(())
    }

    /// Reveals a hidden cell, flood-filling through zero-adjacency
    /// regions. Flagged and already-revealed cells report no change.
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealReport> {
        let pos = self.minefield.validate_coords(pos)?;

        if !matches!(self.grid[pos.to_grid_index()], BoardCell::Hidden) {
            return Ok(RevealReport::none());
        }
        self.check_not_finished()?;
        self.place_mines(pos)?;
        Ok(self.reveal_cell(pos))
    }

    /// Hidden -> Flagged -> Hidden toggle; revealed cells never change.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        use BoardCell::*;

        let pos = self.minefield.validate_coords(pos)?;
        self.check_not_finished()?;

        Ok(match self.grid[pos.to_grid_index()] {
            Hidden => {
                self.grid[pos.to_grid_index()] = Flagged;
                self.flagged_count += 1;
                FlagOutcome::Placed
            }
            Flagged => {
                self.grid[pos.to_grid_index()] = Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Removed
            }
            Revealed(_) => FlagOutcome::NoChange,
        })
    }

    /// Opens every hidden neighbor of a revealed numbered cell whose
    /// flagged-neighbor count equals its number exactly. Flagged neighbors
    /// are trusted and skipped, so a wrong flag can still lead the chord
    /// onto a real mine elsewhere.
    pub fn chord_reveal(&mut self, pos: Pos) -> Result<RevealReport> {
        let pos = self.minefield.validate_coords(pos)?;
        self.check_not_finished()?;

        match self.grid[pos.to_grid_index()] {
            BoardCell::Revealed(count)
                if count > 0 && count == self.count_flagged_neighbors(pos) =>
            {
                let mut report = RevealReport::none();
                for neighbor in self.neighbors(pos) {
                    let partial = self.reveal_cell(neighbor);
                    report.merge(partial);
                }
                Ok(report)
            }
            _ => Ok(RevealReport::none()),
        }
    }

    fn reveal_cell(&mut self, pos: Pos) -> RevealReport {
        let cell = self.grid[pos.to_grid_index()];
        let has_mine = self.minefield[pos];

        match (cell, has_mine) {
            (BoardCell::Hidden, true) => {
                self.triggered_mine = Some(pos);
                self.end_game(false);
                RevealReport {
                    outcome: RevealOutcome::MineHit,
                    cells: vec![pos],
                }
            }
            (BoardCell::Hidden, false) => {
                let adjacent = self.minefield.adjacent_mines(pos);
                self.grid[pos.to_grid_index()] = BoardCell::Revealed(adjacent);
                self.revealed_count += 1;
                let mut cells = vec![pos];
                log::debug!("revealed {:?}, adjacent mines: {}", pos, adjacent);

                if adjacent == 0 {
                    let mut visited: HashSet<Pos> = HashSet::from([pos]);
                    let mut work: VecDeque<Pos> = self
                        .neighbors(pos)
                        .filter(|&n| matches!(self.grid[n.to_grid_index()], BoardCell::Hidden))
                        .collect();

                    while let Some(visit) = work.pop_front() {
                        if !visited.insert(visit) {
                            continue;
                        }

                        // flags survive the flood, revealed cells are done
                        if matches!(
                            self.grid[visit.to_grid_index()],
                            BoardCell::Revealed(_) | BoardCell::Flagged
                        ) {
                            continue;
                        }

                        let visit_adjacent = self.minefield.adjacent_mines(visit);
                        self.grid[visit.to_grid_index()] = BoardCell::Revealed(visit_adjacent);
                        self.revealed_count += 1;
                        cells.push(visit);
                        log::trace!(
                            "flood revealed {:?}, adjacent mines: {}",
                            visit,
                            visit_adjacent
                        );

                        if visit_adjacent == 0 {
                            work.extend(
                                self.neighbors(visit)
                                    .filter(|&n| {
                                        matches!(
                                            self.grid[n.to_grid_index()],
                                            BoardCell::Hidden
                                        )
                                    })
                                    .filter(|n| !visited.contains(n)),
                            );
                        }
                    }
                }

                if self.revealed_count == Saturating(self.minefield.safe_cell_count()) {
                    self.end_game(true);
                    RevealReport {
                        outcome: RevealOutcome::Won,
                        cells,
                    }
                } else {
                    self.mark_started();
                    RevealReport {
                        outcome: RevealOutcome::Opened,
                        cells,
                    }
                }
            }
            _ => RevealReport::none(),
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, BoardState::Ready) {
            self.state = BoardState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            BoardState::Won
        } else {
            BoardState::Lost
        };
    }

    fn count_flagged_neighbors(&self, pos: Pos) -> u8 {
        self.neighbors(pos)
            .filter(|&n| self.grid[n.to_grid_index()] == BoardCell::Flagged)
            .count()
            .try_into()
            .unwrap()
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyFinished)
        } else {
            Ok(())
        }
    }

    fn neighbors(&self, pos: Pos) -> NeighborIter {
        self.minefield.iter_neighbors(pos)
    }
}
