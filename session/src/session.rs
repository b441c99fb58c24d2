use chrono::prelude::*;
use gridbreaker_core::{Board, BoardState, FlagOutcome, Pos, Result, RevealReport};

use crate::{cell_view, BestTimes, CellView, Difficulty};

/// One play-through of a single board, from construction to win or loss.
///
/// Owns the engine board plus the wall-clock bookkeeping the engine
/// deliberately leaves out. A session is created fresh per game and
/// discarded wholesale on the next new-game request; only best times
/// outlive it.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    difficulty: Difficulty,
    board: Board,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, clock_seed())
    }

    /// Deterministic variant for replays and tests.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            board: Board::new(difficulty.config(), seed),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealReport> {
        let report = self.board.reveal(pos)?;
        self.update_clock(report.has_update());
        Ok(report)
    }

    pub fn chord_reveal(&mut self, pos: Pos) -> Result<RevealReport> {
        let report = self.board.chord_reveal(pos)?;
        self.update_clock(report.has_update());
        Ok(report)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        self.board.toggle_flag(pos)
    }

    /// Counter value for the mine display. A won board counts as fully
    /// flagged, matching the all-flags end-of-game view.
    pub fn mines_left(&self) -> isize {
        if matches!(self.board.state(), BoardState::Won) {
            0
        } else {
            self.board.mines_left()
        }
    }

    /// Whole seconds since the first reveal, frozen once the game ends,
    /// zero before the game starts. A display timer only ever reads this.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// On a won preset game, folds the elapsed time into `best` and
    /// reports whether this run set a new record. Custom games are never
    /// recorded.
    pub fn record_best(&self, best: &mut BestTimes) -> bool {
        if !matches!(self.board.state(), BoardState::Won) {
            return false;
        }
        match self.difficulty.preset() {
            Some(preset) => best.record(preset, self.elapsed_secs()),
            None => false,
        }
    }

    pub fn cell_view(&self, pos: Pos) -> CellView {
        cell_view(&self.board, pos)
    }

    fn update_clock(&mut self, updated: bool) {
        if updated && self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if self.board.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(Utc::now());
        }
    }
}

/// Seeds the board PRNG from the wall clock. Plenty for shuffling a
/// minefield, and keeps entropy sources out of the engine.
fn clock_seed() -> u64 {
    let now = Utc::now();
    (now.timestamp_millis() as u64) ^ u64::from(now.timestamp_subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_config;
    use gridbreaker_core::RevealOutcome;

    fn custom_session(seed: u64) -> GameSession {
        let config = custom_config(5, 5, 4).unwrap();
        GameSession::with_seed(Difficulty::Custom(config), seed)
    }

    /// 15 mines on 5x5 leave exactly one safe cell outside the cleared
    /// start neighborhood, so the first-click flood is bounded to the 3x3
    /// block for every seed.
    fn dense_session(seed: u64) -> GameSession {
        let config = custom_config(5, 5, 15).unwrap();
        GameSession::with_seed(Difficulty::Custom(config), seed)
    }

    /// Reveals every safe cell, consulting the mine mask directly.
    fn sweep_to_win(session: &mut GameSession) {
        let (rows, cols) = session.board().size();
        session.reveal((rows / 2, cols / 2)).unwrap();
        for row in 0..rows {
            for col in 0..cols {
                if !session.board().has_mine_at((row, col)) {
                    session.reveal((row, col)).unwrap();
                }
            }
        }
        assert_eq!(session.board().state(), BoardState::Won);
    }

    fn lose(session: &mut GameSession) {
        session.reveal((2, 2)).unwrap();
        assert_eq!(session.board().state(), BoardState::Active);
        let (rows, cols) = session.board().size();
        let mine = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .find(|&pos| session.board().has_mine_at(pos))
            .unwrap();
        assert_eq!(
            session.reveal(mine).unwrap().outcome,
            RevealOutcome::MineHit
        );
    }

    #[test]
    fn same_seed_plays_the_same_game() {
        let mut first = custom_session(21);
        let mut second = custom_session(21);

        assert_eq!(
            first.reveal((2, 2)).unwrap(),
            second.reveal((2, 2)).unwrap()
        );
        assert_eq!(first.board(), second.board());
    }

    #[test]
    fn clock_starts_on_first_reveal_and_freezes_at_the_end() {
        let mut session = dense_session(5);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(session.started_at.is_none());

        session.toggle_flag((0, 0)).unwrap();
        assert!(session.started_at.is_none());
        session.toggle_flag((0, 0)).unwrap();

        lose(&mut session);
        assert!(session.started_at.is_some());
        assert!(session.ended_at.is_some());

        let frozen = session.elapsed_secs();
        assert_eq!(session.elapsed_secs(), frozen);
    }

    #[test]
    fn record_best_only_applies_to_won_preset_games() {
        let path = std::env::temp_dir().join(format!(
            "gridbreaker-record-best-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let mut best = BestTimes::load(&path);

        // custom games never record
        let mut custom = dense_session(9);
        sweep_to_win(&mut custom);
        assert!(!custom.record_best(&mut best));
        assert_eq!(best.get(crate::Preset::Expert), None);

        // lost games never record
        let mut lost = GameSession::with_seed(Difficulty::Preset(crate::Preset::Expert), 9);
        lost.reveal((8, 15)).unwrap();
        let mine = (0..16)
            .flat_map(|row| (0..30).map(move |col| (row, col)))
            .find(|&pos| lost.board().has_mine_at(pos))
            .unwrap();
        assert_eq!(lost.reveal(mine).unwrap().outcome, RevealOutcome::MineHit);
        assert!(!lost.record_best(&mut best));
        assert_eq!(best.get(crate::Preset::Expert), None);

        // a won preset game does
        let mut won = GameSession::with_seed(Difficulty::Preset(crate::Preset::Beginner), 9);
        sweep_to_win(&mut won);
        assert_eq!(won.mines_left(), 0);
        assert!(won.record_best(&mut best));
        assert_eq!(best.get(crate::Preset::Beginner), Some(won.elapsed_secs()));

        let _ = std::fs::remove_file(&path);
    }
}
