use gridbreaker_core::{Board, BoardCell, BoardState, Pos};

/// Display state of a single cell, derived from the board on demand.
///
/// During play this mirrors the engine cell. Once the game ends it folds
/// in what the engine kept private until then: which mine went off, where
/// the remaining mines are, and which flags were wrong. A won board shows
/// its unflagged mines as flags, so the mine counter display lands on
/// zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellView {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

pub fn cell_view(board: &Board, pos: Pos) -> CellView {
    let cell = board.cell_at(pos);
    if !board.state().is_finished() {
        return live_view(cell);
    }

    let has_mine = board.has_mine_at(pos);
    match board.state() {
        BoardState::Won if has_mine => CellView::Flagged,
        BoardState::Lost if board.triggered_mine() == Some(pos) => CellView::TriggeredMine,
        BoardState::Lost if has_mine && matches!(cell, BoardCell::Hidden) => CellView::Mine,
        BoardState::Lost if !has_mine && matches!(cell, BoardCell::Flagged) => {
            CellView::Misflagged
        }
        _ => live_view(cell),
    }
}

fn live_view(cell: BoardCell) -> CellView {
    match cell {
        BoardCell::Hidden => CellView::Hidden,
        BoardCell::Revealed(count) => CellView::Revealed(count),
        BoardCell::Flagged => CellView::Flagged,
    }
}
