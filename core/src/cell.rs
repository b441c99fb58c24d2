use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// `Revealed` is terminal: a cell never transitions back to `Hidden` or
/// `Flagged` once opened.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardCell {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl Default for BoardCell {
    fn default() -> Self {
        Self::Hidden
    }
}
