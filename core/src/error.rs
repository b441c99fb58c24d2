use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the board")]
    OutOfBounds,
    #[error("Game already finished, no new moves are accepted")]
    AlreadyFinished,
}

pub type Result<T> = core::result::Result<T, GameError>;
