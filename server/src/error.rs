use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Board {width}x{height} is outside the supported range {min}..={max}")]
    InvalidDimension {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },
    #[error("Position ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("No board has been configured")]
    InvalidState,
}

pub type Result<T> = std::result::Result<T, EngineError>;
