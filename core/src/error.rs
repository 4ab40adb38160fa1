use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Sequence is not valid for shifting blocks")]
    InvalidForMoveBlocks,
    #[error("Sequence is not valid for shifting the player")]
    InvalidForMovePlayer,
    #[error("Unknown cell symbol {symbol:?} at index {index}")]
    UnknownSymbol { symbol: char, index: usize },
}

pub type Result<T> = core::result::Result<T, EngineError>;
