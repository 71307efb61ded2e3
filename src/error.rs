use std::path::PathBuf;

/// A proposed move that cannot be played. Returned before the board is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move: column {0} is out of range")]
    InvalidColumn(usize),

    #[error("illegal move: column {0} is full")]
    ColumnFull(usize),

    #[error("illegal move: the game is already over")]
    GameOver,
}

/// Errors reported by the move-search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Every column is full. Callers treat this as a draw.
    #[error("no legal move: the board is full")]
    NoLegalMove,
}

/// Errors from parsing a board diagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("diagram line {line} has {found} cells, expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell character '{0}'")]
    InvalidCell(char),

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// Errors from a shared game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("it is not the human player's turn")]
    NotYourTurn,

    #[error("no engine plays this side")]
    NotEngineTurn,

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
