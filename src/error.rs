//! Error types for loading grids and driving runs

use thiserror::Error;

/// What went wrong on a line of a save file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unknown tile type `{0}`")]
    UnknownTile(String),

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field} `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid color code {0}")]
    InvalidColor(i64),

    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),

    #[error("nested grid is missing its closing `}}`")]
    MissingCloseBrace,

    #[error("`}}` without an open nested grid")]
    UnexpectedCloseBrace,

    #[error("grids nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A save file could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Reading a grid from a file failed
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A headless run could not complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("no input marbles specified")]
    NoInput,

    #[error("machine still running after {limit} ticks")]
    TickLimit { limit: u64 },
}
