use crate::parse::ParseError;
use crate::roll::RollError;
use serde::Serialize;
use thiserror::Error;

/// Syntactically valid dice rules that make no sense.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("must roll at least 1 die")]
    NoDice,
    #[error("die must have at least 1 side")]
    NoSides,
    #[error("cannot keep/drop {count} from {available} dice")]
    SelectTooMany { count: usize, available: usize },
}

/// A configured safety ceiling was exceeded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LimitError {
    #[error("cannot roll more than {0} dice per term")]
    TooManyDice(u64),
    #[error("die cannot have more than {0} sides")]
    TooManySides(u64),
    #[error("exceeded maximum rerolls of {0}")]
    TooManyRerolls(usize),
    #[error("exceeded maximum explosions of {0}")]
    TooManyExplosions(usize),
    #[error("exceeded maximum recursion depth of {0}")]
    TooDeep(usize),
    #[error("expression has more than {0} nodes")]
    TooComplex(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiceError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{error}")]
    Semantic {
        error: SemanticError,
        position: Option<usize>,
    },
    #[error("{error}")]
    Limit {
        error: LimitError,
        position: Option<usize>,
    },
    #[error(transparent)]
    Runtime(#[from] RollError),
}

/// The externally visible error category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    ParseError,
    SemanticError,
    LimitError,
    RuntimeError,
}

impl DiceError {
    pub(crate) fn semantic(error: SemanticError, position: usize) -> Self {
        Self::Semantic {
            error,
            position: Some(position),
        }
    }

    pub(crate) fn limit(error: LimitError, position: usize) -> Self {
        Self::Limit {
            error,
            position: Some(position),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::ParseError,
            Self::Semantic { .. } => ErrorKind::SemanticError,
            Self::Limit { .. } => ErrorKind::LimitError,
            Self::Runtime(_) => ErrorKind::RuntimeError,
        }
    }

    /// Byte offset into the input the error is tied to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse(e) => Some(e.position),
            Self::Semantic { position, .. } | Self::Limit { position, .. } => *position,
            Self::Runtime(_) => None,
        }
    }
}

impl From<SemanticError> for DiceError {
    fn from(error: SemanticError) -> Self {
        Self::Semantic {
            error,
            position: None,
        }
    }
}

impl From<LimitError> for DiceError {
    fn from(error: LimitError) -> Self {
        Self::Limit {
            error,
            position: None,
        }
    }
}
