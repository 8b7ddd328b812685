use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} (at position {position})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("empty expression")]
    EmptyExpression,
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected token {found:?}")]
    UnexpectedToken { found: String },
    #[error("unrecognized character {found:?}")]
    UnexpectedCharacter { found: String },
    #[error("unexpected token {found:?} after expression")]
    TrailingToken { found: String },
    #[error("expected number after {after:?}")]
    MissingNumber { after: String },
    #[error("number {text:?} is too large")]
    InvalidNumber { text: String },
    #[error("expected ')' to close '('")]
    UnclosedParen,
    #[error("{modifier} modifier given more than once")]
    DuplicateModifier { modifier: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message() {
        let err = ParseError::new(
            ParseErrorKind::MissingNumber {
                after: "kh".to_string(),
            },
            5,
        );
        assert_eq!(err.to_string(), r#"expected number after "kh" (at position 5)"#);
    }
}
