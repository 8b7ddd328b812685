use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("secure random source failed: {0}")]
    Entropy(String),
}

impl From<rand::Error> for RollError {
    fn from(e: rand::Error) -> Self {
        Self::Entropy(e.to_string())
    }
}
