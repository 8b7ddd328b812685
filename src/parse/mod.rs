pub mod ast;
mod error;
mod lexer;
mod parser;
pub mod visit;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::Parser;

use crate::error::DiceError;
use crate::limits::Limits;

/// Parses `s` into an expression tree, enforcing the grammar and the parse-time limits.
pub fn parse(s: &str, limits: Limits) -> Result<ast::Node, DiceError> {
    Parser::new(s, limits).parse()
}
