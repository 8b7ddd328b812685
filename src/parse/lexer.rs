use crate::common::Comparator;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"d([0-9]+|%|f)")]
    Dice,

    #[token("kh")]
    KeepHighest,
    #[token("kl")]
    KeepLowest,
    #[token("dh")]
    DropHighest,
    #[token("dl")]
    DropLowest,

    #[token("r")]
    Reroll,
    #[token("ro")]
    RerollOnce,
    #[token("!")]
    Explode,
    #[token("!!")]
    ExplodeCompound,
    #[token("!p")]
    ExplodePenetrating,

    #[token("sa")]
    SortAscending,
    #[token("sd")]
    SortDescending,

    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("=")]
    Equal,
    #[token(">")]
    GreaterThan,
    #[token("<")]
    LessThan,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[regex(r"#[^\n]*", logos::skip)]
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub const COMPARATORS: &'static [Self] = &[
        Self::GreaterEqual,
        Self::LessEqual,
        Self::Equal,
        Self::GreaterThan,
        Self::LessThan,
    ];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Dice => "<dice>",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            DropHighest => "'dh'",
            DropLowest => "'dl'",
            Reroll => "'r'",
            RerollOnce => "'ro'",
            Explode => "'!'",
            ExplodeCompound => "'!!'",
            ExplodePenetrating => "'!p'",
            SortAscending => "'sa'",
            SortDescending => "'sd'",
            GreaterEqual => "'>='",
            LessEqual => "'<='",
            Equal => "'='",
            GreaterThan => "'>'",
            LessThan => "'<'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            LeftParen => "'('",
            RightParen => "')'",
            Error => "<error>",
        }
    }

    pub fn as_comparator(&self) -> Option<Comparator> {
        Some(match self {
            Self::GreaterEqual => Comparator::Ge,
            Self::LessEqual => Comparator::Le,
            Self::Equal => Comparator::Eq,
            Self::GreaterThan => Comparator::Gt,
            Self::LessThan => Comparator::Lt,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexeme together with its original text and byte offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: usize,
}

/// Splits `text` into tokens, dropping whitespace and `#` comments.
///
/// Never fails: characters that match nothing come out as [`TokenKind::Error`]
/// and are reported by the parser. Matching is case-insensitive; offsets and
/// token text refer to the untouched input.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    // ASCII lowercasing keeps every byte offset intact.
    let lowered = text.to_ascii_lowercase();
    TokenKind::lexer(&lowered)
        .spanned()
        .map(|(kind, span)| Token {
            kind,
            text: text.get(span.clone()).unwrap_or(""),
            position: span.start,
        })
        .collect()
}
