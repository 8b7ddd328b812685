use super::{ast::*, error::*, lexer::*};
use crate::common::*;
use crate::error::{DiceError, LimitError, SemanticError};
use crate::limits::Limits;

type PResult<T = Node> = Result<T, DiceError>;

/// Recursive-descent parser over a token stream.
///
/// ```text
/// expression := term (('+'|'-') term)*
/// term       := factor (('*'|'/') factor)*
/// factor     := '-' factor | '(' expression ')' | primary
/// primary    := diceTerm | integer
/// diceTerm   := [integer] diceMarker modifiers?
/// modifiers  := (reroll | explode | keepDrop | sort)* comparator?
/// ```
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    cursor: usize,
    depth: usize,
    nodes: usize,
    limits: Limits,
}

impl<'a> Parser<'a> {
    const ADDITION_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const MULTIPLICATION_OPS: &'static [TokenKind] = &[TokenKind::Star, TokenKind::Slash];

    pub fn new(input: &'a str, limits: Limits) -> Self {
        Self {
            input,
            tokens: tokenize(input),
            cursor: 0,
            depth: 0,
            nodes: 0,
            limits,
        }
    }

    pub fn parse(mut self) -> PResult {
        if self.tokens.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyExpression, 0).into());
        }

        let node = self.parse_expression()?;

        match self.peek() {
            Some(token) => self.error_at(
                token,
                ParseErrorKind::TrailingToken {
                    found: token.text.to_string(),
                },
            ),
            None => Ok(node),
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.cursor).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.cursor + n).copied()
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.cursor += 1;
        Some(token)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |peeked| peeked.kind == kind)
    }

    fn matches_any(&self, options: &[TokenKind]) -> bool {
        self.peek()
            .map_or(false, |peeked| options.contains(&peeked.kind))
    }

    fn end_position(&self) -> usize {
        self.input.len()
    }

    fn error_at<T>(&self, token: Token<'a>, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError::new(kind, token.position).into())
    }

    /// Reports whatever sits at the cursor when something else was required.
    fn unexpected<T>(&self, expected: &'static str) -> PResult<T> {
        match self.peek() {
            None => Err(ParseError::new(
                ParseErrorKind::UnexpectedEnd { expected },
                self.end_position(),
            )
            .into()),
            Some(token) if token.kind == TokenKind::Error => self.error_at(
                token,
                ParseErrorKind::UnexpectedCharacter {
                    found: token.text.to_string(),
                },
            ),
            Some(token) => self.error_at(
                token,
                ParseErrorKind::UnexpectedToken {
                    found: token.text.to_string(),
                },
            ),
        }
    }

    /// Counts a freshly built node against the expression budget.
    fn node(&mut self, node: Node, position: usize) -> PResult {
        self.nodes += 1;
        if self.nodes > self.limits.max_nodes {
            Err(DiceError::limit(
                LimitError::TooComplex(self.limits.max_nodes),
                position,
            ))
        } else {
            Ok(node)
        }
    }

    fn parse_expression(&mut self) -> PResult {
        let mut lhs = self.parse_term()?;

        while self.matches_any(Self::ADDITION_OPS) {
            let token = self.advance();
            let op = match token.map(|t| t.kind) {
                Some(TokenKind::Minus) => BinaryOperator::Sub,
                _ => BinaryOperator::Add,
            };
            let rhs = self.parse_term()?;

            let position = token.map_or(0, |t| t.position);
            lhs = self.node(Node::new_binary(op, lhs, rhs), position)?;
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> PResult {
        let mut lhs = self.parse_factor()?;

        while self.matches_any(Self::MULTIPLICATION_OPS) {
            let token = self.advance();
            let op = match token.map(|t| t.kind) {
                Some(TokenKind::Slash) => BinaryOperator::Div,
                _ => BinaryOperator::Mul,
            };
            let rhs = self.parse_factor()?;

            let position = token.map_or(0, |t| t.position);
            lhs = self.node(Node::new_binary(op, lhs, rhs), position)?;
        }

        Ok(lhs)
    }

    fn parse_factor(&mut self) -> PResult {
        // Prefix negations are collected in a loop so long chains cannot grow the stack.
        let mut negations = Vec::new();
        while self.matches(TokenKind::Minus) {
            if let Some(token) = self.advance() {
                negations.push(token.position);
            }
        }

        let mut node = if self.matches(TokenKind::LeftParen) {
            self.parse_parens()?
        } else {
            self.parse_primary()?
        };

        for position in negations.into_iter().rev() {
            node = self.node(Node::new_unary(UnaryOperator::Neg, node), position)?;
        }

        Ok(node)
    }

    fn parse_parens(&mut self) -> PResult {
        let open = match self.advance() {
            Some(token) => token,
            None => return self.unexpected("'('"),
        };

        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(DiceError::limit(
                LimitError::TooDeep(self.limits.max_depth),
                open.position,
            ));
        }

        let node = self.parse_expression()?;

        if self.matches(TokenKind::RightParen) {
            self.advance();
        } else {
            let position = self.peek().map_or(self.end_position(), |t| t.position);
            return Err(ParseError::new(ParseErrorKind::UnclosedParen, position).into());
        }

        self.depth -= 1;
        Ok(node)
    }

    fn parse_primary(&mut self) -> PResult {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Integer) => {
                if self.peek_nth(1).map(|t| t.kind) == Some(TokenKind::Dice) {
                    self.parse_dice()
                } else {
                    self.parse_integer()
                }
            }
            Some(TokenKind::Dice) => self.parse_dice(),
            _ => self.unexpected("a number or dice"),
        }
    }

    fn parse_integer(&mut self) -> PResult {
        let token = match self.advance() {
            Some(token) => token,
            None => return self.unexpected("<integer>"),
        };
        let x = self.int_value(token)?;
        self.node(Node::Number(x), token.position)
    }

    fn int_value(&self, token: Token<'a>) -> PResult<Int> {
        token.text.parse().or_else(|_| {
            self.error_at(
                token,
                ParseErrorKind::InvalidNumber {
                    text: token.text.to_string(),
                },
            )
        })
    }

    fn parse_dice(&mut self) -> PResult {
        let count_token = if self.matches(TokenKind::Integer) {
            self.advance()
        } else {
            None
        };
        let dice_token = match self.advance() {
            Some(token) if token.kind == TokenKind::Dice => token,
            _ => return self.unexpected("<dice>"),
        };
        let position = count_token.unwrap_or(dice_token).position;

        // Counts and sides too large for the integer type are past any limit anyway.
        let count = count_token.map_or(1, |t| t.text.parse::<u64>().unwrap_or(u64::MAX));
        let face = dice_token.text[1..].to_ascii_lowercase();
        let sides = match face.as_str() {
            "%" | "00" => 100,
            "f" => 3,
            digits => digits.parse::<u64>().unwrap_or(u64::MAX),
        };

        if count > self.limits.max_dice {
            return Err(DiceError::limit(
                LimitError::TooManyDice(self.limits.max_dice),
                position,
            ));
        }
        if sides > self.limits.max_sides {
            return Err(DiceError::limit(
                LimitError::TooManySides(self.limits.max_sides),
                position,
            ));
        }
        let count = match usize::try_from(count) {
            Ok(0) => return Err(DiceError::semantic(SemanticError::NoDice, position)),
            Ok(x) => x,
            Err(_) => {
                return Err(DiceError::limit(
                    LimitError::TooManyDice(self.limits.max_dice),
                    position,
                ))
            }
        };
        let die = match face.as_str() {
            "%" | "00" => Die::Percentile,
            "f" => Die::Fate,
            _ => match NonZeroUInt::new(sides) {
                Some(x) => Die::Standard(x),
                None => return Err(DiceError::semantic(SemanticError::NoSides, position)),
            },
        };

        let modifiers = self.parse_modifiers()?;
        let term = DiceTerm {
            count,
            die,
            modifiers,
            position,
        };
        self.node(Node::Dice(term), position)
    }

    fn parse_modifiers(&mut self) -> PResult<DiceModifiers> {
        let mut mods = DiceModifiers::default();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Reroll | TokenKind::RerollOnce => {
                    self.reject_duplicate(token, mods.reroll.is_some(), "reroll")?;
                    self.advance();
                    let condition = self
                        .parse_condition()?
                        .unwrap_or_else(|| Condition::new(Comparator::Eq, 1));
                    mods.reroll = Some(Reroll {
                        once: token.kind == TokenKind::RerollOnce,
                        condition,
                    });
                }
                TokenKind::Explode | TokenKind::ExplodeCompound | TokenKind::ExplodePenetrating => {
                    self.reject_duplicate(token, mods.explode.is_some(), "explode")?;
                    self.advance();
                    let (op, target) = match self.parse_condition()? {
                        Some(c) => (c.op, Target::Value(c.value)),
                        None => (Comparator::Ge, Target::Max),
                    };
                    mods.explode = Some(Explode {
                        penetrating: token.kind == TokenKind::ExplodePenetrating,
                        compound: token.kind == TokenKind::ExplodeCompound,
                        op,
                        target,
                    });
                }
                TokenKind::KeepHighest
                | TokenKind::KeepLowest
                | TokenKind::DropHighest
                | TokenKind::DropLowest => {
                    self.reject_duplicate(token, mods.keep.is_some(), "keep/drop")?;
                    self.advance();
                    let mode = match token.kind {
                        TokenKind::KeepHighest => KeepMode::KeepHighest,
                        TokenKind::KeepLowest => KeepMode::KeepLowest,
                        TokenKind::DropHighest => KeepMode::DropHighest,
                        _ => KeepMode::DropLowest,
                    };
                    let number = self.expect_number(token)?;
                    let count = number.text.parse().or_else(|_| {
                        self.error_at(
                            number,
                            ParseErrorKind::InvalidNumber {
                                text: number.text.to_string(),
                            },
                        )
                    })?;
                    mods.keep = Some(KeepDrop { mode, count });
                }
                TokenKind::SortAscending | TokenKind::SortDescending => {
                    self.reject_duplicate(token, mods.sort.is_some(), "sort")?;
                    self.advance();
                    mods.sort = Some(match token.kind {
                        TokenKind::SortAscending => SortOrder::Ascending,
                        _ => SortOrder::Descending,
                    });
                }
                kind => {
                    if let Some(op) = kind.as_comparator() {
                        self.advance();
                        let number = self.expect_number(token)?;
                        mods.success = Some(Condition::new(op, self.int_value(number)?));
                    }
                    // A success comparator ends the term; anything else belongs to the caller.
                    break;
                }
            }
        }

        Ok(mods)
    }

    fn reject_duplicate(&self, token: Token<'a>, seen: bool, modifier: &'static str) -> PResult<()> {
        if seen {
            self.error_at(token, ParseErrorKind::DuplicateModifier { modifier })
        } else {
            Ok(())
        }
    }

    /// Consumes the integer that must follow `after`.
    fn expect_number(&mut self, after: Token<'a>) -> PResult<Token<'a>> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Integer => {
                self.advance();
                Ok(token)
            }
            other => {
                let position = other.map_or(self.end_position(), |t| t.position);
                Err(ParseError::new(
                    ParseErrorKind::MissingNumber {
                        after: after.text.to_string(),
                    },
                    position,
                )
                .into())
            }
        }
    }

    /// Parses an optional `[comparator] integer` condition; a bare integer means `=`.
    fn parse_condition(&mut self) -> PResult<Option<Condition>> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Ok(None),
        };

        if let Some(op) = token.kind.as_comparator() {
            self.advance();
            let number = self.expect_number(token)?;
            Ok(Some(Condition::new(op, self.int_value(number)?)))
        } else if token.kind == TokenKind::Integer {
            self.advance();
            Ok(Some(Condition::new(Comparator::Eq, self.int_value(token)?)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(s: &str) -> PResult {
        Parser::new(s, Limits::default()).parse()
    }

    fn dice(s: &str) -> DiceTerm {
        match parse(s).unwrap() {
            Node::Dice(term) => term,
            other => panic!("expected dice term, found {:?}", other),
        }
    }

    fn d(sides: u64) -> Die {
        Die::Standard(NonZeroUInt::new(sides).unwrap())
    }

    fn check(s: &str, expected: &str) {
        assert_eq!(parse(s).unwrap().to_string(), expected);
    }

    fn check_err(s: &str, kind: ErrorKind, position: Option<usize>) {
        let err = parse(s).unwrap_err();
        assert_eq!(err.kind(), kind, "{}: {}", s, err);
        assert_eq!(err.position(), position, "{}: {}", s, err);
    }

    #[test]
    fn test_parse_nums() {
        assert_eq!(parse("32").unwrap(), Node::Number(32));
        assert_eq!(
            parse("-2").unwrap(),
            Node::new_unary(UnaryOperator::Neg, Node::Number(2))
        );
        check("--2", "--2");
    }

    #[test]
    fn test_parse_dice() {
        let term = dice("1d20");
        assert_eq!((term.count, term.die), (1, d(20)));
        let term = dice("d4");
        assert_eq!((term.count, term.die), (1, d(4)));
        assert_eq!(dice("2d%").die, Die::Percentile);
        assert_eq!(dice("d00").die, Die::Percentile);
        assert_eq!(dice("4dF").die, Die::Fate);
        assert_eq!(dice("4df").die, Die::Fate);

        let term = dice("3 d6");
        assert_eq!((term.count, term.die), (3, d(6)));
        assert_eq!(dice(" 12d6").position, 1);
    }

    #[test]
    fn test_parse_modifiers() {
        let mods = dice("4d6kh3").modifiers;
        assert_eq!(
            mods.keep,
            Some(KeepDrop {
                mode: KeepMode::KeepHighest,
                count: 3
            })
        );

        let mods = dice("8d6ro<3dl2sd").modifiers;
        assert_eq!(
            mods.reroll,
            Some(Reroll {
                once: true,
                condition: Condition::new(Comparator::Lt, 3)
            })
        );
        assert_eq!(mods.keep.map(|k| k.mode), Some(KeepMode::DropLowest));
        assert_eq!(mods.sort, Some(SortOrder::Descending));

        let mods = dice("4d6r").modifiers;
        assert_eq!(
            mods.reroll.map(|r| r.condition),
            Some(Condition::new(Comparator::Eq, 1))
        );

        let mods = dice("3d6!").modifiers;
        let explode = mods.explode.unwrap();
        assert_eq!((explode.op, explode.target), (Comparator::Ge, Target::Max));
        assert!(!explode.compound && !explode.penetrating);

        let explode = dice("3d6!!5").modifiers.explode.unwrap();
        assert_eq!((explode.op, explode.target), (Comparator::Eq, Target::Value(5)));
        assert!(explode.compound);

        let explode = dice("2d6!p>=5").modifiers.explode.unwrap();
        assert_eq!((explode.op, explode.target), (Comparator::Ge, Target::Value(5)));
        assert!(explode.penetrating);
    }

    #[test]
    fn test_parse_success() {
        let mods = dice("10d10>=7").modifiers;
        assert_eq!(mods.success, Some(Condition::new(Comparator::Ge, 7)));

        let mods = dice("10d10kh5>7").modifiers;
        assert_eq!(mods.success, Some(Condition::new(Comparator::Gt, 7)));
        assert!(mods.keep.is_some());

        check("2d6=6+1", "(2d6=6 + 1)");
    }

    #[test]
    fn test_comparator_ends_modifiers() {
        check_err("10d10>=7!", ErrorKind::ParseError, Some(8));
    }

    #[test]
    fn test_parse_binary() {
        check("1 + 2 * 3", "(1 + (2 * 3))");
        check("2d1+3d1*2", "(2d1 + (3d1 * 2))");
        check("(2d1+1)*(3d1-1)", "((2d1 + 1) * (3d1 - 1))");
        check("8 - 2 - 1", "((8 - 2) - 1)");
        check("8 / 2 / 2", "((8 / 2) / 2)");
        check("-1d6", "-1d6");
        check("4dF + 2 # skill", "(4dF + 2)");
    }

    #[test]
    fn test_parse_errors() {
        check_err("", ErrorKind::ParseError, Some(0));
        check_err("   # nothing", ErrorKind::ParseError, Some(0));
        check_err("invalid", ErrorKind::ParseError, Some(0));
        check_err("4d6kh", ErrorKind::ParseError, Some(5));
        check_err("4d6kh+1", ErrorKind::ParseError, Some(5));
        check_err("3d6+", ErrorKind::ParseError, Some(4));
        check_err("(2d6+3", ErrorKind::ParseError, Some(6));
        check_err("()", ErrorKind::ParseError, Some(1));
        check_err("d", ErrorKind::ParseError, Some(0));
        check_err("2 3", ErrorKind::ParseError, Some(2));
        check_err("1d6>=", ErrorKind::ParseError, Some(5));
        check_err("1d6r>", ErrorKind::ParseError, Some(5));
        check_err("4d6kh1kl1", ErrorKind::ParseError, Some(6));
        check_err("99999999999999999999", ErrorKind::ParseError, Some(0));
    }

    #[test]
    fn test_parse_dice_validation() {
        check_err("0d6", ErrorKind::SemanticError, Some(0));
        check_err("1d0", ErrorKind::SemanticError, Some(0));
        check_err("10000d6", ErrorKind::LimitError, Some(0));
        check_err("1d9999999999", ErrorKind::LimitError, Some(0));
        check_err("2 + 1d99999999999999999999999", ErrorKind::LimitError, Some(4));
        check_err("10000d0", ErrorKind::LimitError, Some(0));
    }

    #[test]
    fn test_depth_limit() {
        let ok = format!("{}1{}", "(".repeat(32), ")".repeat(32));
        assert!(parse(&ok).is_ok());

        let deep = format!("{}1{}", "(".repeat(33), ")".repeat(33));
        check_err(&deep, ErrorKind::LimitError, Some(32));

        let pathological = "(".repeat(5000);
        check_err(&pathological, ErrorKind::LimitError, Some(32));
    }

    #[test]
    fn test_node_limit() {
        let long = vec!["1"; 2000].join("+");
        let err = parse(&long).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitError);

        let negations = format!("{}1", "-".repeat(5000));
        let err = parse(&negations).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitError);
    }
}
