use crate::common::*;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(Int),
    Unary(UnaryOperator, Box<Node>),
    Binary(Box<Node>, BinaryOperator, Box<Node>),
    Dice(DiceTerm),
}

impl Node {
    pub fn new_unary(op: UnaryOperator, operand: Node) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    pub fn new_binary(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Self::Binary(Box::new(lhs), op, Box::new(rhs))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{}", x),
            Self::Unary(op, x) => write!(f, "{}{}", op, x),
            Self::Binary(l, op, r) => write!(f, "({} {} {})", l, op, r),
            Self::Dice(d) => fmt::Display::fmt(d, f),
        }
    }
}

const PERCENTILE_SIDES: NonZeroUInt = match NonZeroUInt::new(100) {
    Some(x) => x,
    None => unreachable!(),
};

const FATE_SIDES: NonZeroUInt = match NonZeroUInt::new(3) {
    Some(x) => x,
    None => unreachable!(),
};

/// The kind of die a term rolls.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Die {
    Standard(NonZeroUInt),
    /// `d%` or `d00`.
    Percentile,
    /// `dF`: faces -1, 0 and +1.
    Fate,
}

impl Die {
    /// Number of faces drawn from the die source.
    pub fn sides(self) -> NonZeroUInt {
        match self {
            Self::Standard(x) => x,
            Self::Percentile => PERCENTILE_SIDES,
            Self::Fate => FATE_SIDES,
        }
    }

    /// Highest face value, the default explosion threshold.
    pub fn max_face(self) -> Int {
        match self {
            Self::Fate => 1,
            _ => self.sides().get() as Int,
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(x) => fmt::Display::fmt(x, f),
            Self::Percentile => f.write_char('%'),
            Self::Fate => f.write_char('F'),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceTerm {
    pub count: usize,
    pub die: Die,
    pub modifiers: DiceModifiers,
    /// Byte offset of the term in the input.
    pub position: usize,
}

impl DiceTerm {
    pub fn new(count: usize, die: Die) -> Self {
        Self {
            count,
            die,
            modifiers: DiceModifiers::default(),
            position: 0,
        }
    }

    pub fn with_modifiers(mut self, modifiers: DiceModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Renders the canonical term string used in traces, e.g. `4d6ro1kh3` or `10d10>=7`.
impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.die)?;
        let mods = &self.modifiers;
        if let Some(reroll) = &mods.reroll {
            write!(f, "{}", reroll)?;
        }
        if let Some(explode) = &mods.explode {
            write!(f, "{}", explode)?;
        }
        if let Some(keep) = &mods.keep {
            write!(f, "{}", keep)?;
        }
        if let Some(success) = &mods.success {
            write!(f, "{}{}", success.op, success.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DiceModifiers {
    pub reroll: Option<Reroll>,
    pub explode: Option<Explode>,
    pub keep: Option<KeepDrop>,
    pub sort: Option<SortOrder>,
    pub success: Option<Condition>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Condition {
    pub op: Comparator,
    pub value: Int,
}

impl Condition {
    pub fn new(op: Comparator, value: Int) -> Self {
        Self { op, value }
    }

    pub fn test(&self, value: Int) -> bool {
        self.op.test(value, self.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Comparator::Eq => write!(f, "{}", self.value),
            op => write!(f, "{}{}", op, self.value),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Reroll {
    pub once: bool,
    pub condition: Condition,
}

impl fmt::Display for Reroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('r')?;
        if self.once {
            f.write_char('o')?;
        }
        write!(f, "{}", self.condition)
    }
}

/// Threshold an explosion compares against; `Max` resolves to the die's highest face.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Target {
    Max,
    Value(Int),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Explode {
    pub penetrating: bool,
    pub compound: bool,
    pub op: Comparator,
    pub target: Target,
}

impl Explode {
    pub fn resolve(&self, die: Die) -> Condition {
        let value = match self.target {
            Target::Max => die.max_face(),
            Target::Value(x) => x,
        };
        Condition::new(self.op, value)
    }
}

impl fmt::Display for Explode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('!')?;
        if self.compound {
            f.write_char('!')?;
        }
        if self.penetrating {
            f.write_char('p')?;
        }
        match self.target {
            Target::Max => Ok(()),
            Target::Value(x) => write!(f, "{}", Condition::new(self.op, x)),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeepMode {
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
}

impl KeepMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepHighest => "kh",
            Self::KeepLowest => "kl",
            Self::DropHighest => "dh",
            Self::DropLowest => "dl",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepDrop {
    pub mode: KeepMode,
    pub count: usize,
}

impl fmt::Display for KeepDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode.as_str(), self.count)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(sides: u64) -> Die {
        Die::Standard(NonZeroUInt::new(sides).unwrap())
    }

    #[test]
    fn test_term_display() {
        let term = DiceTerm::new(4, d(6)).with_modifiers(DiceModifiers {
            reroll: Some(Reroll {
                once: true,
                condition: Condition::new(Comparator::Eq, 1),
            }),
            keep: Some(KeepDrop {
                mode: KeepMode::KeepHighest,
                count: 3,
            }),
            sort: Some(SortOrder::Descending),
            ..Default::default()
        });
        assert_eq!(term.to_string(), "4d6ro1kh3");

        let term = DiceTerm::new(10, d(10)).with_modifiers(DiceModifiers {
            explode: Some(Explode {
                penetrating: false,
                compound: true,
                op: Comparator::Ge,
                target: Target::Max,
            }),
            success: Some(Condition::new(Comparator::Ge, 7)),
            ..Default::default()
        });
        assert_eq!(term.to_string(), "10d10!!>=7");

        assert_eq!(DiceTerm::new(1, Die::Percentile).to_string(), "1d%");
        assert_eq!(DiceTerm::new(4, Die::Fate).to_string(), "4dF");
    }

    #[test]
    fn test_explode_resolve() {
        let explode = Explode {
            penetrating: true,
            compound: false,
            op: Comparator::Ge,
            target: Target::Max,
        };
        assert_eq!(explode.resolve(d(8)), Condition::new(Comparator::Ge, 8));
        assert_eq!(explode.resolve(Die::Fate), Condition::new(Comparator::Ge, 1));
        assert_eq!(explode.resolve(Die::Percentile), Condition::new(Comparator::Ge, 100));
        assert_eq!(explode.to_string(), "!p");
    }
}
