use super::{num::Number, ops, roller::Roller, trace::*, RResult, RollError};
use crate::common::*;
use crate::limits::Limits;
use crate::parse::{
    ast::{self, Die},
    visit::{Accept, AstVisitor},
};

/// Walks an expression tree, rolling each dice term and recording its trace.
pub struct RollContext<R> {
    limits: Limits,
    roller: R,
    traces: Vec<DiceTrace>,
}

impl<R: Roller> RollContext<R> {
    pub fn new(limits: Limits, roller: R) -> Self {
        Self {
            limits,
            roller,
            traces: Vec::new(),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Traces of every dice term evaluated so far, in evaluation order.
    pub fn traces(&self) -> &[DiceTrace] {
        &self.traces
    }

    pub fn into_traces(self) -> Vec<DiceTrace> {
        self.traces
    }

    pub fn eval(&mut self, node: &ast::Node) -> RResult<Number> {
        node.accept(self)
    }

    /// Draws one face of `die`; FATE dice map `1..=3` onto `-1..=1`.
    pub(crate) fn roll_face(&mut self, die: Die) -> RResult<Int> {
        let face = self.roller.roll(die.sides())?;
        let face = Int::try_from(face).map_err(|_| RollError::Overflow)?;
        Ok(match die {
            Die::Fate => face - 2,
            _ => face,
        })
    }

    fn roll_term(&mut self, term: &ast::DiceTerm) -> RResult<(Number, DiceTrace)> {
        let mods = &term.modifiers;

        let mut rolls = Vec::with_capacity(term.count);
        for _ in 0..term.count {
            rolls.push(DieRoll::new(self.roll_face(term.die)?));
        }
        log::trace!(
            "{}: rolled {:?}",
            term,
            rolls.iter().map(|r| r.value).collect::<Vec<_>>()
        );

        if let Some(reroll) = &mods.reroll {
            reroll.operate(self, term, &mut rolls)?;
        }
        if let Some(explode) = &mods.explode {
            explode.operate(self, term, &mut rolls)?;
        }
        let kept_values = match &mods.keep {
            Some(keep) => Some(keep.operate(term, &mut rolls)?),
            None => None,
        };
        if let Some(order) = mods.sort {
            order.operate(&mut rolls);
        }

        let (value, sum, threshold, successes) = match &mods.success {
            Some(condition) => {
                let successes = condition.count_successes(&mut rolls);
                let count = Int::try_from(successes).map_err(|_| RollError::Overflow)?;
                let threshold = format!("{}{}", condition.op, condition.value);
                (count, None, Some(threshold), Some(successes))
            }
            None => {
                let sum = ops::sum(term.die, &rolls, kept_values.as_deref())?;
                (sum, Some(sum), None, None)
            }
        };

        let trace = DiceTrace {
            term: term.to_string(),
            rolls,
            kept_values,
            sum,
            threshold,
            successes,
        };
        Ok((Number::Int(value), trace))
    }
}

impl<R: Roller> AstVisitor for RollContext<R> {
    type Output = RResult<Number>;

    fn visit_number(&mut self, x: Int) -> Self::Output {
        Ok(Number::Int(x))
    }

    fn visit_dice(&mut self, term: &ast::DiceTerm) -> Self::Output {
        let (value, trace) = self.roll_term(term)?;
        log::debug!("{} = {}", trace.term, value);
        self.traces.push(trace);
        Ok(value)
    }

    fn visit_unary(&mut self, op: UnaryOperator, operand: &ast::Node) -> Self::Output {
        let value = operand.accept(self)?;
        match op {
            UnaryOperator::Neg => Ok(value.checked_neg()?),
        }
    }

    fn visit_binary(&mut self, l: &ast::Node, op: BinaryOperator, r: &ast::Node) -> Self::Output {
        let left = l.accept(self)?;
        let right = r.accept(self)?;
        let value = match op {
            BinaryOperator::Add => left.checked_add(right),
            BinaryOperator::Sub => left.checked_sub(right),
            BinaryOperator::Mul => left.checked_mul(right),
            BinaryOperator::Div => left.checked_div(right),
        }?;
        Ok(value)
    }
}
