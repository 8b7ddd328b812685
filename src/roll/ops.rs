use super::{ctx::RollContext, roller::Roller, trace::*, RResult, RollError};
use crate::common::*;
use crate::error::{DiceError, LimitError, SemanticError};
use crate::parse::ast::*;
use std::cmp::Reverse;

impl Reroll {
    /// Replaces every die matching the condition, keeping the old values as history.
    pub(super) fn operate<R: Roller>(
        &self,
        ctx: &mut RollContext<R>,
        term: &DiceTerm,
        rolls: &mut [DieRoll],
    ) -> RResult<()> {
        let max = ctx.limits().max_rerolls;

        for roll in rolls.iter_mut() {
            let mut count = 0;
            while count < max && self.condition.test(roll.value) {
                let fresh = ctx.roll_face(term.die)?;
                log::trace!("{}: reroll {} -> {}", term, roll.value, fresh);
                let old = std::mem::replace(&mut roll.value, fresh);
                roll.rerolls.push(old);
                count += 1;

                if self.once {
                    break;
                }
            }

            if !self.once && count >= max {
                return Err(DiceError::limit(
                    LimitError::TooManyRerolls(max),
                    term.position,
                ));
            }
        }

        Ok(())
    }
}

impl Explode {
    /// Chains extra dice off every die whose latest value meets the threshold.
    pub(super) fn operate<R: Roller>(
        &self,
        ctx: &mut RollContext<R>,
        term: &DiceTerm,
        rolls: &mut [DieRoll],
    ) -> RResult<()> {
        let condition = self.resolve(term.die);
        let max = ctx.limits().max_explosions;

        for roll in rolls.iter_mut() {
            let mut current = roll.value;
            let mut count = 0;
            while count < max && condition.test(current) {
                let mut value = ctx.roll_face(term.die)?;
                if self.penetrating && value > 0 {
                    value -= 1;
                }
                log::trace!("{}: explode {} -> {}", term, current, value);
                roll.explodes.push(Explosion { value });
                current = value;
                count += 1;
            }

            if count >= max {
                return Err(DiceError::limit(
                    LimitError::TooManyExplosions(max),
                    term.position,
                ));
            }
        }

        Ok(())
    }
}

impl KeepDrop {
    /// Marks the selected dice as kept and returns their totals, highest first.
    pub(super) fn operate(&self, term: &DiceTerm, rolls: &mut [DieRoll]) -> RResult<Vec<Int>> {
        let available = rolls.len();
        if self.count > available {
            return Err(DiceError::semantic(
                SemanticError::SelectTooMany {
                    count: self.count,
                    available,
                },
                term.position,
            ));
        }

        let mut order: Vec<usize> = (0..available).collect();
        order.sort_by_key(|&i| Reverse(rolls[i].total()));

        let selected = match self.mode {
            KeepMode::KeepHighest => &order[..self.count],
            KeepMode::KeepLowest => &order[available - self.count..],
            KeepMode::DropHighest => &order[self.count..],
            KeepMode::DropLowest => &order[..available - self.count],
        };

        for roll in rolls.iter_mut() {
            roll.kept = false;
        }
        for &i in selected {
            rolls[i].kept = true;
        }

        Ok(selected.iter().map(|&i| rolls[i].total()).collect())
    }
}

impl SortOrder {
    /// Reorders the displayed dice by value; totals are unaffected.
    pub(super) fn operate(self, rolls: &mut [DieRoll]) {
        match self {
            Self::Ascending => rolls.sort_by_key(|r| r.value),
            Self::Descending => rolls.sort_by_key(|r| Reverse(r.value)),
        }
    }
}

impl Condition {
    /// Flags every kept die and returns how many succeeded.
    pub(super) fn count_successes(&self, rolls: &mut [DieRoll]) -> usize {
        let mut successes = 0;
        for roll in rolls.iter_mut().filter(|r| r.kept) {
            let hit = self.test(roll.total());
            roll.success = Some(hit);
            if hit {
                successes += 1;
            }
        }
        successes
    }
}

/// Sums kept totals, or raw values when nothing was kept or dropped.
///
/// Without keep/drop only FATE dice fold their explosions into the sum.
pub(super) fn sum(die: Die, rolls: &[DieRoll], kept: Option<&[Int]>) -> RResult<Int> {
    let total = match kept {
        Some(values) => checked_sum(values.iter().copied()),
        None if die == Die::Fate => checked_sum(
            rolls
                .iter()
                .flat_map(|r| std::iter::once(r.value).chain(r.explodes.iter().map(|e| e.value))),
        ),
        None => checked_sum(rolls.iter().map(|r| r.value)),
    };
    Ok(total?)
}

fn checked_sum(mut values: impl Iterator<Item = Int>) -> Result<Int, RollError> {
    values.try_fold(0, |acc: Int, x| acc.checked_add(x).ok_or(RollError::Overflow))
}
