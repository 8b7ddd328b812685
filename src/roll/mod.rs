mod ctx;
mod error;
mod num;
mod ops;
mod roller;
mod trace;

use crate::error::DiceError;
use crate::limits::Limits;
use crate::parse::ast;

pub(crate) type RResult<T> = Result<T, DiceError>;

pub use ctx::RollContext;
pub use error::RollError;
pub use num::Number;
pub use roller::{Roller, SecureRoller};
pub use trace::{DiceTrace, DieRoll, Explosion};

#[cfg(test)]
pub(crate) use roller::{ScriptedRoller, StepRoller};

/// Evaluates a parsed expression, returning its value and one trace per dice term.
pub fn eval<R: Roller>(expr: &ast::Node, limits: Limits, roller: R) -> RResult<(Number, Vec<DiceTrace>)> {
    let mut ctx = RollContext::new(limits, roller);
    let value = ctx.eval(expr)?.normalize();
    Ok((value, ctx.into_traces()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use proptest::prelude::*;

    fn roll(s: &str, faces: &[u64]) -> (Number, Vec<DiceTrace>) {
        let limits = Limits::default();
        let ast = parse(s, limits).unwrap();
        eval(&ast, limits, ScriptedRoller::new(faces.iter().copied())).unwrap()
    }

    #[test]
    fn test_eval_normalizes() {
        let (value, _) = roll("7 / 2 * 2", &[]);
        assert!(matches!(value, Number::Int(7)));
        let (value, _) = roll("1d6 / 4", &[6]);
        assert!(matches!(value, Number::Float(x) if x == 1.5));
    }

    proptest! {
        #[test]
        fn keep_and_drop_are_complementary(
            faces in prop::collection::vec(1u64..=20, 1..12),
            k in 0usize..12,
        ) {
            let n = faces.len();
            let k = k.min(n);
            let pairs = [
                (format!("{}d20dh{}", n, k), format!("{}d20kl{}", n, n - k)),
                (format!("{}d20dl{}", n, k), format!("{}d20kh{}", n, n - k)),
            ];
            for (drop, keep) in pairs.iter() {
                let (dropped, _) = roll(drop, &faces);
                let (kept, _) = roll(keep, &faces);
                prop_assert_eq!(dropped, kept);
            }
        }

        #[test]
        fn plain_sum_is_bounded(count in 1usize..50, sides in 1u64..100, seed in any::<u64>()) {
            let faces: Vec<u64> = (0..count as u64).map(|i| seed.wrapping_add(i * 7919) % sides + 1).collect();
            let (value, traces) = roll(&format!("{}d{}", count, sides), &faces);
            let sum = match value {
                Number::Int(x) => x,
                Number::Float(_) => unreachable!(),
            };
            prop_assert!(sum >= count as i64);
            prop_assert!(sum <= count as i64 * sides as i64);
            prop_assert_eq!(traces[0].sum, Some(sum));
        }
    }
}
