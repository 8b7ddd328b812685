//! Dice notation (`4d6kh3+2`, `10d10>=7`, `3dF`) parsed, rolled with an unbiased
//! secure random source and reported together with a full trace of every die.
//!
//! ```
//! let result = secure_dice::evaluate_expression("2d1 + 3");
//! let outcome = result.outcome().unwrap();
//! assert_eq!(outcome.value, secure_dice::roll::Number::Int(5));
//! assert_eq!(outcome.trace[0].term, "2d1");
//! ```

pub mod common;
pub mod error;
pub mod limits;
pub mod parse;
pub mod result;
pub mod roll;

pub use error::{DiceError, ErrorKind};
pub use limits::Limits;
pub use result::{Failure, Outcome, RollResult};
pub use roll::{Roller, SecureRoller};

/// Parses and rolls `text` with the default limits.
///
/// Never fails: every error is folded into [`RollResult::Failure`].
pub fn evaluate_expression(text: &str) -> RollResult {
    evaluate_with_limits(text, Limits::default())
}

/// Like [`evaluate_expression`], with caller-chosen limits.
pub fn evaluate_with_limits(text: &str, limits: Limits) -> RollResult {
    let result = roll(text, limits, SecureRoller::new(&limits)).map_err(|e| {
        log::debug!("{:?} failed: {}", text, e);
        Failure::new(&e, text)
    });
    result.into()
}

/// Parses and rolls `text` with dice drawn from `roller`.
pub fn roll<R: Roller>(text: &str, limits: Limits, roller: R) -> Result<Outcome, DiceError> {
    let ast = parse::parse(text, limits)?;
    log::debug!("parsed {:?} as {}", text, ast);

    let (value, trace) = roll::eval(&ast, limits, roller)?;
    log::debug!("{:?} = {}", text, value);
    Ok(Outcome::new(value, trace, &limits))
}
