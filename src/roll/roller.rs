use super::RollError;
use crate::common::{NonZeroUInt, UInt};
use crate::error::{DiceError, LimitError};
use crate::limits::Limits;
use rand::{rngs::OsRng, CryptoRng, Rng, RngCore};

/// A source of die faces.
pub trait Roller {
    /// Returns a face in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> Result<UInt, DiceError>;
}

impl<R: Roller + ?Sized> Roller for &mut R {
    fn roll(&mut self, sides: NonZeroUInt) -> Result<UInt, DiceError> {
        (**self).roll(sides)
    }
}

/// Draws faces from a cryptographically secure generator without modulo bias.
///
/// The default generator is the operating system's entropy pool, which holds no
/// per-instance state, so independent rollers can be used from any number of threads.
#[derive(Debug, Clone)]
pub struct SecureRoller<R = OsRng> {
    rng: R,
    max_sides: UInt,
}

impl SecureRoller {
    pub fn new(limits: &Limits) -> Self {
        Self::with_rng(OsRng, limits.max_sides)
    }
}

impl Default for SecureRoller {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

impl<R: RngCore + CryptoRng> SecureRoller<R> {
    pub fn with_rng(rng: R, max_sides: UInt) -> Self {
        Self { rng, max_sides }
    }
}

impl<R: RngCore + CryptoRng> Roller for SecureRoller<R> {
    fn roll(&mut self, sides: NonZeroUInt) -> Result<UInt, DiceError> {
        if sides.get() > self.max_sides {
            return Err(LimitError::TooManySides(self.max_sides).into());
        }
        if sides.get() == 1 {
            return Ok(1);
        }
        Ok(sample(&mut self.rng, sides)?)
    }
}

/// Rejected draws tolerated before switching to the generator's own bounded sampling.
pub(crate) const MAX_ATTEMPTS: usize = 10_000;

/// Rejection sampling over the fewest whole bytes that cover `sides`.
///
/// A big-endian draw `v` of `b` bytes is accepted only below
/// `floor(256^b / sides) * sides`, so every face is equally likely.
pub(crate) fn sample<R: RngCore>(rng: &mut R, sides: NonZeroUInt) -> Result<UInt, RollError> {
    let sides = sides.get();
    let bits = UInt::BITS - sides.leading_zeros();
    let width = ((bits + 7) / 8) as usize;
    let span = 1u128 << (width * 8);
    let bound = span / u128::from(sides) * u128::from(sides);

    let mut buf = [0u8; 8];
    for _ in 0..MAX_ATTEMPTS {
        let bytes = &mut buf[..width];
        rng.try_fill_bytes(bytes)?;
        let v = bytes
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | u128::from(b));
        if v < bound {
            return Ok((v % u128::from(sides)) as UInt + 1);
        }
    }

    log::warn!(
        "rejection sampling for d{} rejected {} draws; using bounded sampling",
        sides,
        MAX_ATTEMPTS
    );
    Ok(rng.gen_range(1..=sides))
}

#[cfg(test)]
pub(crate) use step::{ScriptedRoller, StepRoller};

#[cfg(test)]
mod step {
    use super::*;
    use std::collections::VecDeque;

    /// Yields `initial`, `initial + step`, ... wrapped into each die's range.
    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
    }

    impl StepRoller {
        pub fn new(initial: UInt, step: UInt) -> Self {
            Self {
                current: initial,
                step,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, sides: NonZeroUInt) -> Result<UInt, DiceError> {
            let ret = (self.current.max(1) - 1) % sides.get() + 1;
            self.current += self.step;
            Ok(ret)
        }
    }

    /// Plays back a fixed list of faces, then keeps returning the last one.
    pub(crate) struct ScriptedRoller {
        faces: VecDeque<UInt>,
        last: UInt,
        pub drawn: usize,
    }

    impl ScriptedRoller {
        pub fn new(faces: impl IntoIterator<Item = UInt>) -> Self {
            Self {
                faces: faces.into_iter().collect(),
                last: 1,
                drawn: 0,
            }
        }
    }

    impl Roller for ScriptedRoller {
        fn roll(&mut self, sides: NonZeroUInt) -> Result<UInt, DiceError> {
            if let Some(face) = self.faces.pop_front() {
                self.last = face;
            }
            self.drawn += 1;
            Ok(self.last.clamp(1, sides.get()))
        }
    }
}
