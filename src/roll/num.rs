use super::RollError;
use crate::common::*;
use serde::{Serialize, Serializer};
use std::fmt;

/// An arithmetic value: integral until a division leaves a remainder.
#[derive(Debug, Copy, Clone)]
pub enum Number {
    Int(Int),
    Float(Float),
}

impl Number {
    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
        }
    }

    /// Collapses whole fractional values back to integers.
    pub fn normalize(self) -> Self {
        match self {
            Self::Float(x)
                if x.is_finite()
                    && x.fract() == 0.0
                    && x >= Int::MIN as Float
                    && x <= Int::MAX as Float =>
            {
                Self::Int(x as Int)
            }
            _ => self,
        }
    }

    pub fn checked_neg(self) -> Result<Self, RollError> {
        match self {
            Self::Int(x) => x.checked_neg().map(Self::Int).ok_or(RollError::Overflow),
            Self::Float(x) => Ok(Self::Float(-x)),
        }
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, RollError> {
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) => x.checked_add(y).map(Self::Int).ok_or(RollError::Overflow),
            (x, y) => Ok(Self::Float(x.as_float() + y.as_float())),
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, RollError> {
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) => x.checked_sub(y).map(Self::Int).ok_or(RollError::Overflow),
            (x, y) => Ok(Self::Float(x.as_float() - y.as_float())),
        }
    }

    pub fn checked_mul(self, rhs: Self) -> Result<Self, RollError> {
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) => x.checked_mul(y).map(Self::Int).ok_or(RollError::Overflow),
            (x, y) => Ok(Self::Float(x.as_float() * y.as_float())),
        }
    }

    /// Exact when `rhs` divides evenly, fractional otherwise.
    pub fn checked_div(self, rhs: Self) -> Result<Self, RollError> {
        if rhs.as_float() == 0.0 {
            return Err(RollError::DivisionByZero);
        }
        match (self, rhs) {
            (Self::Int(x), Self::Int(y)) => match x.checked_rem(y) {
                Some(0) => x.checked_div(y).map(Self::Int).ok_or(RollError::Overflow),
                Some(_) => Ok(Self::Float(x as Float / y as Float)),
                None => Err(RollError::Overflow),
            },
            (x, y) => Ok(Self::Float(x.as_float() / y.as_float())),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(x), Self::Int(y)) => x == y,
            (x, y) => x.as_float().eq(&y.as_float()),
        }
    }
}

impl From<Int> for Number {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) => fmt::Debug::fmt(x, f),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(x) => serializer.serialize_i64(*x),
            Self::Float(x) => serializer.serialize_f64(*x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division() {
        let six = Number::Int(6);
        assert!(matches!(six.checked_div(Number::Int(2)), Ok(Number::Int(3))));
        assert_eq!(Number::Int(7).checked_div(Number::Int(2)), Ok(Number::Float(3.5)));
        assert_eq!(six.checked_div(Number::Int(0)), Err(RollError::DivisionByZero));
        assert_eq!(six.checked_div(Number::Float(0.0)), Err(RollError::DivisionByZero));
        assert_eq!(
            Number::Int(Int::MIN).checked_div(Number::Int(-1)),
            Err(RollError::Overflow)
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            Number::Int(Int::MAX).checked_add(Number::Int(1)),
            Err(RollError::Overflow)
        );
        assert_eq!(Number::Int(Int::MIN).checked_neg(), Err(RollError::Overflow));
    }

    #[test]
    fn test_normalize() {
        assert!(matches!(Number::Float(7.0).normalize(), Number::Int(7)));
        assert!(matches!(Number::Float(3.5).normalize(), Number::Float(_)));
        assert_eq!(Number::Float(-0.5).to_string(), "-0.5");
    }
}
