use crate::error::{DiceError, ErrorKind};
use crate::limits::Limits;
use crate::roll::{DiceTrace, Number};
use serde::{Serialize, Serializer};

pub const VERSION: &str = concat!("dice-", env!("CARGO_PKG_VERSION"));

/// The outcome of evaluating one expression, success or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RollResult {
    Success(Outcome),
    Failure(Failure),
}

impl RollResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Self::Success(outcome) => Some(outcome),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<Result<Outcome, Failure>> for RollResult {
    fn from(result: Result<Outcome, Failure>) -> Self {
        match result {
            Ok(outcome) => Self::Success(outcome),
            Err(failure) => Self::Failure(failure),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    ok: bool,
    #[serde(flatten)]
    body: &'a T,
}

impl Serialize for RollResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(body) => Tagged { ok: true, body }.serialize(serializer),
            Self::Failure(body) => Tagged { ok: false, body }.serialize(serializer),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Sum,
    SuccessCount,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct RngInfo {
    pub source: &'static str,
    pub method: &'static str,
}

impl Default for RngInfo {
    fn default() -> Self {
        Self {
            source: "CSPRNG",
            method: "rejectionSampling",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsInfo {
    pub max_dice: u64,
    pub max_explosions: usize,
}

impl From<&Limits> for LimitsInfo {
    fn from(limits: &Limits) -> Self {
        Self {
            max_dice: limits.max_dice,
            max_explosions: limits.max_explosions,
        }
    }
}

/// A successfully evaluated expression with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    #[serde(rename = "final")]
    pub value: Number,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub trace: Vec<DiceTrace>,
    pub rng: RngInfo,
    pub limits: LimitsInfo,
    pub version: &'static str,
}

impl Outcome {
    /// The result counts successes as soon as any term carries a success comparator.
    pub fn new(value: Number, trace: Vec<DiceTrace>, limits: &Limits) -> Self {
        let kind = if trace.iter().any(|t| t.successes.is_some()) {
            ResultKind::SuccessCount
        } else {
            ResultKind::Sum
        };
        Self {
            value,
            kind,
            trace,
            rng: RngInfo::default(),
            limits: limits.into(),
            version: VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub input: String,
}

impl Failure {
    pub fn new(error: &DiceError, input: &str) -> Self {
        Self {
            error: ErrorInfo {
                kind: error.kind(),
                message: error.to_string(),
                position: error.position(),
                input: input.to_string(),
            },
        }
    }
}
