use crate::common::*;
use serde::Serialize;

/// One extra die added by an explosion.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct Explosion {
    pub value: Int,
}

/// A single physical die and everything that happened to it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DieRoll {
    pub value: Int,
    /// Values replaced by rerolls, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rerolls: Vec<Int>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explodes: Vec<Explosion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip)]
    pub(crate) kept: bool,
}

impl DieRoll {
    pub fn new(value: Int) -> Self {
        Self {
            value,
            rerolls: Vec::new(),
            explodes: Vec::new(),
            success: None,
            kept: true,
        }
    }

    /// Current value plus every explosion increment.
    pub fn total(&self) -> Int {
        self.explodes
            .iter()
            .fold(self.value, |acc, e| acc.saturating_add(e.value))
    }

    /// Whether keep/drop left this die in play.
    pub fn is_kept(&self) -> bool {
        self.kept
    }
}

/// The record of evaluating one dice term.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceTrace {
    pub term: String,
    pub rolls: Vec<DieRoll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept_values: Option<Vec<Int>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<Int>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successes: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_omits_empty_history() {
        let mut roll = DieRoll::new(6);
        assert_eq!(serde_json::to_value(&roll).unwrap(), json!({"value": 6}));

        roll.rerolls.push(1);
        roll.explodes.push(Explosion { value: 3 });
        roll.success = Some(true);
        assert_eq!(
            serde_json::to_value(&roll).unwrap(),
            json!({"value": 6, "rerolls": [1], "explodes": [{"value": 3}], "success": true})
        );
        assert_eq!(roll.total(), 9);
    }

    #[test]
    fn test_serialize_trace() {
        let trace = DiceTrace {
            term: "2d20kh1".to_string(),
            rolls: vec![DieRoll::new(4), DieRoll::new(17)],
            kept_values: Some(vec![17]),
            sum: Some(17),
            threshold: None,
            successes: None,
        };
        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!({
                "term": "2d20kh1",
                "rolls": [{"value": 4}, {"value": 17}],
                "keptValues": [17],
                "sum": 17
            })
        );
    }
}
