use serde::{Deserialize, Serialize};

/// Safety ceilings bounding the work a single expression may cause.
///
/// These are fixed by whoever embeds the roller; nothing in the expression text
/// can raise them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    /// Dice rolled by a single term.
    pub max_dice: u64,
    /// Faces on a single die.
    pub max_sides: u64,
    /// Explosions chained off a single die.
    pub max_explosions: usize,
    /// Rerolls of a single die.
    pub max_rerolls: usize,
    /// Parenthesis nesting.
    pub max_depth: usize,
    /// Nodes in the whole expression tree.
    pub max_nodes: usize,
}

impl Limits {
    pub const MAX_DICE: u64 = 1000;
    pub const MAX_SIDES: u64 = 1_000_000_000;
    pub const MAX_EXPLOSIONS: usize = 100;
    pub const MAX_REROLLS: usize = 10_000;
    pub const MAX_DEPTH: usize = 32;
    pub const MAX_NODES: usize = 1024;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dice: Self::MAX_DICE,
            max_sides: Self::MAX_SIDES,
            max_explosions: Self::MAX_EXPLOSIONS,
            max_rerolls: Self::MAX_REROLLS,
            max_depth: Self::MAX_DEPTH,
            max_nodes: Self::MAX_NODES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let limits: Limits = serde_json::from_str(r#"{"maxDice": 20, "maxDepth": 4}"#).unwrap();
        assert_eq!(limits.max_dice, 20);
        assert_eq!(limits.max_depth, 4);
        assert_eq!(limits.max_sides, Limits::MAX_SIDES);
        assert_eq!(limits.max_explosions, Limits::MAX_EXPLOSIONS);
    }
}
