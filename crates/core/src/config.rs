use crate::{HandEvalRules, HandKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandRule {
    pub kind: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
    #[serde(default)]
    pub level_chips: i64,
    #[serde(default)]
    pub level_mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub hands: Vec<HandRule>,
    #[serde(default)]
    pub rules: HandEvalRules,
    #[serde(default = "default_joker_slots")]
    pub joker_slots: usize,
}

fn default_joker_slots() -> usize {
    5
}

impl GameConfig {
    pub fn hand_rule(&self, kind: HandKind) -> Option<&HandRule> {
        self.hands.iter().find(|rule| rule.kind == kind)
    }

    /// Kinds with no row in `hands`.
    pub fn missing_hands(&self) -> Vec<HandKind> {
        HandKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.hand_rule(*kind).is_none())
            .collect()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hands: Vec::new(),
            rules: HandEvalRules::default(),
            joker_slots: default_joker_slots(),
        }
    }
}
