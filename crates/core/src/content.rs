use crate::{Card, Modifier, ModifierError, Rank, RuleEffect, Score, ScoringContext, Suit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JokerRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Which scoring cards a per-card effect counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardFilter {
    Any,
    Suit(Suit),
    Rank(Rank),
    Face,
}

impl CardFilter {
    pub fn matches(self, card: &Card) -> bool {
        match self {
            CardFilter::Any => true,
            CardFilter::Suit(suit) => card.is_suit(suit),
            CardFilter::Rank(rank) => card.rank == rank,
            CardFilter::Face => card.rank.is_face(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    DiscardsLeft(u32),
    HandsLeft(u32),
    MoneyAtLeast(i64),
}

impl Condition {
    pub fn holds(self, ctx: &ScoringContext<'_>) -> bool {
        match self {
            Condition::DiscardsLeft(count) => ctx.discards_remaining == count,
            Condition::HandsLeft(count) => ctx.hands_remaining == count,
            Condition::MoneyAtLeast(amount) => ctx.money >= amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JokerEffect {
    /// Applies once, every hand.
    Always { effect: RuleEffect },
    /// Applies once per scoring card that passes the filter.
    PerCard { filter: CardFilter, effect: RuleEffect },
    /// Applies once per remaining discard; silent with none left.
    PerDiscardLeft { effect: RuleEffect },
    /// Applies once when the condition holds.
    When {
        condition: Condition,
        effect: RuleEffect,
    },
}

impl JokerEffect {
    fn repeats(&self, ctx: &ScoringContext<'_>) -> u32 {
        match self {
            JokerEffect::Always { .. } => 1,
            JokerEffect::PerCard { filter, .. } => {
                let matching = ctx
                    .scoring_cards
                    .iter()
                    .filter(|card| filter.matches(card))
                    .count();
                u32::try_from(matching).unwrap_or(u32::MAX)
            }
            JokerEffect::PerDiscardLeft { .. } => ctx.discards_remaining,
            JokerEffect::When { condition, .. } => u32::from(condition.holds(ctx)),
        }
    }

    fn rule(&self) -> &RuleEffect {
        match self {
            JokerEffect::Always { effect }
            | JokerEffect::PerCard { effect, .. }
            | JokerEffect::PerDiscardLeft { effect }
            | JokerEffect::When { effect, .. } => effect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JokerDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rarity: JokerRarity,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub description: String,
    pub effect: JokerEffect,
}

impl Modifier for JokerDef {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn apply(&self, score: &mut Score, ctx: &ScoringContext<'_>) -> Result<bool, ModifierError> {
        let repeats = self.effect.repeats(ctx);
        if repeats == 0 {
            return Ok(false);
        }
        score.apply(&self.effect.rule().repeated(repeats)?)?;
        Ok(true)
    }
}

/// Every joker the game knows about, keyed by id. Loaded once and passed
/// to whatever needs to resolve owned jokers.
#[derive(Debug, Clone, Default)]
pub struct JokerCatalog {
    jokers: Vec<JokerDef>,
    by_id: HashMap<String, usize>,
}

impl JokerCatalog {
    /// Builds a catalog; later definitions replace earlier ones with the same id.
    pub fn new(defs: Vec<JokerDef>) -> Self {
        let mut catalog = Self::default();
        for def in defs {
            catalog.insert(def);
        }
        catalog
    }

    pub fn insert(&mut self, def: JokerDef) {
        match self.by_id.get(&def.id) {
            Some(&idx) => self.jokers[idx] = def,
            None => {
                self.by_id.insert(def.id.clone(), self.jokers.len());
                self.jokers.push(def);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&JokerDef> {
        self.by_id.get(id).map(|idx| &self.jokers[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &JokerDef> {
        self.jokers.iter()
    }

    pub fn len(&self) -> usize {
        self.jokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_cards;

    fn joker(id: &str, effect: JokerEffect) -> JokerDef {
        JokerDef {
            id: id.to_string(),
            name: id.to_string(),
            rarity: JokerRarity::Common,
            cost: 2,
            description: String::new(),
            effect,
        }
    }

    #[test]
    fn per_card_counts_each_match() {
        let greedy = joker(
            "greedy",
            JokerEffect::PerCard {
                filter: CardFilter::Suit(Suit::Diamonds),
                effect: RuleEffect::AddMult(4.0),
            },
        );
        let cards = parse_cards("2D 5D 9S").expect("cards");
        let mut score = Score::new(10, 1.0);
        assert_eq!(greedy.apply(&mut score, &ScoringContext::new(&cards)), Ok(true));
        assert_eq!(score.mult, 9.0);

        let spades = parse_cards("9S").expect("cards");
        let mut untouched = Score::new(10, 1.0);
        assert_eq!(
            greedy.apply(&mut untouched, &ScoringContext::new(&spades)),
            Ok(false)
        );
        assert_eq!(untouched, Score::new(10, 1.0));
    }

    #[test]
    fn face_filter_skips_aces() {
        let cards = parse_cards("JH QS KD AC").expect("cards");
        let faces = cards.iter().filter(|c| CardFilter::Face.matches(c)).count();
        assert_eq!(faces, 3);
    }

    #[test]
    fn conditions_read_the_context() {
        let ctx = ScoringContext::new(&[]).with_hands(1).with_money(5);
        assert!(Condition::DiscardsLeft(0).holds(&ctx));
        assert!(Condition::HandsLeft(1).holds(&ctx));
        assert!(Condition::MoneyAtLeast(5).holds(&ctx));
        assert!(!Condition::MoneyAtLeast(6).holds(&ctx));
    }

    #[test]
    fn catalog_replaces_duplicate_ids() {
        let always = |value| JokerEffect::Always {
            effect: RuleEffect::AddMult(value),
        };
        let catalog = JokerCatalog::new(vec![
            joker("a", always(1.0)),
            joker("b", always(2.0)),
            joker("a", always(3.0)),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").map(|j| j.effect.clone()), Some(always(3.0)));
        let ids: Vec<&str> = catalog.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn banner_scales_with_discards() {
        let def = JokerDef {
            id: "j_banner".to_string(),
            name: "Banner".to_string(),
            rarity: JokerRarity::Common,
            cost: 5,
            description: String::new(),
            effect: JokerEffect::PerDiscardLeft {
                effect: RuleEffect::AddChips(40),
            },
        };
        let mut score = Score::new(100, 4.0);
        let ctx = ScoringContext::new(&[]).with_discards(2);
        assert_eq!(def.apply(&mut score, &ctx), Ok(true));
        assert_eq!(score, Score::new(180, 4.0));

        let mut score = Score::new(100, 4.0);
        let ctx = ScoringContext::new(&[]).with_discards(u32::MAX);
        assert_eq!(def.apply(&mut score, &ctx), Ok(true));
        assert_eq!(score.chips, 100 + 40 * i64::from(u32::MAX));
    }
}
