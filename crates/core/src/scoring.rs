use crate::{
    apply_modifiers, classify_with_rules, level_kind, Card, GameConfig, HandEvalRules, HandKind,
    Modifier, Score, ScoreTraceStep, ScoringContext,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base chips and mult for every hand kind. Always total: kinds the config
/// leaves out fall back to the reference values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTables {
    hand_rules: HashMap<HandKind, (i64, f64)>,
    hand_level_rules: HashMap<HandKind, (i64, f64)>,
}

impl ScoreTables {
    pub fn reference() -> Self {
        let hand_rules = HandKind::ALL
            .iter()
            .map(|kind| (*kind, default_hand_base(*kind)))
            .collect();
        Self {
            hand_rules,
            hand_level_rules: HashMap::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut tables = Self::reference();
        for hand in &config.hands {
            tables
                .hand_rules
                .insert(hand.kind, (hand.base_chips, hand.base_mult));
            tables
                .hand_level_rules
                .insert(hand.kind, (hand.level_chips, hand.level_mult));
        }
        tables
    }

    pub fn hand_base(&self, kind: HandKind) -> (i64, f64) {
        self.hand_rules
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_hand_base(kind))
    }

    pub fn hand_base_for_level(&self, kind: HandKind, level: u32) -> (i64, f64) {
        let (base_chips, base_mult) = self.hand_base(kind);
        let (level_chips, level_mult) = self
            .hand_level_rules
            .get(&kind)
            .copied()
            .unwrap_or((0, 0.0));
        if level <= 1 {
            return (base_chips, base_mult);
        }
        let extra = (level - 1) as i64;
        let chips = base_chips.saturating_add(level_chips.saturating_mul(extra));
        let mult = base_mult + level_mult * extra as f64;
        (chips, mult)
    }
}

impl Default for ScoreTables {
    fn default() -> Self {
        Self::reference()
    }
}

fn default_hand_base(kind: HandKind) -> (i64, f64) {
    match kind {
        HandKind::HighCard => (5, 1.0),
        HandKind::Pair => (10, 2.0),
        HandKind::TwoPair => (20, 2.0),
        HandKind::Trips => (30, 3.0),
        HandKind::Straight => (30, 4.0),
        HandKind::Flush => (35, 4.0),
        HandKind::FullHouse => (40, 4.0),
        HandKind::Quads => (60, 7.0),
        HandKind::StraightFlush | HandKind::RoyalFlush => (100, 8.0),
        HandKind::FiveOfAKind => (120, 12.0),
        HandKind::FlushHouse => (140, 14.0),
        HandKind::FlushFive => (160, 16.0),
    }
}

/// Per-hand levels, raised by planet cards. Unlisted hands are level 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandLevels {
    levels: HashMap<HandKind, u32>,
}

impl HandLevels {
    pub fn level(&self, kind: HandKind) -> u32 {
        self.levels.get(&level_kind(kind)).copied().unwrap_or(1)
    }

    pub fn level_up(&mut self, kind: HandKind, amount: u32) {
        let entry = self.levels.entry(level_kind(kind)).or_insert(1);
        *entry = entry.saturating_add(amount);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub hand: HandKind,
    pub scoring_cards: Vec<Card>,
    pub base_chips: i64,
    pub base_mult: f64,
    pub played_chips: i64,
    pub final_chips: i64,
    pub final_mult: f64,
    pub total_score: f64,
    pub triggered_modifiers: Vec<String>,
    pub failed_modifiers: Vec<String>,
    pub trace: Vec<ScoreTraceStep>,
}

impl ScoreResult {
    /// Whole points this hand adds to the round score.
    pub fn points(&self) -> i64 {
        self.total_score.floor() as i64
    }
}

/// Classifies a played hand, prices it and runs the owned modifiers over it.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    pub tables: ScoreTables,
    pub rules: HandEvalRules,
}

impl ScoringPipeline {
    pub fn new(tables: ScoreTables, rules: HandEvalRules) -> Self {
        Self { tables, rules }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(ScoreTables::from_config(config), config.rules)
    }

    pub fn evaluate<'m, I, M>(
        &self,
        cards: &[Card],
        ctx: &ScoringContext<'_>,
        modifiers: I,
    ) -> ScoreResult
    where
        I: IntoIterator<Item = &'m M>,
        M: Modifier + ?Sized + 'm,
    {
        self.evaluate_leveled(cards, ctx, &HandLevels::default(), modifiers)
    }

    pub fn evaluate_leveled<'m, I, M>(
        &self,
        cards: &[Card],
        ctx: &ScoringContext<'_>,
        levels: &HandLevels,
        modifiers: I,
    ) -> ScoreResult
    where
        I: IntoIterator<Item = &'m M>,
        M: Modifier + ?Sized + 'm,
    {
        let classification = classify_with_rules(cards, self.rules);
        let hand = classification.best;
        let (base_chips, base_mult) = self.tables.hand_base_for_level(hand, levels.level(hand));
        // Every played card adds chips, not only the ones forming the hand.
        let played_chips: i64 = cards.iter().map(Card::chip_value).sum();

        let mut score = Score::new(base_chips.saturating_add(played_chips), base_mult);
        let outcome = apply_modifiers(&mut score, ctx, modifiers);
        let total_score = score.total_raw();

        tracing::debug!(
            hand = hand.id(),
            chips = score.chips,
            mult = score.mult,
            total = total_score,
            triggered = outcome.triggered.len(),
            "scored hand"
        );
        ScoreResult {
            hand,
            scoring_cards: classification.best_cards().to_vec(),
            base_chips,
            base_mult,
            played_chips,
            final_chips: score.chips,
            final_mult: score.mult,
            total_score,
            triggered_modifiers: outcome.triggered,
            failed_modifiers: outcome.failed,
            trace: outcome.trace,
        }
    }
}

/// Scores `cards` with the reference table and default hand rules.
pub fn evaluate<'m, I, M>(cards: &[Card], ctx: &ScoringContext<'_>, modifiers: I) -> ScoreResult
where
    I: IntoIterator<Item = &'m M>,
    M: Modifier + ?Sized + 'm,
{
    ScoringPipeline::default().evaluate(cards, ctx, modifiers)
}
