use crate::{Card, Score, ScoreTraceStep};
use thiserror::Error;

/// Game state a modifier may read while scoring one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext<'a> {
    pub scoring_cards: &'a [Card],
    pub discards_remaining: u32,
    pub hands_remaining: u32,
    pub money: i64,
}

impl<'a> ScoringContext<'a> {
    pub fn new(scoring_cards: &'a [Card]) -> Self {
        Self {
            scoring_cards,
            discards_remaining: 0,
            hands_remaining: 0,
            money: 0,
        }
    }

    pub fn with_discards(mut self, discards_remaining: u32) -> Self {
        self.discards_remaining = discards_remaining;
        self
    }

    pub fn with_hands(mut self, hands_remaining: u32) -> Self {
        self.hands_remaining = hands_remaining;
        self
    }

    pub fn with_money(mut self, money: i64) -> Self {
        self.money = money;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    #[error("chip total overflowed")]
    ChipOverflow,
    #[error("mult is not a finite number")]
    NonFiniteMult,
    #[error("{0}")]
    Custom(String),
}

/// Something that can adjust a hand's score, such as a joker.
///
/// `apply` returns `Ok(true)` when the modifier triggered. A modifier that
/// returns `Ok(false)` is expected to leave the score untouched.
pub trait Modifier {
    fn id(&self) -> &str;

    fn display_name(&self) -> &str {
        self.id()
    }

    fn apply(&self, score: &mut Score, ctx: &ScoringContext<'_>) -> Result<bool, ModifierError>;
}

impl<T: Modifier + ?Sized> Modifier for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }

    fn apply(&self, score: &mut Score, ctx: &ScoringContext<'_>) -> Result<bool, ModifierError> {
        (**self).apply(score, ctx)
    }
}

impl<T: Modifier + ?Sized> Modifier for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }

    fn apply(&self, score: &mut Score, ctx: &ScoringContext<'_>) -> Result<bool, ModifierError> {
        (**self).apply(score, ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierOutcome {
    /// Ids of the modifiers that triggered, in application order.
    pub triggered: Vec<String>,
    /// Ids of the modifiers whose effect failed and was skipped.
    pub failed: Vec<String>,
    pub trace: Vec<ScoreTraceStep>,
}

/// Applies `modifiers` to `score` strictly in the order given.
///
/// A failing modifier is rolled back to the score it received and skipped;
/// the remaining modifiers still run.
pub fn apply_modifiers<'m, I, M>(
    score: &mut Score,
    ctx: &ScoringContext<'_>,
    modifiers: I,
) -> ModifierOutcome
where
    I: IntoIterator<Item = &'m M>,
    M: Modifier + ?Sized + 'm,
{
    let mut outcome = ModifierOutcome::default();
    for modifier in modifiers {
        let before = *score;
        match modifier.apply(score, ctx) {
            Ok(true) => {
                tracing::trace!(
                    modifier = modifier.id(),
                    chips = score.chips,
                    mult = score.mult,
                    "modifier triggered"
                );
                outcome.triggered.push(modifier.id().to_string());
                outcome.trace.push(ScoreTraceStep {
                    source: modifier.id().to_string(),
                    before,
                    after: *score,
                });
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(modifier = modifier.id(), error = %err, "modifier failed, skipping");
                *score = before;
                outcome.failed.push(modifier.id().to_string());
            }
        }
    }
    outcome
}
