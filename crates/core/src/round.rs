use crate::{
    classify_with_rules, Card, Classification, Deck, Event, EventBus, HandLevels, Modifier,
    ScoreResult, ScoringContext, ScoringPipeline,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    pub hands: u32,
    pub discards: u32,
    pub hand_size: usize,
    pub max_selection: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            hands: 4,
            discards: 3,
            hand_size: 8,
            max_selection: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("no hands left")]
    NoHandsLeft,
    #[error("no discards left")]
    NoDiscardsLeft,
    #[error("invalid card selection")]
    InvalidSelection,
    #[error("invalid card count")]
    InvalidCardCount,
    #[error("round is over")]
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    InProgress,
    Cleared,
    Failed,
}

/// One blind: play hands until the score reaches the target or hands run out.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub rules: RoundRules,
    pub deck: Deck,
    pub hand: Vec<Card>,
    pub hands_left: u32,
    pub discards_left: u32,
    pub money: i64,
    pub score: i64,
    pub target: i64,
    pub outcome: RoundOutcome,
}

impl RoundState {
    pub fn new(deck: Deck, rules: RoundRules, target: i64) -> Self {
        Self {
            rules,
            deck,
            hand: Vec::new(),
            hands_left: rules.hands,
            discards_left: rules.discards,
            money: 0,
            score: 0,
            target,
            outcome: RoundOutcome::InProgress,
        }
    }

    /// Tops the hand back up to the hand size. Spent cards are shuffled back
    /// into the draw pile when it runs short.
    pub fn deal(&mut self, events: &mut EventBus) -> usize {
        let missing = self.rules.hand_size.saturating_sub(self.hand.len());
        if self.deck.remaining() < missing {
            self.deck.reshuffle_discard();
        }
        let drawn = self.deck.draw_cards(missing);
        let count = drawn.len();
        self.hand.extend(drawn);
        if count > 0 {
            events.push(Event::HandDealt { count });
        }
        count
    }

    /// Classification of the selected cards, for labelling a hand before it is played.
    pub fn preview(
        &self,
        indices: &[usize],
        pipeline: &ScoringPipeline,
    ) -> Result<Classification, RoundError> {
        let cards = self.selected(indices)?;
        Ok(classify_with_rules(&cards, pipeline.rules))
    }

    pub fn play<'m, I, M>(
        &mut self,
        indices: &[usize],
        pipeline: &ScoringPipeline,
        levels: &HandLevels,
        modifiers: I,
        events: &mut EventBus,
    ) -> Result<ScoreResult, RoundError>
    where
        I: IntoIterator<Item = &'m M>,
        M: Modifier + ?Sized + 'm,
    {
        self.ensure_in_progress()?;
        if self.hands_left == 0 {
            return Err(RoundError::NoHandsLeft);
        }
        let played = self.selected(indices)?;
        let ctx = ScoringContext {
            scoring_cards: &played,
            discards_remaining: self.discards_left,
            hands_remaining: self.hands_left,
            money: self.money,
        };
        let result = pipeline.evaluate_leveled(&played, &ctx, levels, modifiers);

        self.remove_selected(indices);
        self.deck.discard(played);
        self.hands_left -= 1;
        self.score = self.score.saturating_add(result.points());
        events.push(Event::HandScored {
            hand: result.hand,
            chips: result.final_chips,
            mult: result.final_mult,
            total: result.points(),
        });
        for id in &result.triggered_modifiers {
            events.push(Event::ModifierTriggered { id: id.clone() });
        }

        if self.score >= self.target {
            self.outcome = RoundOutcome::Cleared;
            events.push(Event::RoundCleared {
                score: self.score,
                target: self.target,
            });
        } else if self.hands_left == 0 {
            self.outcome = RoundOutcome::Failed;
            events.push(Event::RoundFailed {
                score: self.score,
                target: self.target,
            });
        } else {
            self.deal(events);
        }
        Ok(result)
    }

    pub fn discard(&mut self, indices: &[usize], events: &mut EventBus) -> Result<(), RoundError> {
        self.ensure_in_progress()?;
        if self.discards_left == 0 {
            return Err(RoundError::NoDiscardsLeft);
        }
        let cards = self.selected(indices)?;
        self.remove_selected(indices);
        let count = cards.len();
        self.deck.discard(cards);
        self.discards_left -= 1;
        events.push(Event::CardsDiscarded {
            count,
            discards_left: self.discards_left,
        });
        self.deal(events);
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), RoundError> {
        match self.outcome {
            RoundOutcome::InProgress => Ok(()),
            _ => Err(RoundError::RoundOver),
        }
    }

    /// Selected cards in hand order. Indices must be distinct and in range.
    fn selected(&self, indices: &[usize]) -> Result<Vec<Card>, RoundError> {
        if indices.is_empty() || indices.len() > self.rules.max_selection {
            return Err(RoundError::InvalidCardCount);
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != indices.len() || sorted.iter().any(|idx| *idx >= self.hand.len()) {
            return Err(RoundError::InvalidSelection);
        }
        Ok(sorted.iter().map(|idx| self.hand[*idx]).collect())
    }

    fn remove_selected(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for idx in sorted {
            self.hand.remove(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_cards, HandKind, JokerDef};

    fn stacked_round(hand: &str, target: i64) -> RoundState {
        let mut round = RoundState::new(Deck::standard52(0), RoundRules::default(), target);
        round.hand = parse_cards(hand).expect("hand");
        round
    }

    const NO_JOKERS: &[JokerDef] = &[];

    #[test]
    fn play_scores_and_refills() {
        let mut round = stacked_round("KH KS KD 3C 3S 9H 2D 4C", 10_000);
        let mut events = EventBus::default();
        let result = round
            .play(
                &[0, 1, 2, 3, 4],
                &ScoringPipeline::default(),
                &HandLevels::default(),
                NO_JOKERS,
                &mut events,
            )
            .expect("play");
        assert_eq!(result.hand, HandKind::FullHouse);
        assert_eq!(round.score, 304);
        assert_eq!(round.hands_left, 3);
        assert_eq!(round.hand.len(), 8);
        assert_eq!(round.deck.discard.len(), 5);
        assert_eq!(round.outcome, RoundOutcome::InProgress);
        let drained: Vec<Event> = events.drain().collect();
        assert!(matches!(drained[0], Event::HandScored { total: 304, .. }));
    }

    #[test]
    fn reaching_target_clears() {
        let mut round = stacked_round("AH AS 2C", 50);
        let mut events = EventBus::default();
        round
            .play(
                &[0, 1],
                &ScoringPipeline::default(),
                &HandLevels::default(),
                NO_JOKERS,
                &mut events,
            )
            .expect("play");
        assert_eq!(round.outcome, RoundOutcome::Cleared);
        assert_eq!(
            round.discard(&[0], &mut events),
            Err(RoundError::RoundOver)
        );
    }

    #[test]
    fn last_hand_below_target_fails() {
        let mut round = stacked_round("2H 7S", 1_000);
        round.hands_left = 1;
        let mut events = EventBus::default();
        round
            .play(
                &[0],
                &ScoringPipeline::default(),
                &HandLevels::default(),
                NO_JOKERS,
                &mut events,
            )
            .expect("play");
        assert_eq!(round.outcome, RoundOutcome::Failed);
        assert!(events
            .drain()
            .any(|event| matches!(event, Event::RoundFailed { score: 7, .. })));
    }

    #[test]
    fn selection_is_validated() {
        let round = stacked_round("2H 7S 9D", 100);
        let pipeline = ScoringPipeline::default();
        assert_eq!(round.preview(&[], &pipeline), Err(RoundError::InvalidCardCount));
        assert_eq!(
            round.preview(&[0, 1, 2, 0, 1, 2], &pipeline),
            Err(RoundError::InvalidCardCount)
        );
        assert_eq!(round.preview(&[0, 0], &pipeline), Err(RoundError::InvalidSelection));
        assert_eq!(round.preview(&[3], &pipeline), Err(RoundError::InvalidSelection));
        assert_eq!(
            round.preview(&[1], &pipeline).map(|c| c.best),
            Ok(HandKind::HighCard)
        );
    }

    #[test]
    fn short_draw_pile_reuses_spent_cards() {
        let deck = Deck::from_cards(parse_cards("2C 3C 4C").expect("deck"), 5);
        let mut round = RoundState::new(deck, RoundRules::default(), 1_000);
        round.hand = parse_cards("9H 9S 5D").expect("hand");
        let mut events = EventBus::default();
        round.discard(&[0, 1], &mut events).expect("discard");
        assert_eq!(round.hand.len(), 6);
        assert_eq!(round.deck.remaining(), 0);
        assert!(round.deck.discard.is_empty());
        let mut held = round.hand.clone();
        held.sort_by_key(|card| (card.rank_id(), card.suit));
        assert_eq!(held, parse_cards("2C 3C 4C 5D 9S 9H").expect("all"));
    }

    #[test]
    fn discards_are_counted() {
        let mut round = stacked_round("2H 7S 9D", 100);
        round.discards_left = 1;
        let mut events = EventBus::default();
        round.discard(&[0, 2], &mut events).expect("discard");
        assert_eq!(round.discards_left, 0);
        assert_eq!(round.hand.len(), 8);
        assert_eq!(round.hand[0], parse_cards("7S").expect("card")[0]);
        assert_eq!(round.discard(&[0], &mut events), Err(RoundError::NoDiscardsLeft));
    }
}
