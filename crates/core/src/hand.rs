use crate::{Card, Suit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
    RoyalFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandKind {
    pub const ALL: [HandKind; 13] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
        HandKind::FiveOfAKind,
        HandKind::FlushHouse,
        HandKind::FlushFive,
    ];

    /// Winner order: the first satisfied kind in this list is the played hand.
    pub const PRIORITY: [HandKind; 13] = [
        HandKind::FlushFive,
        HandKind::FlushHouse,
        HandKind::FiveOfAKind,
        HandKind::RoyalFlush,
        HandKind::StraightFlush,
        HandKind::Quads,
        HandKind::FullHouse,
        HandKind::Flush,
        HandKind::Straight,
        HandKind::Trips,
        HandKind::TwoPair,
        HandKind::Pair,
        HandKind::HighCard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
            HandKind::FiveOfAKind => "five_of_a_kind",
            HandKind::FlushHouse => "flush_house",
            HandKind::FlushFive => "flush_five",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::Trips => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::Quads => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
            HandKind::FiveOfAKind => "Five of a Kind",
            HandKind::FlushHouse => "Flush House",
            HandKind::FlushFive => "Flush Five",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        HandKind::ALL.iter().copied().find(|kind| kind.id() == id)
    }
}

/// Royal Flush shares its level with Straight Flush.
pub fn level_kind(kind: HandKind) -> HandKind {
    match kind {
        HandKind::RoyalFlush => HandKind::StraightFlush,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandEvalRules {
    /// Let the Ace also play low in A-2-3-4-5.
    pub ace_low_straights: bool,
    /// Report a 10-J-Q-K-A straight flush as a Royal Flush.
    pub royal_flush: bool,
}

impl Default for HandEvalRules {
    fn default() -> Self {
        Self {
            ace_low_straights: false,
            royal_flush: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub best: HandKind,
    pub satisfied: BTreeSet<HandKind>,
    pub category_cards: BTreeMap<HandKind, Vec<Card>>,
}

impl Classification {
    pub fn cards_for(&self, kind: HandKind) -> &[Card] {
        self.category_cards
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn best_cards(&self) -> &[Card] {
        self.cards_for(self.best)
    }

    pub fn satisfies(&self, kind: HandKind) -> bool {
        self.satisfied.contains(&kind)
    }
}

const FLUSH_LEN: usize = 5;
const STRAIGHT_LEN: usize = 5;

pub fn classify(cards: &[Card]) -> Classification {
    classify_with_rules(cards, HandEvalRules::default())
}

pub fn classify_with_rules(cards: &[Card], rules: HandEvalRules) -> Classification {
    let groups = rank_groups(cards);
    let fives = same_rank(&groups, 5);
    let fours = same_rank(&groups, 4);
    let threes = same_rank(&groups, 3);
    let pairs = same_rank(&groups, 2);
    let flush = flush_cards(cards);
    let straight = straight_cards(cards, rules.ace_low_straights);

    // Pairs are one per rank, so any two of them are disjoint.
    let full_house = threes.first().and_then(|trio| {
        pairs
            .iter()
            .find(|pair| pair[0].rank != trio[0].rank)
            .map(|pair| concat(trio, pair))
    });
    let two_pair = match (pairs.first(), pairs.get(1)) {
        (Some(first), Some(second)) => Some(concat(first, second)),
        _ => None,
    };

    let mut category_cards = BTreeMap::new();
    if let (Some(five), Some(_)) = (fives.first(), flush.as_ref()) {
        category_cards.insert(HandKind::FlushFive, five.clone());
    }
    if let (Some(house), Some(_)) = (full_house.as_ref(), flush.as_ref()) {
        category_cards.insert(HandKind::FlushHouse, house.clone());
    }
    if let Some(five) = fives.first() {
        category_cards.insert(HandKind::FiveOfAKind, five.clone());
    }
    if let (Some(run), Some(_)) = (straight.as_ref(), flush.as_ref()) {
        category_cards.insert(HandKind::StraightFlush, run.clone());
        if rules.royal_flush && is_royal(run) {
            category_cards.insert(HandKind::RoyalFlush, run.clone());
        }
    }
    if let Some(four) = fours.first() {
        category_cards.insert(HandKind::Quads, four.clone());
    }
    if let Some(house) = full_house {
        category_cards.insert(HandKind::FullHouse, house);
    }
    if let Some(suited) = flush {
        category_cards.insert(HandKind::Flush, suited);
    }
    if let Some(run) = straight {
        category_cards.insert(HandKind::Straight, run);
    }
    if let Some(three) = threes.first() {
        category_cards.insert(HandKind::Trips, three.clone());
    }
    if let Some(both) = two_pair {
        category_cards.insert(HandKind::TwoPair, both);
    }
    if let Some(pair) = pairs.first() {
        category_cards.insert(HandKind::Pair, pair.clone());
    }
    category_cards.insert(
        HandKind::HighCard,
        highest_card(cards).into_iter().collect(),
    );

    let best = HandKind::PRIORITY
        .iter()
        .copied()
        .find(|kind| category_cards.contains_key(kind))
        .unwrap_or(HandKind::HighCard);
    let satisfied = category_cards.keys().copied().collect();

    tracing::trace!(hand = best.id(), cards = cards.len(), "classified hand");
    Classification {
        best,
        satisfied,
        category_cards,
    }
}

/// Cards grouped by rank id, ascending, keeping input order inside a group.
fn rank_groups(cards: &[Card]) -> Vec<Vec<Card>> {
    let mut groups: BTreeMap<u8, Vec<Card>> = BTreeMap::new();
    for card in cards {
        groups.entry(card.rank_id()).or_default().push(*card);
    }
    groups.into_values().collect()
}

fn same_rank(groups: &[Vec<Card>], count: usize) -> Vec<Vec<Card>> {
    groups
        .iter()
        .filter(|group| group.len() >= count)
        .map(|group| group[..count].to_vec())
        .collect()
}

fn flush_cards(cards: &[Card]) -> Option<Vec<Card>> {
    if cards.len() < FLUSH_LEN {
        return None;
    }
    Suit::ALL.iter().find_map(|suit| {
        let suited: Vec<Card> = cards.iter().copied().filter(|c| c.is_suit(*suit)).collect();
        (suited.len() >= FLUSH_LEN).then_some(suited)
    })
}

/// Highest five-card window of consecutive ranks. Repeated ranks are skipped
/// without breaking the run.
fn straight_cards(cards: &[Card], ace_low: bool) -> Option<Vec<Card>> {
    if cards.len() < STRAIGHT_LEN {
        return None;
    }
    let mut keyed: Vec<(u8, Card)> = cards.iter().map(|c| (c.rank_id(), *c)).collect();
    if ace_low {
        keyed.extend(cards.iter().filter(|c| c.rank_id() == 14).map(|c| (1, *c)));
    }
    keyed.sort_by_key(|(id, _)| *id);

    let (mut last_id, first) = keyed[0];
    let mut run = vec![first];
    let mut found = None;
    for &(id, card) in &keyed[1..] {
        if id == last_id {
            continue;
        }
        if id != last_id + 1 {
            run.clear();
        }
        run.push(card);
        last_id = id;
        if run.len() >= STRAIGHT_LEN {
            found = Some(run[run.len() - STRAIGHT_LEN..].to_vec());
        }
    }
    found
}

fn is_royal(run: &[Card]) -> bool {
    let mut ids: Vec<u8> = run.iter().map(Card::rank_id).collect();
    ids.sort_unstable();
    ids == [10, 11, 12, 13, 14]
}

fn highest_card(cards: &[Card]) -> Option<Card> {
    let mut best: Option<Card> = None;
    for card in cards {
        if best.map(|b| card.rank_id() > b.rank_id()).unwrap_or(true) {
            best = Some(*card);
        }
    }
    best
}

fn concat(left: &[Card], right: &[Card]) -> Vec<Card> {
    left.iter().chain(right).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_cards, Rank};

    fn cards(text: &str) -> Vec<Card> {
        parse_cards(text).expect("cards")
    }

    #[test]
    fn rank_groups_keep_input_order() {
        let groups = rank_groups(&cards("9H 2S 9C 2D"));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], cards("2S 2D"));
        assert_eq!(groups[1], cards("9H 9C"));
    }

    #[test]
    fn oversized_groups_are_truncated() {
        let groups = rank_groups(&cards("7H 7S 7C 7D"));
        let threes = same_rank(&groups, 3);
        assert_eq!(threes, vec![cards("7H 7S 7C")]);
    }

    #[test]
    fn flush_uses_fixed_suit_order() {
        let hearts = cards("2H 5H 7H 9H JH 3S");
        assert_eq!(flush_cards(&hearts).map(|c| c.len()), Some(5));
        assert_eq!(flush_cards(&cards("2H 5H 7H 9H")), None);
    }

    #[test]
    fn straight_reports_highest_window() {
        let run = straight_cards(&cards("2H 3S 4C 5D 6H 7S"), false).expect("straight");
        let ids: Vec<u8> = run.iter().map(Card::rank_id).collect();
        assert_eq!(ids, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn straight_skips_repeated_ranks() {
        let run = straight_cards(&cards("4C 5D 5H 6H 7S 8D"), false).expect("straight");
        assert_eq!(run, cards("4C 5D 6H 7S 8D"));
    }

    #[test]
    fn ace_low_needs_the_rule() {
        let wheel = cards("AH 2S 3C 4D 5H");
        assert_eq!(straight_cards(&wheel, false), None);
        let run = straight_cards(&wheel, true).expect("wheel");
        assert_eq!(run[0].rank, Rank::Ace);
        assert_eq!(run.len(), 5);
    }

    #[test]
    fn highest_card_prefers_first_on_ties() {
        let hand = cards("KH 4S KD");
        assert_eq!(highest_card(&hand), Some(hand[0]));
        assert_eq!(highest_card(&[]), None);
    }

    #[test]
    fn level_kind_folds_royal_flush() {
        assert_eq!(level_kind(HandKind::RoyalFlush), HandKind::StraightFlush);
        assert_eq!(level_kind(HandKind::Pair), HandKind::Pair);
    }

    #[test]
    fn ids_round_trip() {
        for kind in HandKind::ALL {
            assert_eq!(HandKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(HandKind::PRIORITY.len(), HandKind::ALL.len());
    }
}
