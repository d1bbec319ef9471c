use crate::{Card, Rank, Suit};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[derive(Debug, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
    rng: StdRng,
    seed: u64,
}

impl Deck {
    pub fn from_cards(cards: Vec<Card>, seed: u64) -> Self {
        Self {
            draw: cards,
            discard: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// All 52 cards, unshuffled. Cards are drawn from the end.
    pub fn standard52(seed: u64) -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades] {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self::from_cards(cards, seed)
    }

    pub fn shuffled52(seed: u64) -> Self {
        let mut deck = Self::standard52(seed);
        deck.shuffle();
        deck
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn shuffle(&mut self) {
        self.draw.shuffle(&mut self.rng);
    }

    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let take = count.min(self.draw.len());
        let split = self.draw.len() - take;
        let mut cards = self.draw.split_off(split);
        cards.reverse();
        cards
    }

    pub fn discard(&mut self, mut cards: Vec<Card>) {
        self.discard.append(&mut cards);
    }

    pub fn reshuffle_discard(&mut self) {
        if self.discard.is_empty() {
            return;
        }
        self.draw.append(&mut self.discard);
        self.shuffle();
    }
}
