use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

pub const CARDS_PER_SHOE: usize = 52;

/// Face-down draw pile, consumed from the front.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Every rank of every suit, `shoes` times over, in a fixed order.
    pub fn build(shoes: usize) -> Self {
        let mut cards = VecDeque::with_capacity(CARDS_PER_SHOE * shoes);
        for rank in Rank::ORDERED.iter().copied() {
            for suit in Suit::ALL.iter().copied() {
                for _ in 0..shoes {
                    cards.push_back(Card::new(rank, suit));
                }
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(shoes: usize, rng: &mut R) -> Self {
        let mut deck = Self::build(shoes);
        deck.shuffle(rng);
        deck
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Fisher–Yates over the current contents.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Replaces the deck with the shuffled discard pile, leaving the pile
    /// empty. The deck must already be exhausted.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        discard: &mut Vec<Card>,
        rng: &mut R,
    ) -> Result<(), DeckError> {
        if discard.is_empty() {
            return Err(DeckError::EmptyDiscard);
        }
        debug_assert!(self.cards.is_empty(), "recycling into a non-empty deck");
        self.cards.extend(discard.drain(..));
        self.shuffle(rng);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn remaining_of_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    pub fn remaining_of_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|c| c.rank == rank).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    EmptyDiscard,
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::EmptyDiscard => {
                f.write_str("deck exhausted and discard pile is empty; card supply too small")
            }
        }
    }
}

impl std::error::Error for DeckError {}
