//! Legality of plays. Strategies use [`valid_indexes`] to pick a move and the
//! engine uses [`validate_play`] to check the move it was handed; both defer
//! to [`is_valid`].

use crate::model::card::Card;
use crate::model::suit::{Suit, suit_ordinal};
use core::fmt;

/// A card taken out of a hand together with the suit its player demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub card: Card,
    pub declared: Option<Suit>,
}

impl Play {
    pub const fn new(card: Card, declared: Option<Suit>) -> Self {
        Self { card, declared }
    }
}

pub fn is_valid(card: Card, top: Card, asked: Option<Suit>) -> bool {
    if card.is_wild() {
        return true;
    }
    match asked {
        Some(suit) => card.suit == suit,
        None => card.suit == top.suit || card.rank == top.rank,
    }
}

pub fn valid_indexes(hand: &[Card], top: Card, asked: Option<Suit>) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| is_valid(**card, top, asked))
        .map(|(index, _)| index)
        .collect()
}

/// Checks a play against the previous top card and asked suit.
pub fn validate_play(play: Play, top: Card, asked: Option<Suit>) -> Result<(), IllegalMove> {
    let card = play.card;
    if card.is_wild() {
        return match play.declared {
            Some(_) => Ok(()),
            None => Err(IllegalMove::MissingDeclaredSuit { card }),
        };
    }
    if let Some(declared) = play.declared {
        return Err(IllegalMove::UnexpectedDeclaredSuit { card, declared });
    }
    if let Some(asked) = asked {
        if card.suit != asked {
            return Err(IllegalMove::AskedSuitMismatch { card, asked });
        }
        return Ok(());
    }
    if card.rank != top.rank && card.suit != top.suit {
        return Err(IllegalMove::NoMatch { card, top });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    MissingDeclaredSuit { card: Card },
    UnexpectedDeclaredSuit { card: Card, declared: Suit },
    AskedSuitMismatch { card: Card, asked: Suit },
    NoMatch { card: Card, top: Card },
    IndexOutOfRange { index: usize, hand_len: usize },
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::MissingDeclaredSuit { card } => {
                write!(f, "wild card {card} played without a declared suit")
            }
            IllegalMove::UnexpectedDeclaredSuit { card, declared } => write!(
                f,
                "card {card} is not wild but declared suit {}",
                suit_ordinal(Some(*declared))
            ),
            IllegalMove::AskedSuitMismatch { card, asked } => {
                write!(f, "card {card} does not follow asked suit {asked}")
            }
            IllegalMove::NoMatch { card, top } => {
                write!(f, "card {card} matches neither rank nor suit of top {top}")
            }
            IllegalMove::IndexOutOfRange { index, hand_len } => {
                write!(f, "hand index {index} out of range for {hand_len} cards")
            }
        }
    }
}

impl std::error::Error for IllegalMove {}
