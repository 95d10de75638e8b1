use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the four real suits. The "no suit demanded" state is modelled as
/// `Option<Suit>::None` and rendered with ordinal `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Suit {
    Spades = 1,
    Hearts = 2,
    Diamonds = 3,
    Clubs = 4,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Suit::Spades),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Diamonds),
            4 => Some(Suit::Clubs),
            _ => None,
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Ordinal of a possibly absent suit; `0` stands for "none".
pub const fn suit_ordinal(suit: Option<Suit>) -> u8 {
    match suit {
        Some(suit) => suit.ordinal(),
        None => 0,
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}
