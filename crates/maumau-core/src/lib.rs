#![deny(warnings)]
pub mod game;
pub mod model;
pub mod rules;
pub mod strategy;

pub use game::{Game, GameConfig, GameError, GameOutcome, TurnOutcome};
pub use model::card::Card;
pub use model::rank::Rank;
pub use model::suit::Suit;
pub use strategy::{Choice, Strategy, TableView};
