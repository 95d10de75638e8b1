pub mod strategy;

pub use strategy::{AlwaysDrawAi, GreedyFirstAi, RandomAi, StrategyKind, UnknownStrategy};
