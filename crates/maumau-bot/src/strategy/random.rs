use super::log_decision;
use maumau_core::model::suit::Suit;
use maumau_core::rules::valid_indexes;
use maumau_core::strategy::{Choice, Strategy, TableView};
use rand::RngCore;
use rand::seq::SliceRandom;

/// Plays a uniformly random legal card and always names a random suit; the
/// suit only matters when the card is a jack.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAi;

impl Strategy for RandomAi {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&self, view: &TableView<'_>, rng: &mut dyn RngCore) -> Option<Choice> {
        let valid = valid_indexes(view.hand, view.top, view.asked);
        let choice = valid.choose(rng).copied().and_then(|index| {
            Suit::ALL
                .choose(rng)
                .map(|suit| Choice::wild(index, *suit))
        });
        log_decision(self.name(), view, choice, "uniform_valid");
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::RandomAi;
    use maumau_core::model::card::Card;
    use maumau_core::model::deck::Deck;
    use maumau_core::model::rank::Rank;
    use maumau_core::model::suit::Suit;
    use maumau_core::rules::is_valid;
    use maumau_core::strategy::{Strategy, TableView};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn only_picks_valid_cards_and_covers_all_of_them() {
        let hand = [
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::Three, Suit::Clubs),
            Card::new(Rank::Nine, Suit::Spades),
            Card::new(Rank::Jack, Suit::Diamonds),
        ];
        let top = Card::new(Rank::Nine, Suit::Hearts);
        let deck = Deck::default();
        let view = TableView {
            hand: &hand,
            top,
            asked: None,
            deck: &deck,
        };
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let choice = RandomAi.choose(&view, &mut rng).expect("a valid card exists");
            assert!(is_valid(hand[choice.index], top, None));
            assert!(choice.declared.is_some());
            seen.insert(choice.index);
        }
        assert_eq!(seen, HashSet::from([0, 2, 3]));
    }

    #[test]
    fn declines_without_valid_cards() {
        let hand = [Card::new(Rank::Three, Suit::Clubs)];
        let deck = Deck::default();
        let view = TableView {
            hand: &hand,
            top: Card::new(Rank::Nine, Suit::Hearts),
            asked: None,
            deck: &deck,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(RandomAi.choose(&view, &mut rng), None);
    }
}
