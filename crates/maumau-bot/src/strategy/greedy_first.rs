use super::log_decision;
use maumau_core::model::suit::Suit;
use maumau_core::strategy::{Choice, Strategy, TableView};
use rand::RngCore;

/// Looks only at the first card in hand and plays it when legal. Jacks always
/// demand spades.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyFirstAi;

impl Strategy for GreedyFirstAi {
    fn name(&self) -> &str {
        "greedy_first"
    }

    fn choose(&self, view: &TableView<'_>, _rng: &mut dyn RngCore) -> Option<Choice> {
        let first = view.hand.first()?;
        let (choice, reason) = if first.is_wild() {
            (Some(Choice::wild(0, Suit::Spades)), "wild")
        } else if let Some(asked) = view.asked {
            if first.suit == asked {
                (Some(Choice::play(0)), "follows_asked")
            } else {
                (None, "off_asked")
            }
        } else if first.rank == view.top.rank || first.suit == view.top.suit {
            (Some(Choice::play(0)), "matches_top")
        } else {
            (None, "no_match")
        };
        log_decision(self.name(), view, choice, reason);
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::GreedyFirstAi;
    use maumau_core::model::card::Card;
    use maumau_core::model::deck::Deck;
    use maumau_core::model::rank::Rank;
    use maumau_core::model::suit::Suit;
    use maumau_core::strategy::{Choice, Strategy, TableView};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn decide(hand: &[Card], top: Card, asked: Option<Suit>) -> Option<Choice> {
        let deck = Deck::default();
        let view = TableView {
            hand,
            top,
            asked,
            deck: &deck,
        };
        GreedyFirstAi.choose(&view, &mut StdRng::seed_from_u64(0))
    }

    #[test]
    fn jack_in_front_demands_spades() {
        let hand = [Card::new(Rank::Jack, Suit::Hearts)];
        let top = Card::new(Rank::Two, Suit::Clubs);
        assert_eq!(
            decide(&hand, top, Some(Suit::Diamonds)),
            Some(Choice::wild(0, Suit::Spades))
        );
    }

    #[test]
    fn ignores_later_playable_cards() {
        let hand = [
            Card::new(Rank::Three, Suit::Clubs),
            Card::new(Rank::Nine, Suit::Hearts),
        ];
        let top = Card::new(Rank::Nine, Suit::Hearts);
        assert_eq!(decide(&hand, top, None), None);
    }

    #[test]
    fn follows_rank_suit_or_asked_suit() {
        let top = Card::new(Rank::Nine, Suit::Hearts);
        assert_eq!(
            decide(&[Card::new(Rank::Nine, Suit::Clubs)], top, None),
            Some(Choice::play(0))
        );
        assert_eq!(
            decide(&[Card::new(Rank::Two, Suit::Hearts)], top, None),
            Some(Choice::play(0))
        );
        assert_eq!(
            decide(&[Card::new(Rank::Two, Suit::Hearts)], top, Some(Suit::Clubs)),
            None
        );
        assert_eq!(
            decide(&[Card::new(Rank::Two, Suit::Clubs)], top, Some(Suit::Clubs)),
            Some(Choice::play(0))
        );
    }

    #[test]
    fn empty_hand_declines() {
        assert_eq!(decide(&[], Card::new(Rank::Two, Suit::Clubs), None), None);
    }
}
