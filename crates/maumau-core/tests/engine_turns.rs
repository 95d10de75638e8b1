use std::sync::Arc;

use maumau_core::game::{
    AceRule, Direction, Game, GameConfig, GameError, QueenRule, RuleSet, StartingPlayer,
    TableLayout, TurnOutcome,
};
use maumau_core::model::deck::Deck;
use maumau_core::model::hand::Hand;
use maumau_core::model::player::Player;
use maumau_core::rules::{self, IllegalMove};
use maumau_core::{Card, Choice, Rank, Strategy, Suit, TableView};
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

struct Decline;

impl Strategy for Decline {
    fn name(&self) -> &str {
        "decline"
    }

    fn choose(&self, _view: &TableView<'_>, _rng: &mut dyn RngCore) -> Option<Choice> {
        None
    }
}

/// Plays the first legal card, demanding spades with a jack.
struct FirstLegal;

impl Strategy for FirstLegal {
    fn name(&self) -> &str {
        "first_legal"
    }

    fn choose(&self, view: &TableView<'_>, _rng: &mut dyn RngCore) -> Option<Choice> {
        let index = *rules::valid_indexes(view.hand, view.top, view.asked).first()?;
        if view.hand[index].is_wild() {
            Some(Choice::wild(index, Suit::Spades))
        } else {
            Some(Choice::play(index))
        }
    }
}

/// Always returns the same choice, legal or not.
struct Fixed(Choice);

impl Strategy for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn choose(&self, _view: &TableView<'_>, _rng: &mut dyn RngCore) -> Option<Choice> {
        Some(self.0)
    }
}

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn seat(strategy: Arc<dyn Strategy>, cards: Vec<Card>) -> Player {
    Player::with_hand(Hand::with_cards(cards), strategy)
}

fn filler(count: usize) -> Vec<Card> {
    vec![card(Rank::King, Suit::Diamonds); count]
}

fn table(players: Vec<Player>, deck: Deck, top: Card) -> TableLayout {
    TableLayout {
        players,
        deck,
        discard: Vec::new(),
        top,
        asked: None,
        active: 0,
        direction: Direction::Forward,
    }
}

fn game(config: GameConfig, layout: TableLayout) -> Game<StdRng> {
    Game::from_layout(config, layout, StdRng::seed_from_u64(99)).expect("layout accepted")
}

fn decliners(count: usize) -> Vec<Player> {
    (0..count)
        .map(|_| seat(Arc::new(Decline), filler(2)))
        .collect()
}

#[test]
fn new_game_deals_and_conserves_cards() {
    let strategies: Vec<Arc<dyn Strategy>> = (0..3)
        .map(|_| Arc::new(Decline) as Arc<dyn Strategy>)
        .collect();
    let config = GameConfig {
        starting_player: StartingPlayer::Fixed,
        ..GameConfig::default()
    };
    let game = Game::new(config, strategies, StdRng::seed_from_u64(5)).unwrap();

    assert_eq!(game.active(), 0);
    assert_eq!(game.direction(), Direction::Forward);
    assert_eq!(game.asked(), None);
    assert!(game.players().iter().all(|p| p.hand().len() == 5));
    assert_eq!(game.deck().len(), 52 - 15 - 1);
    assert!(game.discard().is_empty());
    assert_eq!(game.card_count(), 52);
}

#[test]
fn new_game_rejects_unplayable_configuration() {
    let strategies: Vec<Arc<dyn Strategy>> = vec![Arc::new(Decline) as Arc<dyn Strategy>; 6];
    let config = GameConfig {
        starting_cards: 9,
        ..GameConfig::default()
    };
    let err = Game::new(config, strategies, StdRng::seed_from_u64(5)).unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig { .. }));
}

#[test]
fn random_start_stays_within_table() {
    for seed in 0..32 {
        let strategies: Vec<Arc<dyn Strategy>> = vec![Arc::new(Decline) as Arc<dyn Strategy>; 4];
        let game =
            Game::new(GameConfig::default(), strategies, StdRng::seed_from_u64(seed)).unwrap();
        assert!(game.active() < 4);
    }
}

#[test]
fn forward_order_cycles_through_every_seat() {
    let mut game = game(
        GameConfig::default(),
        table(decliners(3), Deck::build(1), card(Rank::Two, Suit::Hearts)),
    );
    let mut order = vec![game.active()];
    for _ in 0..6 {
        assert!(matches!(game.play_turn().unwrap(), TurnOutcome::Drew { .. }));
        order.push(game.active());
    }
    assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn backward_order_cycles_in_reverse() {
    let mut layout = table(decliners(3), Deck::build(1), card(Rank::Two, Suit::Hearts));
    layout.direction = Direction::Backward;
    let mut game = game(GameConfig::default(), layout);
    let mut order = vec![game.active()];
    for _ in 0..6 {
        game.play_turn().unwrap();
        order.push(game.active());
    }
    assert_eq!(order, vec![0, 2, 1, 0, 2, 1, 0]);
}

#[test]
fn forced_draw_takes_front_card() {
    let deck = Deck::from_cards([card(Rank::Four, Suit::Clubs), card(Rank::Five, Suit::Clubs)]);
    let mut game = game(
        GameConfig::default(),
        table(decliners(2), deck, card(Rank::Two, Suit::Hearts)),
    );
    assert_eq!(game.play_turn().unwrap(), TurnOutcome::Drew { player: 0 });
    let hand = game.hand(0).unwrap();
    assert_eq!(hand.len(), 3);
    assert_eq!(hand.cards()[2], card(Rank::Four, Suit::Clubs));
    assert_eq!(game.deck().len(), 1);
}

#[test]
fn wild_without_declared_suit_is_illegal() {
    let players = vec![
        seat(
            Arc::new(Fixed(Choice::play(0))),
            vec![card(Rank::Jack, Suit::Clubs), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts)),
    );
    let err = game.play_turn().unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalMove {
            player: 0,
            strategy: "fixed".to_string(),
            violation: IllegalMove::MissingDeclaredSuit {
                card: card(Rank::Jack, Suit::Clubs)
            },
        }
    );
}

#[test]
fn wild_with_declared_suit_sets_asked_suit() {
    let players = vec![
        seat(
            Arc::new(Fixed(Choice::wild(0, Suit::Diamonds))),
            vec![card(Rank::Jack, Suit::Clubs), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
        seat(Arc::new(Decline), filler(2)),
    ];
    let top = card(Rank::Nine, Suit::Hearts);
    let mut game = game(GameConfig::default(), table(players, Deck::build(1), top));
    let outcome = game.play_turn().unwrap();

    assert!(matches!(outcome, TurnOutcome::Played { player: 0, .. }));
    assert_eq!(game.asked(), Some(Suit::Diamonds));
    assert_eq!(game.top(), card(Rank::Jack, Suit::Clubs));
    assert_eq!(game.discard(), &[top]);
    assert_eq!(game.active(), 1);
}

#[test]
fn any_other_play_clears_asked_suit() {
    let players = vec![
        seat(
            Arc::new(FirstLegal),
            vec![card(Rank::Three, Suit::Diamonds), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut layout = table(players, Deck::build(1), card(Rank::Jack, Suit::Hearts));
    layout.asked = Some(Suit::Diamonds);
    let mut game = game(GameConfig::default(), layout);
    game.play_turn().unwrap();
    assert_eq!(game.top(), card(Rank::Three, Suit::Diamonds));
    assert_eq!(game.asked(), None);
}

#[test]
fn playing_off_suit_under_asked_suit_is_illegal() {
    let players = vec![
        seat(
            Arc::new(Fixed(Choice::play(0))),
            vec![card(Rank::Nine, Suit::Hearts), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut layout = table(players, Deck::build(1), card(Rank::Jack, Suit::Hearts));
    layout.asked = Some(Suit::Spades);
    let mut game = game(GameConfig::default(), layout);
    let err = game.play_turn().unwrap_err();
    assert!(matches!(
        err,
        GameError::IllegalMove {
            violation: IllegalMove::AskedSuitMismatch { .. },
            ..
        }
    ));
}

#[test]
fn unmatched_card_is_illegal() {
    let players = vec![
        seat(
            Arc::new(Fixed(Choice::play(0))),
            vec![card(Rank::Four, Suit::Clubs), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts)),
    );
    assert!(matches!(
        game.play_turn().unwrap_err(),
        GameError::IllegalMove {
            violation: IllegalMove::NoMatch { .. },
            ..
        }
    ));
}

#[test]
fn seven_makes_next_player_draw_two_and_skips_them() {
    let players = vec![
        seat(
            Arc::new(FirstLegal),
            vec![card(Rank::Seven, Suit::Hearts), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(3)),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts)),
    );
    let before = game.hand(1).unwrap().len();
    game.play_turn().unwrap();

    assert_eq!(game.hand(1).unwrap().len(), before + 2);
    assert_eq!(game.active(), 2);
}

#[test]
fn seven_recycles_discard_when_deck_runs_dry() {
    let players = vec![
        seat(
            Arc::new(FirstLegal),
            vec![card(Rank::Seven, Suit::Hearts), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(1)),
    ];
    let mut layout = table(players, Deck::default(), card(Rank::Nine, Suit::Hearts));
    layout.discard = vec![card(Rank::Three, Suit::Spades)];
    let mut game = game(GameConfig::default(), layout);
    let total = game.card_count();
    game.play_turn().unwrap();

    assert_eq!(game.hand(1).unwrap().len(), 3);
    assert!(game.hand(1).unwrap().contains(card(Rank::Nine, Suit::Hearts)));
    assert!(game.hand(1).unwrap().contains(card(Rank::Three, Suit::Spades)));
    assert!(game.discard().is_empty());
    assert!(game.deck().is_empty());
    assert_eq!(game.card_count(), total);
    assert_eq!(game.active(), 0);
}

#[test]
fn draw_with_no_supply_left_is_fatal() {
    let players = decliners(2);
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::default(), card(Rank::Two, Suit::Hearts)),
    );
    assert_eq!(game.play_turn().unwrap_err(), GameError::ExhaustedSupply);
}

fn ace_table() -> TableLayout {
    let players = vec![
        seat(
            Arc::new(FirstLegal),
            vec![card(Rank::Ace, Suit::Hearts), card(Rank::Two, Suit::Clubs)],
        ),
        seat(Arc::new(Decline), filler(2)),
        seat(Arc::new(Decline), filler(2)),
    ];
    table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts))
}

#[test]
fn ace_skips_next_player_by_default() {
    let mut game = game(GameConfig::default(), ace_table());
    game.play_turn().unwrap();
    assert_eq!(game.active(), 2);
}

#[test]
fn ace_without_effect_passes_normally() {
    let config = GameConfig {
        rules: RuleSet {
            ace: AceRule::NoEffect,
            ..RuleSet::default()
        },
        ..GameConfig::default()
    };
    let mut game = game(config, ace_table());
    game.play_turn().unwrap();
    assert_eq!(game.active(), 1);
}

fn queen_table(seats: usize) -> TableLayout {
    let mut players = vec![seat(
        Arc::new(FirstLegal),
        vec![card(Rank::Queen, Suit::Hearts), card(Rank::Two, Suit::Clubs)],
    )];
    players.extend(decliners(seats - 1));
    table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts))
}

#[test]
fn queen_reverses_direction_with_three_players() {
    let mut game = game(GameConfig::default(), queen_table(3));
    game.play_turn().unwrap();
    assert_eq!(game.direction(), Direction::Backward);
    assert_eq!(game.active(), 2);
}

#[test]
fn queen_skips_opponent_with_two_players() {
    let mut game = game(GameConfig::default(), queen_table(2));
    game.play_turn().unwrap();
    assert_eq!(game.direction(), Direction::Forward);
    assert_eq!(game.active(), 0);
}

#[test]
fn queen_reverse_rule_with_two_players_passes_to_opponent() {
    let config = GameConfig {
        rules: RuleSet {
            two_player_queen: QueenRule::Reverse,
            ..RuleSet::default()
        },
        ..GameConfig::default()
    };
    let mut game = game(config, queen_table(2));
    game.play_turn().unwrap();
    assert_eq!(game.direction(), Direction::Backward);
    assert_eq!(game.active(), 1);
}

#[test]
fn emptying_hand_wins_before_effects_apply() {
    let seven = card(Rank::Seven, Suit::Hearts);
    let players = vec![
        seat(Arc::new(FirstLegal), vec![seven]),
        seat(Arc::new(Decline), filler(2)),
    ];
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts)),
    );
    let outcome = game.play_turn().unwrap();

    assert!(matches!(outcome, TurnOutcome::Won { player: 0, .. }));
    assert_eq!(game.active(), 0);
    assert_eq!(game.top(), seven);
    assert_eq!(game.hand(1).unwrap().len(), 2);
}

#[test]
fn run_reports_winner_and_turns() {
    let players = vec![
        seat(Arc::new(Decline), filler(3)),
        seat(
            Arc::new(FirstLegal),
            vec![card(Rank::Two, Suit::Hearts), card(Rank::Two, Suit::Spades)],
        ),
    ];
    let mut game = game(
        GameConfig::default(),
        table(players, Deck::build(1), card(Rank::Nine, Suit::Hearts)),
    );
    let outcome = game.run().unwrap();
    assert_eq!(outcome.winner, 1);
    assert_eq!(outcome.turns, 4);
}

#[test]
fn turn_limit_stops_endless_games() {
    let config = GameConfig {
        turn_limit: Some(3),
        ..GameConfig::default()
    };
    let mut game = game(config, table(decliners(2), Deck::build(1), card(Rank::Two, Suit::Hearts)));
    assert_eq!(game.run().unwrap_err(), GameError::TurnLimit { limit: 3 });
    assert_eq!(game.turns(), 3);
}

#[test]
fn snapshot_reflects_table() {
    let game = game(
        GameConfig::default(),
        table(decliners(2), Deck::build(1), card(Rank::Two, Suit::Hearts)),
    );
    let snapshot = game.snapshot();
    assert_eq!(snapshot.deck, 52);
    assert_eq!(snapshot.hands.len(), 2);
    assert!(snapshot.to_string().starts_with("-> 52 0 0 2/2 0 1 ["));
}
