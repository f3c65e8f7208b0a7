//! Whole-game properties exercised through the public API.
//!
//! Run with:
//!     cargo test --test scenarios

use rand::rngs::StdRng;
use rand::SeedableRng;

use whaleopoly_engine::engine::activity::ActivitySink;
use whaleopoly_engine::engine::config::RulesConfig;
use whaleopoly_engine::engine::models::{ActivityEntry, GameConfig, Player, Severity};
use whaleopoly_engine::game::board::{tile, TileKind, GO_TO_JAIL_TILE, JAIL_TILE};
use whaleopoly_engine::game::cards::DeckId;
use whaleopoly_engine::game::state::{Action, Dice, GameState, RuleViolation, TurnPhase};
use whaleopoly_engine::game::Game;

fn fresh(seed: u64) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    GameState::new(Player::default_seats(), &RulesConfig::default(), &mut rng)
}

fn apply(state: &mut GameState, action: Action) -> Result<Vec<ActivityEntry>, RuleViolation> {
    let mut sink = Vec::new();
    state.apply(&action, &RulesConfig::default(), &mut sink)?;
    Ok(sink)
}

fn dice_for(total: u8) -> Dice {
    let first = (total - 1).min(6);
    Dice(first, total - first)
}

#[test]
fn every_roll_moves_by_its_total_and_pays_start_on_wrap() {
    for total in 2..=12u8 {
        for from in 0..40u8 {
            let mut state = fresh(1);
            state.positions[0] = from;
            apply(&mut state, Action::Roll { dice: Some(dice_for(total)) }).unwrap();

            let landed = (from + total) % 40;
            let expected_pos = if landed == GO_TO_JAIL_TILE { JAIL_TILE } else { landed };
            assert_eq!(state.position(0), expected_pos, "from {} by {}", from, total);

            let mut expected_cash = 1500;
            if from + total >= 40 {
                expected_cash += 200;
            }
            if tile(landed).map(|t| t.kind) == Some(TileKind::Tax) {
                expected_cash -= 100;
            }
            assert_eq!(state.cash_of(0), expected_cash, "from {} by {}", from, total);
        }
    }
}

#[test]
fn wrapping_onto_a_card_tile_blocks_rolling_until_applied() {
    let mut state = fresh(3);
    state.positions[0] = 35;
    let entries = apply(&mut state, Action::Roll { dice: Some(Dice(3, 4)) }).unwrap();

    assert_eq!(state.position(0), 2);
    assert_eq!(state.cash_of(0), 1700);
    assert!(entries.iter().any(|e| e.title.contains("passed Start")));
    assert_eq!(state.phase, TurnPhase::AwaitingCard);
    let pending = state.pending_card.clone().unwrap();
    assert_eq!(pending.card.deck, DeckId::Community);

    assert_eq!(
        apply(&mut state, Action::Roll { dice: Some(Dice(1, 1)) }).unwrap_err(),
        RuleViolation::CardPending
    );
    assert_eq!(apply(&mut state, Action::EndTurn).unwrap_err(), RuleViolation::CardPending);

    apply(&mut state, Action::ApplyCard).unwrap();
    assert!(state.pending_card.is_none());
    assert_eq!(state.phase, TurnPhase::TurnReady);
}

#[test]
fn unowned_railroad_charges_nothing_even_beside_a_near_monopoly() {
    let mut state = fresh(4);
    for r in [5, 15, 25] {
        apply(&mut state, Action::Buy { tile: r }).unwrap();
    }
    apply(&mut state, Action::EndTurn).unwrap();

    state.positions[1] = 33;
    apply(&mut state, Action::Roll { dice: Some(Dice(1, 1)) }).unwrap();
    assert_eq!(state.position(1), 35);
    assert_eq!(state.cash_of(1), 1500);

    apply(&mut state, Action::Roll { dice: Some(Dice(4, 6)) }).unwrap();
    assert_eq!(state.position(1), 5);
    assert_eq!(state.cash_of(1), 1500 + 200 - 100);
    assert_eq!(state.cash_of(0), 1500 - 600 + 100);
}

#[test]
fn keepable_cards_leave_the_deck_for_good() {
    let mut game = Game::new(
        GameConfig {
            game_id: 1,
            random_seed: Some(17),
        },
        RulesConfig::default(),
    );
    let mut withdrawn = 0;
    for _ in 0..24 {
        let before = game.state().deck(DeckId::Community).len();
        let keepable = game
            .state()
            .deck(DeckId::Community)
            .peek()
            .map(|c| c.is_keepable())
            .unwrap_or(false);
        game.draw_card(DeckId::Community).unwrap();
        game.apply_pending_card().unwrap();
        let after = game.state().deck(DeckId::Community).len();
        if keepable {
            withdrawn += 1;
            assert_eq!(after, before - 1);
        } else {
            assert_eq!(after, before);
        }
    }
    assert_eq!(withdrawn, 1);
    assert_eq!(game.state().deck(DeckId::Community).len(), 11);
    assert_eq!(game.state().release_tokens.iter().sum::<u32>(), 1);
}

#[test]
fn ending_a_turn_ticks_every_jail_counter() {
    let mut state = fresh(5);
    state.jail.imprison(1, 3);
    state.jail.imprison(2, 1);
    apply(&mut state, Action::EndTurn).unwrap();
    assert_eq!(state.jail.remaining(1), 2);
    assert_eq!(state.jail.remaining(2), 0);
    assert_eq!(state.jail.remaining(0), 0);
    assert_eq!(state.current, 1);

    assert_eq!(
        apply(&mut state, Action::Roll { dice: Some(Dice(2, 2)) }).unwrap_err(),
        RuleViolation::Jailed
    );
    apply(&mut state, Action::PayBail).unwrap();
    assert_eq!(state.cash_of(1), 1450);
    apply(&mut state, Action::Roll { dice: Some(Dice(2, 2)) }).unwrap();
    assert_eq!(state.position(1), 4);
}

#[test]
fn mortgage_round_trip_costs_a_tenth() {
    let mut game = Game::new(GameConfig::default(), RulesConfig::default());
    game.buy(39).unwrap();
    let original = game.state().cash_of(0);
    game.mortgage(39).unwrap();
    game.unmortgage(39).unwrap();
    assert_eq!(game.state().cash_of(0), original - 20);
}

#[test]
fn rejections_change_nothing_but_the_feed() {
    let mut game = Game::new(
        GameConfig {
            game_id: 2,
            random_seed: Some(2),
        },
        RulesConfig::default(),
    );
    let before = game.state().clone();
    assert_eq!(game.build(1), Err(RuleViolation::NotOwner(1)));
    assert_eq!(game.use_release_token(), Err(RuleViolation::NotJailed));
    assert_eq!(game.unmortgage(1), Err(RuleViolation::NotOwner(1)));
    assert_eq!(game.state(), &before);

    let warnings: Vec<_> = game
        .activity()
        .iter()
        .filter(|e| e.severity == Severity::Warn)
        .collect();
    assert_eq!(warnings.len(), 3);
}

#[test]
fn feed_keeps_only_the_latest_entries() {
    let mut game = Game::new(GameConfig::default(), RulesConfig::default());
    for _ in 0..40 {
        game.end_turn().unwrap();
    }
    assert_eq!(game.activity().len(), 25);
    assert_eq!(game.activity().latest().unwrap().title, "Turn ended");
}

#[test]
fn custom_sink_sees_every_transition() {
    struct Counter(usize);
    impl ActivitySink for Counter {
        fn record(&mut self, _entry: ActivityEntry) {
            self.0 += 1;
        }
    }

    let mut state = fresh(6);
    let mut counter = Counter(0);
    let rules = RulesConfig::default();
    state.apply(&Action::Buy { tile: 1 }, &rules, &mut counter).unwrap();
    state.apply(&Action::EndTurn, &rules, &mut counter).unwrap();
    assert_eq!(counter.0, 2);
}
