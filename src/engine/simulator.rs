//! Synchronous autoplay: drives a `Game` turn by turn with one strategy per seat.
//! Used by the arena, the bench and the integration tests.

use serde::Serialize;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::Seat;
use crate::game::state::Action;
use crate::game::Game;

/// Actions a strategy may take within one turn before the turn is forced to end.
pub const MAX_STEPS_PER_TURN: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub seat: Seat,
    pub applied: usize,
    pub rejected: usize,
    /// The step cap was hit and the turn was closed on the strategy's behalf.
    pub forced: bool,
}

/// Play the active seat's turn until it ends.
pub fn play_turn(game: &mut Game, strategy: &dyn BotStrategy) -> TurnReport {
    let mut report = TurnReport {
        seat: game.state().current,
        ..TurnReport::default()
    };

    for _ in 0..MAX_STEPS_PER_TURN {
        let action = strategy.choose_action(game.state(), game.rules());
        let ends_turn = action == Action::EndTurn;
        match game.dispatch(action) {
            Ok(()) => {
                report.applied += 1;
                if ends_turn {
                    return report;
                }
            }
            Err(_) => report.rejected += 1,
        }
    }

    tracing::debug!(seat = report.seat, "turn step cap reached, closing turn");
    report.forced = true;
    if game.state().pending_card.is_some() && game.apply_pending_card().is_ok() {
        report.applied += 1;
    }
    if game.end_turn().is_ok() {
        report.applied += 1;
    }
    report
}

/// Final standing of one seat after autoplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatOutcome {
    pub seat: Seat,
    pub player_id: String,
    pub cash: i64,
    pub net_worth: i64,
    pub tiles_owned: usize,
}

impl SeatOutcome {
    pub fn is_insolvent(&self) -> bool {
        self.cash < 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub turns: usize,
    pub forced_turns: usize,
    pub rejected: usize,
    pub seats: Vec<SeatOutcome>,
}

impl GameSummary {
    /// The single seat with the highest net worth, or `None` on a tie.
    pub fn richest(&self) -> Option<Seat> {
        let best = self.seats.iter().map(|s| s.net_worth).max()?;
        let mut leaders = self.seats.iter().filter(|s| s.net_worth == best);
        let first = leaders.next()?;
        match leaders.next() {
            Some(_) => None,
            None => Some(first.seat),
        }
    }
}

/// Play `turns` full turns, one strategy per seat in seat order.
pub fn play_game(game: &mut Game, strategies: &[&dyn BotStrategy], turns: usize) -> GameSummary {
    let mut summary = GameSummary {
        turns: 0,
        forced_turns: 0,
        rejected: 0,
        seats: Vec::new(),
    };
    if strategies.is_empty() {
        summary.seats = standings(game);
        return summary;
    }

    for _ in 0..turns {
        let seat = game.state().current;
        let strategy = strategies[seat % strategies.len()];
        let report = play_turn(game, strategy);
        summary.turns += 1;
        summary.rejected += report.rejected;
        if report.forced {
            summary.forced_turns += 1;
        }
    }
    summary.seats = standings(game);
    summary
}

pub fn standings(game: &Game) -> Vec<SeatOutcome> {
    let state = game.state();
    state
        .players
        .iter()
        .enumerate()
        .map(|(seat, player)| SeatOutcome {
            seat,
            player_id: player.player_id.clone(),
            cash: state.cash_of(seat),
            net_worth: state.net_worth(seat),
            tiles_owned: state.properties.owned_by(seat).len(),
        })
        .collect()
}
