//! Autopilot strategies that pick the next action for the active seat.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::config::RulesConfig;
use crate::game::board::tile;
use crate::game::ledger::PropertyLedger;
use crate::game::state::{Action, GameState, TurnPhase};

/// Cash a greedy seat keeps in hand unless its profile says otherwise.
pub const DEFAULT_RESERVE: i64 = 200;

/// A strategy selects the next action for `state.current`.
pub trait BotStrategy: Send + Sync {
    fn choose_action(&self, state: &GameState, rules: &RulesConfig) -> Action;
}

/// Picks a uniformly random legal action.
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl BotStrategy for RandomStrategy {
    fn choose_action(&self, state: &GameState, rules: &RulesConfig) -> Action {
        let legal = state.legal_actions(rules);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        legal.choose(&mut *rng).cloned().unwrap_or(Action::EndTurn)
    }
}

/// Buys whatever it lands on and builds on its sets while it can keep
/// `reserve` in hand. Mortgages undeveloped tiles when its cash goes negative.
#[derive(Debug, Clone)]
pub struct GreedyStrategy {
    pub reserve: i64,
    pub build: bool,
}

impl Default for GreedyStrategy {
    fn default() -> Self {
        Self {
            reserve: DEFAULT_RESERVE,
            build: true,
        }
    }
}

impl GreedyStrategy {
    fn affordable(&self, state: &GameState, cost: i64) -> bool {
        state.cash_of(state.current) - cost >= self.reserve
    }

    fn valid(state: &GameState, rules: &RulesConfig, action: &Action) -> bool {
        state.validate(action, rules).is_ok()
    }

    fn leave_jail(&self, state: &GameState, rules: &RulesConfig) -> Action {
        if state.release_tokens[state.current] > 0 {
            Action::UseReleaseToken
        } else if Self::valid(state, rules, &Action::PayBail) {
            Action::PayBail
        } else {
            Action::EndTurn
        }
    }

    fn develop(&self, state: &GameState, rules: &RulesConfig) -> Option<Action> {
        let seat = state.current;
        state
            .properties
            .owned_by(seat)
            .into_iter()
            .filter(|&id| PropertyLedger::is_buildable(id))
            .filter(|&id| {
                state
                    .properties
                    .build_cost(id)
                    .is_some_and(|cost| self.affordable(state, cost))
            })
            .filter(|&id| Self::valid(state, rules, &Action::Build { tile: id }))
            .min_by_key(|&id| (state.properties.development(id), id))
            .map(|id| Action::Build { tile: id })
    }

    fn raise_cash(&self, state: &GameState, rules: &RulesConfig) -> Option<Action> {
        state
            .properties
            .owned_by(state.current)
            .into_iter()
            .filter(|&id| !state.properties.group_developed(id))
            .map(|id| Action::Mortgage { tile: id })
            .find(|a| Self::valid(state, rules, a))
    }

    fn redeem(&self, state: &GameState, rules: &RulesConfig) -> Option<Action> {
        state
            .properties
            .owned_by(state.current)
            .into_iter()
            .filter(|&id| state.properties.is_mortgaged(id))
            .filter(|&id| tile(id).is_some_and(|t| self.affordable(state, t.unmortgage_cost())))
            .map(|id| Action::Unmortgage { tile: id })
            .find(|a| Self::valid(state, rules, a))
    }
}

impl BotStrategy for GreedyStrategy {
    fn choose_action(&self, state: &GameState, rules: &RulesConfig) -> Action {
        if state.pending_card.is_some() {
            return Action::ApplyCard;
        }
        let seat = state.current;

        match state.phase {
            TurnPhase::AwaitingCard => Action::ApplyCard,
            TurnPhase::AwaitingRoll => {
                if state.jail.is_jailed(seat) {
                    self.leave_jail(state, rules)
                } else {
                    Action::Roll { dice: None }
                }
            }
            TurnPhase::TurnReady => {
                let here = state.position(seat);
                if let Some(t) = tile(here) {
                    let buy = Action::Buy { tile: here };
                    if t.kind.is_purchasable()
                        && self.affordable(state, t.price.unwrap_or(0))
                        && Self::valid(state, rules, &buy)
                    {
                        return buy;
                    }
                }
                if state.cash_of(seat) < 0 {
                    if let Some(action) = self.raise_cash(state, rules) {
                        return action;
                    }
                    return Action::EndTurn;
                }
                if self.build {
                    if let Some(action) = self.develop(state, rules) {
                        return action;
                    }
                }
                self.redeem(state, rules).unwrap_or(Action::EndTurn)
            }
        }
    }
}
