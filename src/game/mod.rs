//! The local game-state engine and the handle callers drive it through.

pub mod board;
pub mod cards;
pub mod jail;
pub mod ledger;
pub mod property;
pub mod rent;
pub mod state;
pub mod turn;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::activity::{ActivityLog, ActivitySink};
use crate::engine::config::RulesConfig;
use crate::engine::models::{ActivityEntry, GameConfig, Player};
use board::TileId;
use cards::DeckId;
use state::{Action, Dice, GameState, RuleViolation};

/// Owns one session's state, its rules, the dice RNG and the activity feed.
/// All mutation goes through `dispatch`, one action at a time.
pub struct Game {
    config: GameConfig,
    rules: RulesConfig,
    state: GameState,
    rng: StdRng,
    activity: ActivityLog,
}

impl Game {
    pub fn new(config: GameConfig, rules: RulesConfig) -> Self {
        Self::with_capacity(config, rules, crate::engine::activity::DEFAULT_ACTIVITY_CAPACITY)
    }

    pub fn with_capacity(config: GameConfig, rules: RulesConfig, activity_capacity: usize) -> Self {
        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(Player::default_seats(), &rules, &mut rng);
        tracing::debug!(game_id = config.game_id, seed = ?config.random_seed, "game created");
        Self {
            config,
            rules,
            state,
            rng,
            activity: ActivityLog::new(activity_capacity),
        }
    }

    pub fn game_id(&self) -> u64 {
        self.config.game_id
    }

    /// Read-only snapshot of the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Local dice from the seeded RNG.
    pub fn roll_dice(&mut self) -> Dice {
        Dice::roll(&mut self.rng)
    }

    pub fn validate(&self, action: &Action) -> Result<(), RuleViolation> {
        self.state.validate(action, &self.rules)
    }

    /// Apply one action. A roll without dice gets local dice. Rejections are
    /// reported to the activity feed and returned; the state is unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<(), RuleViolation> {
        let action = match action {
            Action::Roll { dice: None } => Action::Roll {
                dice: Some(self.roll_dice()),
            },
            other => other,
        };
        let mut entries: Vec<ActivityEntry> = Vec::new();
        match self.state.apply(&action, &self.rules, &mut entries) {
            Ok(()) => {
                tracing::debug!(?action, entries = entries.len(), "action applied");
                for entry in entries {
                    self.activity.record(entry);
                }
                Ok(())
            }
            Err(violation) => Err(self.reject(&action, violation)),
        }
    }

    /// Report a refused action to the activity feed and hand the reason back.
    pub fn reject(&mut self, action: &Action, violation: RuleViolation) -> RuleViolation {
        tracing::debug!(?action, %violation, "action rejected");
        self.activity
            .record(ActivityEntry::warn("Not allowed", violation.to_string()));
        violation
    }

    pub fn roll(&mut self) -> Result<Dice, RuleViolation> {
        let dice = self.roll_dice();
        self.roll_with(dice)
    }

    pub fn roll_with(&mut self, dice: Dice) -> Result<Dice, RuleViolation> {
        self.dispatch(Action::Roll { dice: Some(dice) }).map(|_| dice)
    }

    pub fn buy(&mut self, tile: TileId) -> Result<(), RuleViolation> {
        self.dispatch(Action::Buy { tile })
    }

    pub fn build(&mut self, tile: TileId) -> Result<(), RuleViolation> {
        self.dispatch(Action::Build { tile })
    }

    pub fn mortgage(&mut self, tile: TileId) -> Result<(), RuleViolation> {
        self.dispatch(Action::Mortgage { tile })
    }

    pub fn unmortgage(&mut self, tile: TileId) -> Result<(), RuleViolation> {
        self.dispatch(Action::Unmortgage { tile })
    }

    pub fn draw_card(&mut self, deck: DeckId) -> Result<(), RuleViolation> {
        self.dispatch(Action::DrawCard { deck })
    }

    pub fn apply_pending_card(&mut self) -> Result<(), RuleViolation> {
        self.dispatch(Action::ApplyCard)
    }

    pub fn pay_bail(&mut self) -> Result<(), RuleViolation> {
        self.dispatch(Action::PayBail)
    }

    pub fn use_release_token(&mut self) -> Result<(), RuleViolation> {
        self.dispatch(Action::UseReleaseToken)
    }

    pub fn end_turn(&mut self) -> Result<(), RuleViolation> {
        self.dispatch(Action::EndTurn)
    }

    pub fn transfer(&mut self, tile: TileId, to: usize) -> Result<(), RuleViolation> {
        self.dispatch(Action::Transfer { tile, to })
    }
}
