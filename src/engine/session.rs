//! Async table driver: wraps a `Game` with the presentation delay and the
//! optional remote authority.
//!
//! One action runs at a time (`&mut self`), so the game state never sees two
//! interleaved mutations. The delay sits between producing dice and committing
//! the move and has no effect on the resulting state.

use std::time::Duration;

use crate::engine::authority::{Offline, PurchaseVerdict, RemoteAuthority};
use crate::engine::bot_strategy::BotStrategy;
use crate::engine::config::{RulesConfig, SessionConfig};
use crate::engine::models::GameConfig;
use crate::engine::simulator::{TurnReport, MAX_STEPS_PER_TURN};
use crate::game::board::TileId;
use crate::game::state::{Action, Dice, GameState, RuleViolation};
use crate::game::Game;

pub struct Table<A: RemoteAuthority = Offline> {
    game: Game,
    authority: A,
    session: SessionConfig,
}

impl Table<Offline> {
    pub fn offline(config: GameConfig, rules: RulesConfig, session: SessionConfig) -> Self {
        Self::new(config, rules, session, Offline)
    }
}

impl<A: RemoteAuthority> Table<A> {
    pub fn new(config: GameConfig, rules: RulesConfig, session: SessionConfig, authority: A) -> Self {
        let game = Game::with_capacity(config, rules, session.activity_capacity);
        Self {
            game,
            authority,
            session,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.session.remote_timeout_ms)
    }

    /// Roll for the active player. Remote dice win when they arrive in time
    /// and are in range; otherwise the game's own RNG is used.
    pub async fn roll(&mut self) -> Result<Dice, RuleViolation> {
        let probe = Action::Roll { dice: None };
        if let Err(violation) = self.game.validate(&probe) {
            return Err(self.game.reject(&probe, violation));
        }

        let game_id = self.game.game_id();
        let remote = tokio::time::timeout(self.remote_timeout(), self.authority.remote_roll(game_id)).await;
        let dice = match remote {
            Ok(Some(dice)) if dice.is_valid() => {
                tracing::debug!(game_id, ?dice, "using remote dice");
                dice
            }
            Ok(Some(dice)) => {
                tracing::warn!(game_id, ?dice, "remote dice out of range, rolling locally");
                self.game.roll_dice()
            }
            Ok(None) => {
                tracing::debug!(game_id, "remote roll unavailable, rolling locally");
                self.game.roll_dice()
            }
            Err(_) => {
                tracing::warn!(game_id, timeout_ms = self.session.remote_timeout_ms, "remote roll timed out, rolling locally");
                self.game.roll_dice()
            }
        };

        if self.session.roll_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.session.roll_delay_ms)).await;
        }
        self.game.roll_with(dice)
    }

    /// Buy a tile. The authority is only asked once the purchase is locally
    /// valid, and the local purchase goes ahead whatever it answers.
    pub async fn buy(&mut self, tile: TileId) -> Result<(), RuleViolation> {
        let action = Action::Buy { tile };
        if let Err(violation) = self.game.validate(&action) {
            return Err(self.game.reject(&action, violation));
        }

        let game_id = self.game.game_id();
        let verdict = tokio::time::timeout(self.remote_timeout(), self.authority.remote_purchase(game_id, tile))
            .await
            .unwrap_or(PurchaseVerdict::Unavailable);
        match verdict {
            PurchaseVerdict::Accepted => tracing::debug!(game_id, tile, "remote purchase accepted"),
            PurchaseVerdict::Unavailable => {
                tracing::warn!(game_id, tile, "remote purchase unavailable, recording locally")
            }
        }
        self.game.dispatch(action)
    }

    /// Run any action, routing rolls and purchases through the remote path.
    pub async fn execute(&mut self, action: Action) -> Result<(), RuleViolation> {
        match action {
            Action::Roll { dice: None } => self.roll().await.map(|_| ()),
            Action::Buy { tile } => self.buy(tile).await,
            other => self.game.dispatch(other),
        }
    }

    /// Run `actions` in order. Rejections are recorded and do not stop the replay.
    pub async fn replay(&mut self, actions: &[Action]) -> Vec<Result<(), RuleViolation>> {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            results.push(self.execute(action.clone()).await);
        }
        results
    }

    /// Let `strategy` play the active seat's turn through this table.
    pub async fn autoplay_turn(&mut self, strategy: &dyn BotStrategy) -> TurnReport {
        let mut report = TurnReport {
            seat: self.state().current,
            ..TurnReport::default()
        };
        for _ in 0..MAX_STEPS_PER_TURN {
            let action = strategy.choose_action(self.game.state(), self.game.rules());
            let ends_turn = action == Action::EndTurn;
            match self.execute(action).await {
                Ok(()) if ends_turn => {
                    report.applied += 1;
                    return report;
                }
                Ok(()) => report.applied += 1,
                Err(_) => report.rejected += 1,
            }
        }
        report.forced = true;
        if self.state().pending_card.is_some() && self.execute(Action::ApplyCard).await.is_ok() {
            report.applied += 1;
        }
        if self.execute(Action::EndTurn).await.is_ok() {
            report.applied += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::Instant;

    use super::*;
    use crate::game::state::TurnPhase;

    #[derive(Clone, Copy)]
    enum Mode {
        Answer(Dice),
        Down,
        Hang,
    }

    struct FakeAuthority {
        mode: Mode,
        accept_purchases: bool,
        calls: AtomicUsize,
    }

    impl FakeAuthority {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                accept_purchases: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RemoteAuthority for FakeAuthority {
        async fn remote_roll(&self, _game_id: u64) -> Option<Dice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Answer(dice) => Some(dice),
                Mode::Down => None,
                Mode::Hang => std::future::pending().await,
            }
        }

        async fn remote_purchase(&self, _game_id: u64, _tile: TileId) -> PurchaseVerdict {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Mode::Hang = self.mode {
                return std::future::pending().await;
            }
            if self.accept_purchases {
                PurchaseVerdict::Accepted
            } else {
                PurchaseVerdict::Unavailable
            }
        }
    }

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            game_id: 9,
            random_seed: Some(seed),
        }
    }

    fn table(mode: Mode) -> Table<FakeAuthority> {
        Table::new(config(3), RulesConfig::default(), SessionConfig::default(), FakeAuthority::new(mode))
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_dice_adopted() {
        let mut table = table(Mode::Answer(Dice(1, 2)));
        let dice = table.roll().await.unwrap();
        assert_eq!(dice, Dice(1, 2));
        assert_eq!(table.state().position(0), 3);
        assert_eq!(table.state().phase, TurnPhase::TurnReady);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_remote_dice_fall_back() {
        let mut table = table(Mode::Answer(Dice(7, 1)));
        let dice = table.roll().await.unwrap();
        assert!(dice.is_valid());
        assert_eq!(table.state().last_dice, Some(dice));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_matches_offline() {
        let mut remote = table(Mode::Down);
        let mut offline = Table::offline(config(3), RulesConfig::default(), SessionConfig::default());
        let a = remote.roll().await.unwrap();
        let b = offline.roll().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(remote.state(), offline.state());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_after_one_round_trip() {
        let mut table = table(Mode::Hang);
        let started = Instant::now();
        let dice = table.roll().await.unwrap();
        let session = SessionConfig::default();
        assert!(dice.is_valid());
        assert!(started.elapsed() >= Duration::from_millis(session.remote_timeout_ms + session.roll_delay_ms));
        assert_eq!(table.state().position(0), dice.total());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_roll_skips_authority() {
        let mut table = table(Mode::Answer(Dice(1, 1)));
        table.game.dispatch(Action::DrawCard { deck: crate::game::cards::DeckId::Fortune }).unwrap();
        assert_eq!(table.roll().await, Err(RuleViolation::CardPending));
        assert_eq!(table.authority.calls.load(Ordering::SeqCst), 0);
        assert_eq!(table.game().activity().latest().unwrap().title, "Not allowed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_purchase_recorded_either_way() {
        let mut accepting = table(Mode::Answer(Dice(1, 1)));
        accepting.buy(1).await.unwrap();
        assert_eq!(accepting.authority.calls.load(Ordering::SeqCst), 1);
        assert_eq!(accepting.state().properties.owner(1), Some(0));

        let mut refusing = table(Mode::Answer(Dice(1, 1)));
        refusing.authority.accept_purchases = false;
        refusing.buy(1).await.unwrap();
        assert_eq!(refusing.authority.calls.load(Ordering::SeqCst), 1);
        assert_eq!(refusing.state().properties.owner(1), Some(0));

        let mut hanging = table(Mode::Hang);
        hanging.buy(1).await.unwrap();
        assert_eq!(hanging.state().properties.owner(1), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_purchase_not_sent_remote() {
        let mut table = table(Mode::Down);
        assert_eq!(table.buy(4).await, Err(RuleViolation::NotPurchasable(4)));
        assert_eq!(table.authority.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_does_not_change_outcome() {
        let slow = SessionConfig {
            roll_delay_ms: 5_000,
            ..SessionConfig::default()
        };
        let fast = SessionConfig {
            roll_delay_ms: 0,
            ..SessionConfig::default()
        };
        let mut a = Table::offline(config(11), RulesConfig::default(), slow);
        let mut b = Table::offline(config(11), RulesConfig::default(), fast);
        for table in [&mut a, &mut b] {
            for _ in 0..8 {
                let _ = table.execute(Action::Roll { dice: None }).await;
                if table.state().pending_card.is_some() {
                    table.execute(Action::ApplyCard).await.unwrap();
                }
                table.execute(Action::EndTurn).await.unwrap();
            }
        }
        assert_eq!(a.state(), b.state());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_matches_simulator() {
        use crate::engine::bot_strategy::GreedyStrategy;
        use crate::engine::simulator::play_turn;

        let bot = GreedyStrategy::default();
        let mut table = Table::offline(config(13), RulesConfig::default(), SessionConfig::default());
        let mut game = Game::new(config(13), RulesConfig::default());
        for _ in 0..12 {
            let a = table.autoplay_turn(&bot).await;
            let b = play_turn(&mut game, &bot);
            assert_eq!(a, b);
        }
        assert_eq!(table.state(), game.state());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_reports_each_action() {
        let mut table = Table::offline(config(1), RulesConfig::default(), SessionConfig::default());
        let results = table
            .replay(&[
                Action::Roll { dice: Some(Dice(2, 3)) },
                Action::Buy { tile: 5 },
                Action::Buy { tile: 5 },
                Action::EndTurn,
            ])
            .await;
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok() && results[1].is_ok() && results[3].is_ok());
        assert_eq!(results[2], Err(RuleViolation::AlreadyOwned(5)));
        assert_eq!(table.state().current, 1);
    }
}
