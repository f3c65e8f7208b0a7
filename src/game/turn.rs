//! Turn engine: dice, movement, tile resolution, cards, jail and end of turn.

use super::board::{
    nearest_ahead, tile, TileId, TileKind, BOARD_SIZE, JAIL_TILE, RAILROADS, UTILITIES,
};
use super::cards::{CardEffect, DeckId};
use super::rent::rent_due;
use super::state::{Dice, GameState, PendingCard, RuleViolation, TurnPhase};
use crate::engine::activity::ActivitySink;
use crate::engine::config::RulesConfig;
use crate::engine::models::{money, ActivityEntry, Seat};

impl GameState {
    // --- checks ---

    pub(crate) fn check_roll(&self, dice: Option<Dice>) -> Result<(), RuleViolation> {
        self.require_no_pending()?;
        if self.jail.is_jailed(self.current) {
            return Err(RuleViolation::Jailed);
        }
        if let Some(d) = dice {
            if !d.is_valid() {
                return Err(RuleViolation::InvalidDice(d.0, d.1));
            }
        }
        Ok(())
    }

    pub(crate) fn check_draw(&self, deck: DeckId) -> Result<(), RuleViolation> {
        self.require_no_pending()?;
        if self.deck(deck).is_empty() {
            return Err(RuleViolation::DeckEmpty(deck));
        }
        Ok(())
    }

    pub(crate) fn check_apply_card(&self) -> Result<(), RuleViolation> {
        if self.pending_card.is_none() {
            return Err(RuleViolation::NoPendingCard);
        }
        Ok(())
    }

    pub(crate) fn check_pay_bail(&self, rules: &RulesConfig) -> Result<(), RuleViolation> {
        if !self.jail.is_jailed(self.current) {
            return Err(RuleViolation::NotJailed);
        }
        self.require_funds(self.current, rules.bail)
    }

    pub(crate) fn check_release_token(&self) -> Result<(), RuleViolation> {
        if !self.jail.is_jailed(self.current) {
            return Err(RuleViolation::NotJailed);
        }
        if self.release_tokens[self.current] == 0 {
            return Err(RuleViolation::NoReleaseToken);
        }
        Ok(())
    }

    // --- transitions (validated by the caller) ---

    pub(crate) fn roll(&mut self, dice: Dice, rules: &RulesConfig, sink: &mut dyn ActivitySink) {
        let seat = self.current;
        self.last_dice = Some(dice);
        tracing::debug!(seat, d1 = dice.0, d2 = dice.1, "dice rolled");

        let from = self.positions[seat];
        let unwrapped = from + dice.total();
        let to = unwrapped % BOARD_SIZE;
        if unwrapped >= BOARD_SIZE {
            self.cash[seat] += rules.pass_go_bonus;
            sink.record(ActivityEntry::good(
                format!("{} passed Start", self.name(seat)),
                money(rules.pass_go_bonus),
            ));
        }
        self.positions[seat] = to;
        self.phase = TurnPhase::TurnReady;
        self.resolve_tile(to, rules, sink);
    }

    /// Act on the tile the active player just landed on.
    fn resolve_tile(&mut self, to: TileId, rules: &RulesConfig, sink: &mut dyn ActivitySink) {
        let seat = self.current;
        let kind = match tile(to) {
            Some(t) => t.kind,
            None => return,
        };
        match kind {
            TileKind::Fortune => self.draw_card(DeckId::Fortune, sink),
            TileKind::Community => self.draw_card(DeckId::Community, sink),
            TileKind::Tax => {
                self.cash[seat] -= rules.tax_amount;
                sink.record(ActivityEntry::warn(
                    format!("{} paid Tax", self.name(seat)),
                    money(-rules.tax_amount),
                ));
            }
            TileKind::GoToJail => {
                self.send_to_jail(seat, rules);
                sink.record(ActivityEntry::warn(
                    format!("{} went to Jail", self.name(seat)),
                    format!("{} turns or ${}", rules.jail_turns, rules.bail),
                ));
            }
            TileKind::Property | TileKind::Railroad | TileKind::Utility => {
                let total = self.last_dice.map(Dice::total).unwrap_or(0);
                if let Some((owner, rent)) = rent_due(to, &self.properties, seat, total) {
                    self.cash[seat] -= rent;
                    self.cash[owner] += rent;
                    tracing::debug!(seat, owner, tile = to, rent, "rent settled");
                    sink.record(ActivityEntry::info(
                        format!("{} paid rent", self.name(seat)),
                        format!("{} to {}", money(-rent), self.players[owner].player_id),
                    ));
                }
            }
            TileKind::Start | TileKind::Jail | TileKind::FreeStop => {}
        }
    }

    fn send_to_jail(&mut self, seat: Seat, rules: &RulesConfig) {
        self.positions[seat] = JAIL_TILE;
        self.jail.imprison(seat, rules.jail_turns);
    }

    pub(crate) fn draw_card(&mut self, deck: DeckId, sink: &mut dyn ActivitySink) {
        let Some(card) = self.deck_mut(deck).draw() else {
            return;
        };
        tracing::debug!(seat = self.current, card = %card.id, keepable = card.is_keepable(), "card drawn");
        sink.record(ActivityEntry::info(
            format!("{} card", deck.label()),
            card.title.clone(),
        ));
        self.pending_card = Some(PendingCard {
            card,
            drawn_by: self.current,
        });
        self.phase = TurnPhase::AwaitingCard;
    }

    pub(crate) fn apply_pending_card(&mut self, rules: &RulesConfig, sink: &mut dyn ActivitySink) {
        let Some(pending) = self.pending_card.take() else {
            return;
        };
        let seat = self.current;
        let card = pending.card;
        let others: Vec<Seat> = (0..self.players.len()).filter(|&s| s != seat).collect();

        match card.effect {
            CardEffect::Money { amount } => {
                self.cash[seat] += amount;
                let entry = if amount >= 0 {
                    ActivityEntry::good(card.title.clone(), money(amount))
                } else {
                    ActivityEntry::warn(card.title.clone(), money(amount))
                };
                sink.record(entry);
            }
            CardEffect::MoveTo { tile: target, pass_go } => {
                let from = self.positions[seat];
                self.positions[seat] = target;
                if pass_go && from > target {
                    self.cash[seat] += rules.pass_go_bonus;
                    sink.record(ActivityEntry::good("Passed Start", money(rules.pass_go_bonus)));
                }
                sink.record(ActivityEntry::info(card.title.clone(), card.text.clone()));
            }
            CardEffect::MoveBy { delta } => {
                let size = BOARD_SIZE as i16;
                let from = self.positions[seat] as i16;
                self.positions[seat] = (from + delta as i16).rem_euclid(size) as TileId;
                sink.record(ActivityEntry::info(card.title.clone(), card.text.clone()));
            }
            CardEffect::GoToJail => {
                self.send_to_jail(seat, rules);
                sink.record(ActivityEntry::warn(
                    "Jail",
                    format!("{} turns or ${}", rules.jail_turns, rules.bail),
                ));
            }
            CardEffect::JailRelease => {
                self.release_tokens[pending.drawn_by] += 1;
                sink.record(ActivityEntry::good("Jail Pass acquired", "Stored until needed"));
            }
            CardEffect::CollectFromEach { amount } => {
                for &o in &others {
                    self.cash[o] -= amount;
                }
                self.cash[seat] += amount * others.len() as i64;
                sink.record(ActivityEntry::good(card.title.clone(), format!("+${} from each", amount)));
            }
            CardEffect::PayEach { amount } => {
                for &o in &others {
                    self.cash[o] += amount;
                }
                self.cash[seat] -= amount * others.len() as i64;
                sink.record(ActivityEntry::warn(card.title.clone(), format!("-${} to each", amount)));
            }
            CardEffect::NearestRailroad => {
                let to = nearest_ahead(self.positions[seat], &RAILROADS);
                self.positions[seat] = to;
                sink.record(ActivityEntry::info(card.title.clone(), format!("Moved to Rail {}", to)));
            }
            CardEffect::NearestUtility => {
                let to = nearest_ahead(self.positions[seat], &UTILITIES);
                self.positions[seat] = to;
                sink.record(ActivityEntry::info(card.title.clone(), format!("Moved to Utility {}", to)));
            }
            CardEffect::Repairs { per_house, per_hotel } => {
                let (houses, hotels) = self.properties.building_counts(seat);
                let cost = houses * per_house + hotels * per_hotel;
                self.cash[seat] -= cost;
                sink.record(ActivityEntry::warn(card.title.clone(), money(-cost)));
            }
        }
        self.phase = TurnPhase::TurnReady;
    }

    pub(crate) fn pay_bail(&mut self, rules: &RulesConfig, sink: &mut dyn ActivitySink) {
        let seat = self.current;
        self.cash[seat] -= rules.bail;
        self.jail.release(seat);
        sink.record(ActivityEntry::good("Bail paid", "Freed"));
    }

    pub(crate) fn use_release_token(&mut self, sink: &mut dyn ActivitySink) {
        let seat = self.current;
        self.release_tokens[seat] -= 1;
        self.jail.release(seat);
        sink.record(ActivityEntry::good("Jail Pass used", "Freed from Jail"));
    }

    pub(crate) fn end_turn(&mut self, sink: &mut dyn ActivitySink) {
        let ending = self.current;
        self.current = (self.current + 1) % self.players.len();
        self.jail.tick_all();
        self.phase = TurnPhase::AwaitingRoll;
        tracing::debug!(ending, next = self.current, "turn ended");
        sink.record(ActivityEntry::info(
            "Turn ended",
            format!("{} to play", self.name(self.current)),
        ));
    }
}
