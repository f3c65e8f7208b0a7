//! Buying, building, mortgaging and transferring tiles.

use super::board::{tile, TileId};
use super::ledger::{PropertyLedger, HOTEL_LEVEL};
use super::state::{GameState, RuleViolation};
use crate::engine::activity::ActivitySink;
use crate::engine::models::{money, ActivityEntry, Seat};

impl GameState {
    // --- checks ---

    pub(crate) fn check_buy(&self, id: TileId) -> Result<(), RuleViolation> {
        self.require_no_pending()?;
        let t = tile(id).ok_or(RuleViolation::InvalidTile(id))?;
        if !t.kind.is_purchasable() {
            return Err(RuleViolation::NotPurchasable(id));
        }
        if self.properties.owner(id).is_some() {
            return Err(RuleViolation::AlreadyOwned(id));
        }
        self.require_funds(self.current, t.price.unwrap_or(0))
    }

    /// Returns the cost of the next development step.
    pub(crate) fn check_build(&self, id: TileId) -> Result<i64, RuleViolation> {
        self.require_no_pending()?;
        if !PropertyLedger::is_buildable(id) {
            return Err(RuleViolation::NotBuildable(id));
        }
        if self.properties.owner(id) != Some(self.current) {
            return Err(RuleViolation::NotOwner(id));
        }
        if !self.properties.monopoly_status(id) {
            return Err(RuleViolation::NoMonopoly(id));
        }
        if self.properties.development(id) >= HOTEL_LEVEL {
            return Err(RuleViolation::MaxDevelopment(id));
        }
        let cost = self
            .properties
            .build_cost(id)
            .ok_or(RuleViolation::NotBuildable(id))?;
        self.require_funds(self.current, cost)?;
        Ok(cost)
    }

    pub(crate) fn check_mortgage(&self, id: TileId) -> Result<(), RuleViolation> {
        if self.properties.owner(id) != Some(self.current) {
            return Err(RuleViolation::NotOwner(id));
        }
        if self.properties.is_mortgaged(id) {
            return Err(RuleViolation::AlreadyMortgaged(id));
        }
        Ok(())
    }

    /// Returns the payoff amount.
    pub(crate) fn check_unmortgage(&self, id: TileId) -> Result<i64, RuleViolation> {
        if self.properties.owner(id) != Some(self.current) {
            return Err(RuleViolation::NotOwner(id));
        }
        if !self.properties.is_mortgaged(id) {
            return Err(RuleViolation::NotMortgaged(id));
        }
        let cost = tile(id).map(|t| t.unmortgage_cost()).unwrap_or(0);
        self.require_funds(self.current, cost)?;
        Ok(cost)
    }

    /// Only the active seat may give away one of its own tiles.
    pub(crate) fn check_transfer(&self, id: TileId, to: Seat) -> Result<(), RuleViolation> {
        self.require_no_pending()?;
        if to >= self.players.len() {
            return Err(RuleViolation::InvalidSeat(to));
        }
        if !tile(id).is_some_and(|t| t.kind.is_purchasable()) {
            return Err(RuleViolation::NotPurchasable(id));
        }
        if self.properties.owner(id) != Some(self.current) {
            return Err(RuleViolation::NotOwner(id));
        }
        if to == self.current {
            return Err(RuleViolation::SameOwner(id, to));
        }
        if self.properties.group_developed(id) {
            return Err(RuleViolation::GroupDeveloped(id));
        }
        Ok(())
    }

    // --- transitions (validated by the caller) ---

    pub(crate) fn buy(&mut self, id: TileId, sink: &mut dyn ActivitySink) {
        let Some(t) = tile(id) else { return };
        let price = t.price.unwrap_or(0);
        let seat = self.current;
        self.cash[seat] -= price;
        self.properties.set_owner(id, Some(seat));
        tracing::debug!(seat, tile = id, price, "tile bought");
        sink.record(ActivityEntry::good("Bought", format!("{} ${}", t.label, price)));
    }

    pub(crate) fn build(&mut self, id: TileId, sink: &mut dyn ActivitySink) {
        let Some(cost) = self.properties.build_cost(id) else {
            return;
        };
        let seat = self.current;
        self.cash[seat] -= cost;
        self.properties.develop(id);
        let title = if self.properties.development(id) == HOTEL_LEVEL {
            "Hotel built"
        } else {
            "House built"
        };
        tracing::debug!(seat, tile = id, cost, level = self.properties.development(id), "development added");
        sink.record(ActivityEntry::good(title, money(-cost)));
    }

    pub(crate) fn mortgage(&mut self, id: TileId, sink: &mut dyn ActivitySink) {
        let value = tile(id).map(|t| t.mortgage_value()).unwrap_or(0);
        self.cash[self.current] += value;
        self.properties.set_mortgaged(id, true);
        sink.record(ActivityEntry::info("Mortgaged", money(value)));
    }

    pub(crate) fn unmortgage(&mut self, id: TileId, sink: &mut dyn ActivitySink) {
        let cost = tile(id).map(|t| t.unmortgage_cost()).unwrap_or(0);
        self.cash[self.current] -= cost;
        self.properties.set_mortgaged(id, false);
        sink.record(ActivityEntry::info("Unmortgaged", money(-cost)));
    }

    /// Hand a tile to another seat with no cash changing hands.
    pub(crate) fn transfer(&mut self, id: TileId, to: Seat, sink: &mut dyn ActivitySink) {
        let from = self.properties.owner(id);
        self.properties.set_owner(id, Some(to));
        tracing::debug!(tile = id, ?from, to, "tile transferred");
        let label = tile(id).map(|t| t.label.as_str()).unwrap_or("?");
        sink.record(ActivityEntry::info(
            "Transferred",
            format!("{} to {}", label, self.players[to].player_id),
        ));
    }
}
