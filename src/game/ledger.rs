//! Property ledger: ownership, development level and mortgage flag per tile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::board::{group_members, tile, TileId, TileKind, BOARD};
use crate::engine::models::Seat;

/// Development level meaning "hotel"; replaces four houses.
pub const HOTEL_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub owner: Option<Seat>,
    pub development: u8,
    pub mortgaged: bool,
}

impl PropertyEntry {
    pub fn houses(&self) -> u8 {
        if self.development < HOTEL_LEVEL {
            self.development
        } else {
            0
        }
    }

    pub fn has_hotel(&self) -> bool {
        self.development >= HOTEL_LEVEL
    }
}

/// Entries exist only for purchasable tiles; everything else reads as unowned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyLedger {
    entries: BTreeMap<TileId, PropertyEntry>,
}

impl Default for PropertyLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyLedger {
    pub fn new() -> Self {
        let entries = BOARD
            .iter()
            .filter(|t| t.kind.is_purchasable())
            .map(|t| (t.id, PropertyEntry::default()))
            .collect();
        Self { entries }
    }

    pub fn entry(&self, id: TileId) -> PropertyEntry {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (TileId, &PropertyEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    pub fn owner(&self, id: TileId) -> Option<Seat> {
        self.entry(id).owner
    }

    pub fn is_mortgaged(&self, id: TileId) -> bool {
        self.entry(id).mortgaged
    }

    pub fn development(&self, id: TileId) -> u8 {
        self.entry(id).development
    }

    /// True iff one player owns every tile grouped with `id`.
    pub fn monopoly_status(&self, id: TileId) -> bool {
        let members = group_members(id);
        match members.first().and_then(|&first| self.owner(first)) {
            Some(owner) => members.iter().all(|&m| self.owner(m) == Some(owner)),
            None => false,
        }
    }

    /// How many tiles of `list` `seat` owns.
    pub fn count_owned(&self, seat: Seat, list: &[TileId]) -> usize {
        list.iter().filter(|&&t| self.owner(t) == Some(seat)).count()
    }

    pub fn owned_by(&self, seat: Seat) -> Vec<TileId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.owner == Some(seat))
            .map(|(id, _)| *id)
            .collect()
    }

    /// (houses, hotels) across everything `seat` owns.
    pub fn building_counts(&self, seat: Seat) -> (i64, i64) {
        self.entries
            .values()
            .filter(|e| e.owner == Some(seat))
            .fold((0, 0), |(houses, hotels), e| {
                (houses + e.houses() as i64, hotels + e.has_hotel() as i64)
            })
    }

    /// Cost of the next development step on `id`; the hotel step costs double.
    pub fn build_cost(&self, id: TileId) -> Option<i64> {
        let house_cost = tile(id)?.house_cost?;
        if self.development(id) + 1 == HOTEL_LEVEL {
            Some(house_cost * 2)
        } else {
            Some(house_cost)
        }
    }

    pub fn net_worth_of_holdings(&self, seat: Seat) -> i64 {
        self.entries
            .iter()
            .filter(|(_, e)| e.owner == Some(seat))
            .filter_map(|(id, e)| {
                let t = tile(*id)?;
                let base = if e.mortgaged {
                    t.mortgage_value()
                } else {
                    t.price.unwrap_or(0)
                };
                Some(base + e.development as i64 * t.house_cost.unwrap_or(0))
            })
            .sum()
    }

    /// Whether any tile grouped with `id` carries houses or a hotel.
    pub fn group_developed(&self, id: TileId) -> bool {
        group_members(id).iter().any(|&m| self.development(m) > 0)
    }

    // --- mutations: callers validate first ---

    pub(crate) fn set_owner(&mut self, id: TileId, seat: Option<Seat>) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.owner = seat;
        }
    }

    pub(crate) fn develop(&mut self, id: TileId) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.development = (e.development + 1).min(HOTEL_LEVEL);
        }
    }

    pub(crate) fn set_mortgaged(&mut self, id: TileId, mortgaged: bool) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.mortgaged = mortgaged;
        }
    }

    pub fn is_buildable(id: TileId) -> bool {
        matches!(tile(id).map(|t| t.kind), Some(TileKind::Property))
    }
}
