//! Rent owed when a non-owner lands on an owned tile.

use super::board::{tile, TileId, TileKind, RAILROADS, RAILROAD_RENT, UTILITIES};
use super::ledger::PropertyLedger;
use crate::engine::models::Seat;

/// Flat rent for an ordinary property: 10% of price (at least 10) plus 10 per level.
pub fn property_rent(price: i64, development: u8) -> i64 {
    (price / 10).max(10) + development as i64 * 10
}

/// `(owner, amount)` owed by `occupant` for landing on `id`, or `None` when
/// the tile is unowned, mortgaged, not rentable, or owned by the occupant.
/// Utility rent uses the most recent dice total rather than a fresh roll.
pub fn rent_due(
    id: TileId,
    ledger: &PropertyLedger,
    occupant: Seat,
    last_dice_total: u8,
) -> Option<(Seat, i64)> {
    let t = tile(id)?;
    let entry = ledger.entry(id);
    let owner = entry.owner?;
    if owner == occupant || entry.mortgaged {
        return None;
    }

    let amount = match t.kind {
        TileKind::Property => property_rent(t.price.unwrap_or(0), entry.development),
        TileKind::Railroad => {
            let held = ledger.count_owned(owner, &RAILROADS);
            RAILROAD_RENT[held.min(RAILROAD_RENT.len() - 1)]
        }
        TileKind::Utility => {
            let multiplier = if ledger.count_owned(owner, &UTILITIES) == 2 { 10 } else { 4 };
            multiplier * (last_dice_total as i64).max(2)
        }
        _ => return None,
    };
    Some((owner, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_rent_floor_and_levels() {
        assert_eq!(property_rent(60, 0), 10);
        assert_eq!(property_rent(220, 0), 22);
        assert_eq!(property_rent(400, 0), 40);
        let mut prev = 0;
        for h in 0..=5 {
            let r = property_rent(350, h);
            assert_eq!(r, 35 + 10 * h as i64);
            assert!(r >= prev);
            prev = r;
        }
    }

    #[test]
    fn test_no_rent_for_owner_unowned_or_mortgaged() {
        let mut ledger = PropertyLedger::new();
        assert_eq!(rent_due(1, &ledger, 0, 7), None);
        ledger.set_owner(1, Some(0));
        assert_eq!(rent_due(1, &ledger, 0, 7), None);
        assert_eq!(rent_due(1, &ledger, 1, 7), Some((0, 10)));
        ledger.set_mortgaged(1, true);
        assert_eq!(rent_due(1, &ledger, 1, 7), None);
    }

    #[test]
    fn test_railroad_table() {
        let mut ledger = PropertyLedger::new();
        let expected = [25, 50, 100, 200];
        for (i, &r) in RAILROADS.iter().enumerate() {
            ledger.set_owner(r, Some(3));
            assert_eq!(rent_due(5, &ledger, 0, 8), Some((3, expected[i])));
        }
    }

    #[test]
    fn test_utility_multiplier() {
        let mut ledger = PropertyLedger::new();
        ledger.set_owner(12, Some(1));
        assert_eq!(rent_due(12, &ledger, 0, 9), Some((1, 36)));
        ledger.set_owner(28, Some(1));
        assert_eq!(rent_due(12, &ledger, 0, 9), Some((1, 90)));
        // A zero total (no roll yet) is floored to 2.
        assert_eq!(rent_due(28, &ledger, 0, 0), Some((1, 20)));
    }

    #[test]
    fn test_split_utilities_use_owner_count() {
        let mut ledger = PropertyLedger::new();
        ledger.set_owner(12, Some(1));
        ledger.set_owner(28, Some(2));
        assert_eq!(rent_due(28, &ledger, 0, 5), Some((2, 20)));
    }
}
