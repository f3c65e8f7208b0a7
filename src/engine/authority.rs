//! Optional remote source of truth for dice and purchases.
//!
//! The engine never depends on an authority being present: every call is
//! best-effort, and anything other than a usable answer is treated as if the
//! call had not been made.

use std::future::Future;

use crate::game::board::TileId;
use crate::game::state::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseVerdict {
    Accepted,
    Unavailable,
}

pub trait RemoteAuthority: Send + Sync {
    /// Dice for the next roll, or `None` when the authority cannot answer.
    fn remote_roll(&self, game_id: u64) -> impl Future<Output = Option<Dice>> + Send;

    fn remote_purchase(
        &self,
        game_id: u64,
        tile: TileId,
    ) -> impl Future<Output = PurchaseVerdict> + Send;
}

/// No remote authority: every request is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl RemoteAuthority for Offline {
    async fn remote_roll(&self, _game_id: u64) -> Option<Dice> {
        None
    }

    async fn remote_purchase(&self, _game_id: u64, _tile: TileId) -> PurchaseVerdict {
        PurchaseVerdict::Unavailable
    }
}
