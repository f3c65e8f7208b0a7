//! Static board catalog: 40 tiles, color groups, prices and house costs.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub type TileId = u8;

pub const BOARD_SIZE: u8 = 40;
pub const START_TILE: TileId = 0;
pub const JAIL_TILE: TileId = 10;
pub const GO_TO_JAIL_TILE: TileId = 30;

pub const RAILROADS: [TileId; 4] = [5, 15, 25, 35];
pub const UTILITIES: [TileId; 2] = [12, 28];

/// Rent by number of railroads held by the owner. Index 0 is never charged.
pub const RAILROAD_RENT: [i64; 5] = [0, 25, 50, 100, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Start,
    Property,
    Fortune,
    Community,
    Tax,
    Railroad,
    Utility,
    GoToJail,
    Jail,
    FreeStop,
}

impl TileKind {
    pub fn is_purchasable(self) -> bool {
        matches!(self, TileKind::Property | TileKind::Railroad | TileKind::Utility)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    LightBlue,
    Green,
    Purple,
    Orange,
    Teal,
    Salmon,
    Blue,
    DarkBlue,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::LightBlue,
        ColorGroup::Green,
        ColorGroup::Purple,
        ColorGroup::Orange,
        ColorGroup::Teal,
        ColorGroup::Salmon,
        ColorGroup::Blue,
        ColorGroup::DarkBlue,
    ];

    pub fn members(self) -> &'static [TileId] {
        match self {
            ColorGroup::LightBlue => &[1, 3],
            ColorGroup::Green => &[6, 8, 9],
            ColorGroup::Purple => &[11, 13, 14],
            ColorGroup::Orange => &[16, 18, 19],
            ColorGroup::Teal => &[21, 23, 24],
            ColorGroup::Salmon => &[26, 27, 29],
            ColorGroup::Blue => &[31, 32, 34],
            ColorGroup::DarkBlue => &[37, 39],
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ColorGroup::LightBlue => "#9ad0f5",
            ColorGroup::Green => "#c7e59f",
            ColorGroup::Purple => "#d9a4f3",
            ColorGroup::Orange => "#f6d47c",
            ColorGroup::Teal => "#7fc9b0",
            ColorGroup::Salmon => "#e7a592",
            ColorGroup::Blue => "#7fb2f0",
            ColorGroup::DarkBlue => "#3aa3e3",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub label: String,
    pub group: Option<ColorGroup>,
    pub price: Option<i64>,
    pub house_cost: Option<i64>,
}

impl Tile {
    /// Half the base price, rounded down.
    pub fn mortgage_value(&self) -> i64 {
        self.price.unwrap_or(0) / 2
    }

    /// Mortgage value plus 10% interest, rounded up to a whole unit.
    pub fn unmortgage_cost(&self) -> i64 {
        let value = self.mortgage_value();
        value + (value + 9) / 10
    }
}

fn plain(id: TileId, kind: TileKind, label: &str) -> Tile {
    Tile {
        id,
        kind,
        label: label.into(),
        group: None,
        price: None,
        house_cost: None,
    }
}

fn property(id: TileId, label: &str, group: ColorGroup, price: i64, house_cost: i64) -> Tile {
    Tile {
        group: Some(group),
        price: Some(price),
        house_cost: Some(house_cost),
        ..plain(id, TileKind::Property, label)
    }
}

fn railroad(id: TileId, label: &str) -> Tile {
    Tile {
        price: Some(200),
        ..plain(id, TileKind::Railroad, label)
    }
}

fn utility(id: TileId, label: &str) -> Tile {
    Tile {
        price: Some(150),
        ..plain(id, TileKind::Utility, label)
    }
}

pub static BOARD: Lazy<Vec<Tile>> = Lazy::new(|| {
    use ColorGroup::*;
    use TileKind::*;

    vec![
        plain(0, Start, "Start"),
        property(1, "Reef Row", LightBlue, 60, 50),
        plain(2, Community, "Chest"),
        property(3, "Coral Cove", LightBlue, 60, 50),
        plain(4, Tax, "Tax"),
        railroad(5, "Harbor Rail"),
        property(6, "Kelp Keys", Green, 100, 50),
        plain(7, Fortune, "Chance"),
        property(8, "Tide Terrace", Green, 100, 50),
        property(9, "Lagoon Lane", Green, 120, 50),
        plain(10, Jail, "Jail | Visiting"),
        property(11, "Pearl Plaza", Purple, 140, 100),
        utility(12, "Power Plant"),
        property(13, "Shell Square", Purple, 140, 100),
        property(14, "Trident Trail", Purple, 160, 100),
        railroad(15, "Mariner Rail"),
        property(16, "Barnacle Blvd", Orange, 180, 100),
        plain(17, Community, "Chest"),
        property(18, "Seagrass St", Orange, 180, 100),
        property(19, "Whale Way", Orange, 200, 100),
        plain(20, FreeStop, "Free Stop"),
        property(21, "Anchor Ave", Teal, 220, 150),
        plain(22, Fortune, "Chance"),
        property(23, "Current Ct", Teal, 220, 150),
        property(24, "Harpoon Hwy", Teal, 240, 150),
        railroad(25, "Seafarer Rail"),
        property(26, "Driftwood Dr", Salmon, 260, 150),
        property(27, "Gull Grove", Salmon, 260, 150),
        utility(28, "Water Works"),
        property(29, "Marlin Meadows", Salmon, 280, 150),
        plain(30, GoToJail, "Go To Jail"),
        property(31, "Siren St", Blue, 300, 200),
        property(32, "Net Nook", Blue, 300, 200),
        plain(33, Community, "Chest"),
        property(34, "Kraken Knoll", Blue, 320, 200),
        railroad(35, "Deep Rail"),
        plain(36, Fortune, "Chance"),
        property(37, "Poseidon Pl", DarkBlue, 350, 200),
        plain(38, Tax, "Luxury Tax"),
        property(39, "Leviathan Lp", DarkBlue, 400, 200),
    ]
});

/// Look up a tile by index. `None` for indexes off the board.
pub fn tile(id: TileId) -> Option<&'static Tile> {
    BOARD.get(id as usize)
}

/// Tiles that move together for monopoly purposes: the color group for
/// ordinary properties, all railroads, or both utilities.
pub fn group_members(id: TileId) -> &'static [TileId] {
    match tile(id).map(|t| (t.kind, t.group)) {
        Some((TileKind::Property, Some(group))) => group.members(),
        Some((TileKind::Railroad, _)) => &RAILROADS,
        Some((TileKind::Utility, _)) => &UTILITIES,
        _ => &[],
    }
}

/// First tile from `list` strictly ahead of `from`, walking clockwise.
pub fn nearest_ahead(from: TileId, list: &[TileId]) -> TileId {
    (1..=BOARD_SIZE)
        .map(|step| (from + step) % BOARD_SIZE)
        .find(|t| list.contains(t))
        .unwrap_or(from)
}
