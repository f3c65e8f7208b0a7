//! The game state snapshot, the actions that transform it, and the reasons
//! an action can be refused.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{tile, TileId, BOARD, START_TILE};
use super::cards::{Card, Deck, DeckId};
use super::jail::JailTracker;
use super::ledger::PropertyLedger;
use crate::engine::activity::ActivitySink;
use crate::engine::config::RulesConfig;
use crate::engine::models::{Player, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice(pub u8, pub u8);

impl Dice {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Dice(rng.gen_range(1..=6), rng.gen_range(1..=6))
    }

    pub fn total(self) -> u8 {
        self.0 + self.1
    }

    pub fn is_valid(self) -> bool {
        (1..=6).contains(&self.0) && (1..=6).contains(&self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingCard,
    TurnReady,
}

/// A drawn card waiting to be applied, with the seat that drew it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCard {
    pub card: Card,
    pub drawn_by: Seat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// `dice: None` asks the caller to generate them.
    Roll {
        #[serde(default)]
        dice: Option<Dice>,
    },
    Buy { tile: TileId },
    Build { tile: TileId },
    Mortgage { tile: TileId },
    Unmortgage { tile: TileId },
    DrawCard { deck: DeckId },
    ApplyCard,
    PayBail,
    UseReleaseToken,
    EndTurn,
    Transfer { tile: TileId, to: Seat },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("resolve the open card first")]
    CardPending,
    #[error("no card is waiting to be applied")]
    NoPendingCard,
    #[error("player is in jail; pay bail or use a jail pass")]
    Jailed,
    #[error("player is not in jail")]
    NotJailed,
    #[error("no jail pass available")]
    NoReleaseToken,
    #[error("need ${needed}, have ${available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("tile {0} cannot be bought")]
    NotPurchasable(TileId),
    #[error("tile {0} is owned already")]
    AlreadyOwned(TileId),
    #[error("tile {0} is not owned by the active player")]
    NotOwner(TileId),
    #[error("need the full set to build on tile {0}")]
    NoMonopoly(TileId),
    #[error("tile {0} cannot carry buildings")]
    NotBuildable(TileId),
    #[error("tile {0} already has a hotel")]
    MaxDevelopment(TileId),
    #[error("tile {0} is mortgaged already")]
    AlreadyMortgaged(TileId),
    #[error("tile {0} is not mortgaged")]
    NotMortgaged(TileId),
    #[error("the {0:?} deck is empty")]
    DeckEmpty(DeckId),
    #[error("no tile {0} on the board")]
    InvalidTile(TileId),
    #[error("no seat {0} at the table")]
    InvalidSeat(Seat),
    #[error("dice must each show 1 to 6, got {0} and {1}")]
    InvalidDice(u8, u8),
    #[error("roll needs resolved dice")]
    DiceRequired,
    #[error("sell the buildings in tile {0}'s group first")]
    GroupDeveloped(TileId),
    #[error("tile {0} already belongs to seat {1}")]
    SameOwner(TileId, Seat),
}

/// The single unit of truth for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub current: Seat,
    pub phase: TurnPhase,
    pub positions: Vec<TileId>,
    pub cash: Vec<i64>,
    pub properties: PropertyLedger,
    pub fortune: Deck,
    pub community: Deck,
    pub jail: JailTracker,
    pub release_tokens: Vec<u32>,
    pub last_dice: Option<Dice>,
    pub pending_card: Option<PendingCard>,
}

impl GameState {
    /// Fresh state: everyone on Start with starting cash. Decks are shuffled
    /// with `rng` when the rules ask for it.
    pub fn new<R: Rng>(players: Vec<Player>, rules: &RulesConfig, rng: &mut R) -> Self {
        let seats = players.len();
        let (fortune, community) = if rules.shuffle_decks {
            (
                Deck::standard(DeckId::Fortune, Some(&mut *rng)),
                Deck::standard(DeckId::Community, Some(&mut *rng)),
            )
        } else {
            (
                Deck::standard::<R>(DeckId::Fortune, None),
                Deck::standard::<R>(DeckId::Community, None),
            )
        };
        Self {
            players,
            current: 0,
            phase: TurnPhase::AwaitingRoll,
            positions: vec![START_TILE; seats],
            cash: vec![rules.starting_cash; seats],
            properties: PropertyLedger::new(),
            fortune,
            community,
            jail: JailTracker::new(seats),
            release_tokens: vec![0; seats],
            last_dice: None,
            pending_card: None,
        }
    }

    // --- accessors ---

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn position(&self, seat: Seat) -> TileId {
        self.positions[seat]
    }

    pub fn cash_of(&self, seat: Seat) -> i64 {
        self.cash[seat]
    }

    pub fn deck(&self, id: DeckId) -> &Deck {
        match id {
            DeckId::Fortune => &self.fortune,
            DeckId::Community => &self.community,
        }
    }

    pub(crate) fn deck_mut(&mut self, id: DeckId) -> &mut Deck {
        match id {
            DeckId::Fortune => &mut self.fortune,
            DeckId::Community => &mut self.community,
        }
    }

    pub fn net_worth(&self, seat: Seat) -> i64 {
        self.cash[seat] + self.properties.net_worth_of_holdings(seat)
    }

    pub(crate) fn name(&self, seat: Seat) -> &str {
        &self.players[seat].display_name
    }

    pub(crate) fn require_funds(&self, seat: Seat, needed: i64) -> Result<(), RuleViolation> {
        let available = self.cash[seat];
        if available < needed {
            return Err(RuleViolation::InsufficientFunds { needed, available });
        }
        Ok(())
    }

    pub(crate) fn require_no_pending(&self) -> Result<(), RuleViolation> {
        if self.pending_card.is_some() {
            return Err(RuleViolation::CardPending);
        }
        Ok(())
    }

    // --- validate / apply ---

    /// Check an action against the rules without touching the state.
    pub fn validate(&self, action: &Action, rules: &RulesConfig) -> Result<(), RuleViolation> {
        if let Some(t) = action_tile(action) {
            if tile(t).is_none() {
                return Err(RuleViolation::InvalidTile(t));
            }
        }
        match action {
            Action::Roll { dice } => self.check_roll(*dice),
            Action::Buy { tile } => self.check_buy(*tile),
            Action::Build { tile } => self.check_build(*tile).map(|_| ()),
            Action::Mortgage { tile } => self.check_mortgage(*tile),
            Action::Unmortgage { tile } => self.check_unmortgage(*tile).map(|_| ()),
            Action::DrawCard { deck } => self.check_draw(*deck),
            Action::ApplyCard => self.check_apply_card(),
            Action::PayBail => self.check_pay_bail(rules),
            Action::UseReleaseToken => self.check_release_token(),
            Action::EndTurn => self.require_no_pending(),
            Action::Transfer { tile, to } => self.check_transfer(*tile, *to),
        }
    }

    /// Validate, then perform `action`, writing what happened to `sink`.
    /// On error the state is untouched.
    pub fn apply(
        &mut self,
        action: &Action,
        rules: &RulesConfig,
        sink: &mut dyn ActivitySink,
    ) -> Result<(), RuleViolation> {
        self.validate(action, rules)?;
        match action {
            Action::Roll { dice } => {
                let dice = dice.ok_or(RuleViolation::DiceRequired)?;
                self.roll(dice, rules, sink);
            }
            Action::Buy { tile } => self.buy(*tile, sink),
            Action::Build { tile } => self.build(*tile, sink),
            Action::Mortgage { tile } => self.mortgage(*tile, sink),
            Action::Unmortgage { tile } => self.unmortgage(*tile, sink),
            Action::DrawCard { deck } => self.draw_card(*deck, sink),
            Action::ApplyCard => self.apply_pending_card(rules, sink),
            Action::PayBail => self.pay_bail(rules, sink),
            Action::UseReleaseToken => self.use_release_token(sink),
            Action::EndTurn => self.end_turn(sink),
            Action::Transfer { tile, to } => self.transfer(*tile, *to, sink),
        }
        Ok(())
    }

    /// Every action the active player could take right now. Rolls are listed
    /// with unresolved dice.
    pub fn legal_actions(&self, rules: &RulesConfig) -> Vec<Action> {
        let mut candidates = vec![
            Action::Roll { dice: None },
            Action::ApplyCard,
            Action::PayBail,
            Action::UseReleaseToken,
            Action::EndTurn,
            Action::DrawCard { deck: DeckId::Fortune },
            Action::DrawCard { deck: DeckId::Community },
        ];
        for t in BOARD.iter().filter(|t| t.kind.is_purchasable()) {
            candidates.push(Action::Buy { tile: t.id });
            candidates.push(Action::Build { tile: t.id });
            candidates.push(Action::Mortgage { tile: t.id });
            candidates.push(Action::Unmortgage { tile: t.id });
        }
        candidates
            .into_iter()
            .filter(|a| self.validate(a, rules).is_ok())
            .collect()
    }
}

fn action_tile(action: &Action) -> Option<TileId> {
    match action {
        Action::Buy { tile }
        | Action::Build { tile }
        | Action::Mortgage { tile }
        | Action::Unmortgage { tile }
        | Action::Transfer { tile, .. } => Some(*tile),
        _ => None,
    }
}
