//! Fortune and community decks: circular queues of action cards.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{TileId, START_TILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckId {
    Fortune,
    Community,
}

impl DeckId {
    pub fn label(self) -> &'static str {
        match self {
            DeckId::Fortune => "Chance",
            DeckId::Community => "Chest",
        }
    }
}

/// The closed set of things a card can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardEffect {
    Money { amount: i64 },
    MoveTo { tile: TileId, pass_go: bool },
    MoveBy { delta: i8 },
    GoToJail,
    JailRelease,
    CollectFromEach { amount: i64 },
    PayEach { amount: i64 },
    NearestRailroad,
    NearestUtility,
    Repairs { per_house: i64, per_hotel: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub deck: DeckId,
    pub title: String,
    pub text: String,
    pub effect: CardEffect,
}

impl Card {
    /// Keepable cards leave the deck when drawn and become a held token.
    pub fn is_keepable(&self) -> bool {
        matches!(self.effect, CardEffect::JailRelease)
    }
}

fn card(id: &str, deck: DeckId, title: &str, text: &str, effect: CardEffect) -> Card {
    Card {
        id: id.into(),
        deck,
        title: title.into(),
        text: text.into(),
        effect,
    }
}

pub fn fortune_cards() -> Vec<Card> {
    use CardEffect::*;
    let d = DeckId::Fortune;
    vec![
        card("c1", d, "Advance to Start", "Collect $200", MoveTo { tile: START_TILE, pass_go: true }),
        card("c2", d, "Bank error", "Collect $75", Money { amount: 75 }),
        card("c3", d, "Pay fine", "Pay $50", Money { amount: -50 }),
        card("c4", d, "Speeding fine", "Pay $15", Money { amount: -15 }),
        card("c5", d, "Go to Jail", "Go directly to Jail", GoToJail),
        card("c6", d, "Get Out of Jail Free", "Keep until needed", JailRelease),
        card("c7", d, "Advance 3", "Move forward 3 tiles", MoveBy { delta: 3 }),
        card("c8", d, "Go Back 2", "Move back 2 tiles", MoveBy { delta: -2 }),
        card("c9", d, "Nearest Rail", "Advance to nearest rail", NearestRailroad),
        card("c10", d, "Nearest Utility", "Advance to nearest utility", NearestUtility),
        card("c11", d, "Repairs", "Pay $25 per house / $100 per hotel", Repairs { per_house: 25, per_hotel: 100 }),
        card("c12", d, "Collect from each", "Collect $10 from each player", CollectFromEach { amount: 10 }),
    ]
}

pub fn community_cards() -> Vec<Card> {
    use CardEffect::*;
    let d = DeckId::Community;
    vec![
        card("h1", d, "Consulting fee", "Collect $25", Money { amount: 25 }),
        card("h2", d, "Doctor fee", "Pay $50", Money { amount: -50 }),
        card("h3", d, "Tax refund", "Collect $20", Money { amount: 20 }),
        card("h4", d, "Get Out of Jail Free", "Keep until needed", JailRelease),
        card("h5", d, "Advance to Start", "Collect $200", MoveTo { tile: START_TILE, pass_go: true }),
        card("h6", d, "Birthday", "Collect $10 from each player", CollectFromEach { amount: 10 }),
        card("h7", d, "School fees", "Pay $50", Money { amount: -50 }),
        card("h8", d, "Hospital fees", "Pay $100", Money { amount: -100 }),
        card("h9", d, "You inherit", "Collect $100", Money { amount: 100 }),
        card("h10", d, "Charity donation", "Pay $20", Money { amount: -20 }),
        card("h11", d, "Repair assets", "Pay $40 per house / $115 per hotel", Repairs { per_house: 40, per_hotel: 115 }),
        card("h12", d, "Move forward 1", "Advance 1 tile", MoveBy { delta: 1 }),
    ]
}

/// One themed deck. Drawing pops the front card and, unless it is keepable,
/// puts it straight back at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    cards: VecDeque<Card>,
}

impl Deck {
    pub fn new(id: DeckId, cards: Vec<Card>) -> Self {
        Self {
            id,
            cards: cards.into(),
        }
    }

    /// The standard catalog for `id`, optionally shuffled.
    pub fn standard<R: Rng>(id: DeckId, rng: Option<&mut R>) -> Self {
        let mut cards = match id {
            DeckId::Fortune => fortune_cards(),
            DeckId::Community => community_cards(),
        };
        if let Some(rng) = rng {
            cards.shuffle(rng);
        }
        Self::new(id, cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.pop_front()?;
        if !card.is_keepable() {
            self.cards.push_back(card.clone());
        }
        Some(card)
    }
}
