//! The core data model: ids, game variants, and collectibles.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// This is whatever opaque id the hosting platform resolves a user to.
/// The ledger keys every store by it; the session registry enforces
/// single-membership on it. `#[serde(transparent)]` keeps the persisted
/// form a plain number, so a balance store serializes as
/// `{ "42": 100 }` rather than `{ "0": 42 }` wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a game session (one match between two
/// participants). Allocated from a process-wide counter by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game variants
// ---------------------------------------------------------------------------

/// The closed set of game variants a session can run.
///
/// Selected once at session creation; the session's state machine is
/// chosen by this tag and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVariant {
    TicTacToe,
    Blackjack,
    RockPaperScissors,
    CardBattle,
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicTacToe => write!(f, "tic-tac-toe"),
            Self::Blackjack => write!(f, "blackjack"),
            Self::RockPaperScissors => write!(f, "rock-paper-scissors"),
            Self::CardBattle => write!(f, "card-battle"),
        }
    }
}

// ---------------------------------------------------------------------------
// Collectibles
// ---------------------------------------------------------------------------

/// An owned card as stored in the ledger.
///
/// Owned copies are independent value objects. A card fielded in a
/// battle is a *working copy* cloned from this; battle damage never
/// writes back to the inventory entry. `temp_defense` is the one-hit
/// defense bonus granted by a Defend action — it lives on the card so a
/// working copy carries it through a battle, but inventory entries keep
/// it at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub attack: u32,
    pub defense: u32,
    pub hit_points: u32,
    #[serde(default)]
    pub temp_defense: u32,
}

impl Card {
    /// True while the card can still act or be targeted in a battle.
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// A card pool entry. Hit points are rolled when a card is drawn from
/// the pool (or when a battle roster slot is padded), so the template
/// carries only the fixed stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub attack: u32,
    pub defense: u32,
}

impl CardTemplate {
    /// Materializes an owned card with the given rolled hit points.
    pub fn instantiate(&self, hit_points: u32) -> Card {
        Card {
            name: self.name.clone(),
            attack: self.attack,
            defense: self.defense,
            hit_points,
            temp_defense: 0,
        }
    }
}

/// Pet rarity tiers, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "Common"),
            Self::Uncommon => write!(f, "Uncommon"),
            Self::Rare => write!(f, "Rare"),
            Self::Epic => write!(f, "Epic"),
        }
    }
}

/// A collectible pet. Pets are inert inventory today — the `bonus`
/// field is carried for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub rarity: Rarity,
    pub bonus: u32,
}

// =========================================================================
// Tests
// =========================================================================
