// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::economy::EconomyState;
use crate::events::EventEntry;

/// Index of a player in the session's original seating order.
pub type PlayerId = usize;
/// Board position, also the id of the property occupying that square.
pub type SquareId = usize;

// ─── Square Kind ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SquareKind {
    Go,
    Property,
    Railroad,
    Utility,
    Tax,
    Card,
    Jail,
    GoToJail,
    FreeParking,
}

impl SquareKind {
    /// Squares that can be bought, owned, and repriced by the market.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Self::Property | Self::Railroad | Self::Utility)
    }
}

// ─── Color Group ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    Blue,
}

impl ColorGroup {
    /// Per-unit house cost, tiered by color band.
    pub fn house_cost(&self) -> i64 {
        match self {
            Self::Brown | Self::LightBlue => 50,
            Self::Pink | Self::Orange => 100,
            Self::Red | Self::Yellow => 150,
            Self::Green | Self::Blue => 200,
        }
    }

    /// Per-band inflation sensitivity, carried on each property for
    /// observers. Repricing itself applies the uniform lambda factor.
    pub fn inflation_sensitivity(&self) -> f64 {
        match self {
            Self::Brown => 0.8,
            Self::LightBlue => 0.9,
            Self::Pink => 0.95,
            Self::Orange => 1.0,
            Self::Red => 1.05,
            Self::Yellow => 1.1,
            Self::Green => 1.15,
            Self::Blue => 1.2,
        }
    }
}

// ─── Deck Id ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeckId {
    Chance,
    Community,
}

// ─── Square (immutable board template) ───────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Square {
    pub name: &'static str,
    pub kind: SquareKind,
    pub group: Option<ColorGroup>,
    pub base_price: f64,
    pub base_rent: f64,
    /// Fixed levy for `Tax` squares, zero otherwise.
    pub tax_amount: i64,
    /// Which deck a `Card` square draws from.
    pub deck: Option<DeckId>,
}

// ─── PropertyState (mutable market state, one per square) ────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyState {
    pub square: SquareId,
    pub current_price: f64,
    pub current_rent: f64,
    /// `[base, 1 house, 2, 3, 4, hotel]` — monotone non-decreasing.
    pub rent_schedule: [f64; 6],
    /// 0..=5, where 5 is a hotel.
    pub houses: u8,
    pub owner: Option<PlayerId>,
    pub mortgaged: bool,
    pub inflation_sensitivity: f64,
}

impl PropertyState {
    pub fn from_square(id: SquareId, square: &Square) -> Self {
        // Rent progression multipliers for developed properties.
        let rent_schedule = if square.group.is_some() {
            let r = square.base_rent;
            [r, r * 5.0, r * 15.0, r * 45.0, r * 80.0, r * 125.0]
        } else {
            [square.base_rent; 6]
        };
        Self {
            square: id,
            current_price: square.base_price,
            current_rent: square.base_rent,
            rent_schedule,
            houses: 0,
            owner: None,
            mortgaged: false,
            inflation_sensitivity: square
                .group
                .map_or(0.5, |g| g.inflation_sensitivity()),
        }
    }

    /// Rounded price used for all cash transactions.
    pub fn price(&self) -> i64 {
        self.current_price.round() as i64
    }
}

// ─── Player ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub cash: i64,
    pub position: usize,
    pub owned: BTreeSet<SquareId>,
    pub in_jail: bool,
    pub jail_turns: u32,
    pub jail_cards: u32,
    pub net_worth: f64,
    pub real_net_worth: f64,
    pub is_bankrupt: bool,
}

impl Player {
    pub fn new(id: PlayerId, cash: i64) -> Self {
        Self {
            id,
            name: format!("Player {}", id + 1),
            cash,
            position: 0,
            owned: BTreeSet::new(),
            in_jail: false,
            jail_turns: 0,
            jail_cards: 0,
            net_worth: cash as f64,
            real_net_worth: cash as f64,
            is_bankrupt: false,
        }
    }
}

// ─── Session Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub initial_cash: i64,
    pub inflation_target: f64,
    pub seed: u64,
    /// Headless-harness mode: charge flat base rent regardless of development.
    pub flat_rent: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            initial_cash: 1500,
            inflation_target: 0.02,
            seed: 0,
            flat_rent: false,
        }
    }
}

// ─── Read-only Snapshot ──────────────────────────────────────────────────────

/// Immutable view of the whole session, handed to renderers and observers.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub round: u64,
    pub current_player: Option<PlayerId>,
    pub game_over: bool,
    pub players: Vec<Player>,
    pub properties: Vec<PropertyState>,
    pub economy: EconomyState,
    pub log: Vec<EventEntry>,
}
