// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Board Layout

use crate::types::{ColorGroup, DeckId, Square, SquareId, SquareKind};

pub const BOARD_SIZE: usize = 40;
pub const JAIL_POSITION: usize = 10;

/// Immutable board template: 40 squares in play order.
#[derive(Debug, Clone)]
pub struct Board {
    squares: Vec<Square>,
}

fn prop(name: &'static str, group: ColorGroup, price: f64, rent: f64) -> Square {
    Square {
        name,
        kind: SquareKind::Property,
        group: Some(group),
        base_price: price,
        base_rent: rent,
        tax_amount: 0,
        deck: None,
    }
}

fn railroad(name: &'static str) -> Square {
    Square {
        name,
        kind: SquareKind::Railroad,
        group: None,
        base_price: 200.0,
        base_rent: 25.0,
        tax_amount: 0,
        deck: None,
    }
}

fn utility(name: &'static str) -> Square {
    Square {
        name,
        kind: SquareKind::Utility,
        group: None,
        base_price: 150.0,
        base_rent: 0.0,
        tax_amount: 0,
        deck: None,
    }
}

fn tax(name: &'static str, amount: i64) -> Square {
    Square {
        name,
        kind: SquareKind::Tax,
        group: None,
        base_price: 0.0,
        base_rent: 0.0,
        tax_amount: amount,
        deck: None,
    }
}

fn card(name: &'static str, deck: DeckId) -> Square {
    Square {
        name,
        kind: SquareKind::Card,
        group: None,
        base_price: 0.0,
        base_rent: 0.0,
        tax_amount: 0,
        deck: Some(deck),
    }
}

fn special(name: &'static str, kind: SquareKind) -> Square {
    Square {
        name,
        kind,
        group: None,
        base_price: 0.0,
        base_rent: 0.0,
        tax_amount: 0,
        deck: None,
    }
}

impl Board {
    /// The standard 40-square layout.
    pub fn standard() -> Self {
        use ColorGroup::*;
        use DeckId::*;
        let squares = vec![
            special("GO", SquareKind::Go),
            prop("Friedman Ave", Brown, 60.0, 2.0),
            card("Community Treasury", Community),
            prop("Blanchard Ave", Brown, 60.0, 4.0),
            tax("Income Tax", 200),
            railroad("Mankiw Railroad"),
            prop("Prescott Ave", LightBlue, 100.0, 6.0),
            card("Exogenous Shocks!", Chance),
            prop("Diamond Plaza", LightBlue, 100.0, 6.0),
            prop("Greenspan Ave", LightBlue, 120.0, 8.0),
            special("Jail", SquareKind::Jail),
            prop("St. Acemoglu Place", Pink, 140.0, 10.0),
            utility("Electric Company"),
            prop("States Ave", Pink, 140.0, 10.0),
            prop("Virginia Ave", Pink, 160.0, 12.0),
            railroad("Pennsylvania Railroad"),
            prop("St. James Place", Orange, 180.0, 14.0),
            card("Community Treasury", Community),
            prop("Dixit Place", Orange, 180.0, 14.0),
            prop("Stiglitz Ave", Orange, 200.0, 16.0),
            special("Suboptimal Free Parking", SquareKind::FreeParking),
            prop("Lucas St.", Red, 220.0, 18.0),
            card("Exogenous Shocks!", Chance),
            prop("Krugman Institute", Red, 220.0, 18.0),
            prop("Illinois Ave", Red, 240.0, 20.0),
            railroad("B&O Railroad"),
            prop("Atlantic Ave", Yellow, 260.0, 22.0),
            prop("Ventnor Ave", Yellow, 260.0, 22.0),
            utility("Water Works"),
            prop("Keynes Gardens", Yellow, 280.0, 24.0),
            special("Go to Jail", SquareKind::GoToJail),
            prop("Pacific Ave", Green, 300.0, 26.0),
            prop("North Carolina Ave", Green, 300.0, 26.0),
            card("Community Treasury", Community),
            prop("Pennsylvania Ave", Green, 320.0, 28.0),
            railroad("Short Line Railroad"),
            card("Chance", Chance),
            prop("Park Place", Blue, 350.0, 35.0),
            tax("Luxury Tax", 100),
            prop("Hotelling Walk", Blue, 400.0, 50.0),
        ];
        debug_assert_eq!(squares.len(), BOARD_SIZE);
        Self { squares }
    }

    pub fn size(&self) -> usize {
        self.squares.len()
    }

    pub fn square(&self, id: SquareId) -> &Square {
        &self.squares[id]
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Nearest square of `kind` strictly ahead of `from`, wrapping around.
    pub fn nearest_of_kind(&self, from: SquareId, kind: SquareKind) -> Option<SquareId> {
        (1..self.squares.len())
            .map(|step| (from + step) % self.squares.len())
            .find(|&id| self.squares[id].kind == kind)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
