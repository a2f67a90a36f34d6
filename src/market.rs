// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Property Market & Rent Engine

use serde::Serialize;

use crate::board::Board;
use crate::types::{ColorGroup, Player, PlayerId, PropertyState, SquareId, SquareKind};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A requested action violates a market rule. Rejected locally with no state
/// mutated; surfaced to the decision requester as a denial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("square cannot be owned")]
    NotPurchasable,
    #[error("player does not own this property")]
    NotOwner,
    #[error("insufficient cash: need {needed}, have {available}")]
    InsufficientCash { needed: i64, available: i64 },
    #[error("property is already mortgaged")]
    AlreadyMortgaged,
    #[error("property is not mortgaged")]
    NotMortgaged,
    #[error("property is mortgaged")]
    Mortgaged,
    #[error("houses must be sold before mortgaging")]
    HousesPresent,
    #[error("color group is not a completed monopoly")]
    NotAMonopoly,
    #[error("even-building rule: another property in the group has fewer houses")]
    UnevenBuild,
    #[error("property is fully developed")]
    MaxDevelopment,
    #[error("no houses to sell")]
    NoHouses,
}

// ─── Property Market ─────────────────────────────────────────────────────────

/// Owns every square's mutable market state. Players hold only ids into it.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyMarket {
    properties: Vec<PropertyState>,
}

impl PropertyMarket {
    pub fn new(board: &Board) -> Self {
        let properties = board
            .squares()
            .iter()
            .enumerate()
            .map(|(id, square)| PropertyState::from_square(id, square))
            .collect();
        Self { properties }
    }

    pub fn property(&self, id: SquareId) -> &PropertyState {
        &self.properties[id]
    }

    pub fn property_mut(&mut self, id: SquareId) -> &mut PropertyState {
        &mut self.properties[id]
    }

    pub fn properties(&self) -> &[PropertyState] {
        &self.properties
    }

    // ─── Valuation ──────────────────────────────────────────────────────

    /// Repricing pass, invoked after each macro update. Mortgaged holdings
    /// are frozen; everything else drifts with effective inflation, floored
    /// so no single step drops a price below 95% of its previous value.
    pub fn reprice(&mut self, board: &Board, pi_effective: f64, lambda: f64, floor: f64) {
        for id in 0..self.properties.len() {
            let kind = board.square(id).kind;
            if !kind.is_purchasable() {
                continue;
            }
            let prop = &mut self.properties[id];
            if !prop.mortgaged {
                let change = 1.0 + lambda * pi_effective;
                prop.current_price = (prop.current_price * change.max(floor)).round();
            }
        }
        // Second pass: rents depend on cross-property ownership.
        let rents: Vec<(usize, i64)> = (0..self.properties.len())
            .filter(|&id| board.square(id).kind.is_purchasable())
            .map(|id| (id, self.rent(board, id, 0)))
            .collect();
        for (id, rent) in rents {
            self.properties[id].current_rent = rent as f64;
        }
    }

    /// Scale prices of one color band (sector-specific structural shock).
    pub fn apply_sector_multiplier(&mut self, board: &Board, group: ColorGroup, multiplier: f64) {
        for id in 0..self.properties.len() {
            if board.square(id).group == Some(group) {
                let prop = &mut self.properties[id];
                prop.current_price = (prop.current_price * multiplier).round();
            }
        }
    }

    /// `cash + Σ unmortgaged current prices`, plus the inflation-deflated
    /// variant, written back onto the player.
    pub fn recompute_net_worth(&self, player: &mut Player, inflation: f64, round: u64) {
        let holdings: f64 = player
            .owned
            .iter()
            .map(|&id| {
                let prop = &self.properties[id];
                if prop.mortgaged {
                    0.0
                } else {
                    prop.current_price
                }
            })
            .sum();
        player.net_worth = player.cash as f64 + holdings;
        let deflator = (1.0 + inflation).powf(round as f64 / 4.0);
        player.real_net_worth = player.net_worth / deflator;
    }

    // ─── Rent Engine ────────────────────────────────────────────────────

    /// Rent owed when landing on `id` with the given dice total.
    pub fn rent(&self, board: &Board, id: SquareId, dice_total: u32) -> i64 {
        let prop = &self.properties[id];
        let owner = match prop.owner {
            Some(owner) if !prop.mortgaged => owner,
            _ => return 0,
        };
        let square = board.square(id);

        if prop.houses > 0 {
            return prop.rent_schedule[prop.houses as usize].round() as i64;
        }

        match square.kind {
            SquareKind::Utility => {
                let owned = self.owned_count_of_kind(board, SquareKind::Utility, owner);
                let multiplier = if owned == 1 { 4 } else { 10 };
                dice_total as i64 * multiplier
            }
            SquareKind::Railroad => {
                let owned = self.owned_count_of_kind(board, SquareKind::Railroad, owner);
                let exponent = owned.saturating_sub(1) as u32;
                (square.base_rent.round() as i64) * (1_i64 << exponent)
            }
            _ => {
                let base = prop.rent_schedule[0].round() as i64;
                match square.group {
                    // Unimproved properties in a completed monopoly earn
                    // double rent.
                    Some(group) if self.is_monopoly(board, group, owner) => base * 2,
                    _ => base,
                }
            }
        }
    }

    /// Monopoly membership is recomputed on demand, never cached.
    pub fn is_monopoly(&self, board: &Board, group: ColorGroup, owner: PlayerId) -> bool {
        board
            .squares()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.group == Some(group))
            .all(|(id, _)| self.properties[id].owner == Some(owner))
    }

    pub fn owned_count_of_kind(&self, board: &Board, kind: SquareKind, owner: PlayerId) -> usize {
        board
            .squares()
            .iter()
            .enumerate()
            .filter(|(id, s)| s.kind == kind && self.properties[*id].owner == Some(owner))
            .count()
    }

    // ─── Development ────────────────────────────────────────────────────

    /// Check the building rules without mutating anything.
    pub fn can_build(&self, board: &Board, player: &Player, id: SquareId) -> Result<i64, ActionError> {
        let prop = &self.properties[id];
        let group = board.square(id).group.ok_or(ActionError::NotPurchasable)?;
        if prop.owner != Some(player.id) {
            return Err(ActionError::NotOwner);
        }
        if prop.mortgaged {
            return Err(ActionError::Mortgaged);
        }
        if prop.houses >= 5 {
            return Err(ActionError::MaxDevelopment);
        }
        if !self.is_monopoly(board, group, player.id) {
            return Err(ActionError::NotAMonopoly);
        }
        // Evenness rule: only properties at the group's minimum house count
        // may be developed.
        let min_houses = board
            .squares()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.group == Some(group))
            .map(|(gid, _)| self.properties[gid].houses)
            .min()
            .unwrap_or(0);
        if prop.houses > min_houses {
            return Err(ActionError::UnevenBuild);
        }
        let cost = group.house_cost();
        if player.cash < cost {
            return Err(ActionError::InsufficientCash {
                needed: cost,
                available: player.cash,
            });
        }
        Ok(cost)
    }

    /// Add one house (or the hotel), charging the full unit cost.
    pub fn build_house(
        &mut self,
        board: &Board,
        player: &mut Player,
        id: SquareId,
    ) -> Result<i64, ActionError> {
        let cost = self.can_build(board, player, id)?;
        player.cash -= cost;
        self.properties[id].houses += 1;
        Ok(cost)
    }

    /// Selling is unconstrained beyond `houses > 0`; refunds half the unit
    /// cost.
    pub fn sell_house(
        &mut self,
        board: &Board,
        player: &mut Player,
        id: SquareId,
    ) -> Result<i64, ActionError> {
        let prop = &self.properties[id];
        let group = board.square(id).group.ok_or(ActionError::NotPurchasable)?;
        if prop.owner != Some(player.id) {
            return Err(ActionError::NotOwner);
        }
        if prop.houses == 0 {
            return Err(ActionError::NoHouses);
        }
        let refund = group.house_cost() / 2;
        self.properties[id].houses -= 1;
        player.cash += refund;
        Ok(refund)
    }

    // ─── Mortgages ──────────────────────────────────────────────────────

    /// Mortgage an owned, developed-free property, crediting half its
    /// current price.
    pub fn mortgage(&mut self, player: &mut Player, id: SquareId) -> Result<i64, ActionError> {
        let prop = &self.properties[id];
        if prop.owner != Some(player.id) {
            return Err(ActionError::NotOwner);
        }
        if prop.mortgaged {
            return Err(ActionError::AlreadyMortgaged);
        }
        if prop.houses > 0 {
            return Err(ActionError::HousesPresent);
        }
        let credit = (prop.current_price * 0.5).round() as i64;
        self.properties[id].mortgaged = true;
        player.cash += credit;
        Ok(credit)
    }

    /// Lifting a mortgage costs the principal plus the current policy rate
    /// plus a 2% premium.
    pub fn unmortgage(
        &mut self,
        player: &mut Player,
        id: SquareId,
        interest_rate: f64,
    ) -> Result<i64, ActionError> {
        let prop = &self.properties[id];
        if prop.owner != Some(player.id) {
            return Err(ActionError::NotOwner);
        }
        if !prop.mortgaged {
            return Err(ActionError::NotMortgaged);
        }
        let cost = (prop.current_price * 0.5 * (1.0 + interest_rate + 0.02)).round() as i64;
        if player.cash < cost {
            return Err(ActionError::InsufficientCash {
                needed: cost,
                available: player.cash,
            });
        }
        player.cash -= cost;
        self.properties[id].mortgaged = false;
        Ok(cost)
    }

    /// Return every holding of a bankrupt player to the unowned pool.
    pub fn release_assets(&mut self, player: &Player) {
        for &id in &player.owned {
            let prop = &mut self.properties[id];
            prop.owner = None;
            prop.mortgaged = false;
            prop.houses = 0;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
