// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Bankruptcy Resolution

use crate::board::Board;
use crate::events::{EventLog, LogCategory};
use crate::market::PropertyMarket;
use crate::types::{Player, SquareId};

// ─── Resolution ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Cash restored to non-negative; the player stays in the game.
    Solvent,
    /// Liquidation exhausted; assets released and the player is out.
    Bankrupt,
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Forced-liquidation loop, run whenever a payment leaves a player with
/// negative cash. Houses go first (most-developed holding each step, lowest
/// id on ties), then mortgages on the lowest-id unmortgaged holding. If
/// neither raises enough, the player is declared bankrupt and every holding
/// returns to the unowned pool.
pub fn resolve(
    player: &mut Player,
    market: &mut PropertyMarket,
    board: &Board,
    log: &mut EventLog,
) -> Resolution {
    while player.cash < 0 {
        if let Some(id) = next_house_sale(player, market) {
            let refund = market
                .sell_house(board, player, id)
                .unwrap_or_else(|_| unreachable!("candidate was validated"));
            log.push(
                LogCategory::Warning,
                format!(
                    "{} sells a house on {} for ${}",
                    player.name,
                    board.square(id).name,
                    refund
                ),
            );
        } else if let Some(id) = next_mortgage(player, market, board) {
            let credit = market
                .mortgage(player, id)
                .unwrap_or_else(|_| unreachable!("candidate was validated"));
            log.push(
                LogCategory::Warning,
                format!(
                    "{} mortgages {} for ${}",
                    player.name,
                    board.square(id).name,
                    credit
                ),
            );
        } else {
            market.release_assets(player);
            player.owned.clear();
            player.is_bankrupt = true;
            log.push(
                LogCategory::Error,
                format!("{} is bankrupt and leaves the game", player.name),
            );
            return Resolution::Bankrupt;
        }
    }
    Resolution::Solvent
}

/// Most-developed holding with at least one house; lowest id breaks ties.
fn next_house_sale(player: &Player, market: &PropertyMarket) -> Option<SquareId> {
    player
        .owned
        .iter()
        .copied()
        .filter(|&id| market.property(id).houses > 0)
        .max_by(|&a, &b| {
            market
                .property(a)
                .houses
                .cmp(&market.property(b).houses)
                .then(b.cmp(&a))
        })
}

/// Lowest-id unmortgaged holding.
fn next_mortgage(player: &Player, market: &PropertyMarket, board: &Board) -> Option<SquareId> {
    player
        .owned
        .iter()
        .copied()
        .find(|&id| board.square(id).kind.is_purchasable() && !market.property(id).mortgaged)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
