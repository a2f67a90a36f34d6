// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Decision Interface

use crate::types::{PlayerId, SquareId};

// ─── Requests ────────────────────────────────────────────────────────────────

/// A choice point surfaced by the engine mid-turn. Borrowed views only; the
/// provider cannot mutate session state, it can only answer.
#[derive(Debug)]
pub enum DecisionRequest<'a> {
    /// The current player may buy the square they landed on. Only issued
    /// when the price is affordable.
    BuyProperty {
        player: PlayerId,
        square: SquareId,
        name: &'a str,
        price: i64,
    },
    /// Pay the jail fine to get out before rolling.
    PayJailFine { player: PlayerId, fine: i64 },
    /// Spend a held release card to get out of jail.
    UseJailCard { player: PlayerId },
    /// Optional pre-roll mortgage; `Property` selects a square from the
    /// candidate list, `Pass` declines.
    MortgageChoice {
        player: PlayerId,
        mortgageable: &'a [SquareId],
    },
    /// Optional pre-roll house purchase on one of the listed squares.
    BuildChoice {
        player: PlayerId,
        buildable: &'a [SquareId],
    },
}

/// Provider answer. `Yes`/`No` answer binary requests; `Property` picks a
/// square for the management requests; `Pass` declines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    Property(SquareId),
    Pass,
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Strategy seam between the engine and whoever is playing: a UI adapter, a
/// scripted policy, or a test double.
pub trait DecisionProvider {
    fn decide(&mut self, request: DecisionRequest<'_>) -> Decision;
}

/// Headless baseline policy: buy whatever is affordable, pay out of jail
/// immediately, spend release cards, never manage holdings.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPolicy;

impl DecisionProvider for AutoPolicy {
    fn decide(&mut self, request: DecisionRequest<'_>) -> Decision {
        match request {
            DecisionRequest::BuyProperty { .. } => Decision::Yes,
            DecisionRequest::PayJailFine { .. } => Decision::Yes,
            DecisionRequest::UseJailCard { .. } => Decision::Yes,
            DecisionRequest::MortgageChoice { .. } => Decision::Pass,
            DecisionRequest::BuildChoice { .. } => Decision::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_policy_buys_and_pays() {
        let mut policy = AutoPolicy;
        let d = policy.decide(DecisionRequest::BuyProperty {
            player: 0,
            square: 1,
            name: "Friedman Ave",
            price: 60,
        });
        assert_eq!(d, Decision::Yes);
        let d = policy.decide(DecisionRequest::PayJailFine { player: 0, fine: 50 });
        assert_eq!(d, Decision::Yes);
    }

    #[test]
    fn test_auto_policy_passes_on_management() {
        let mut policy = AutoPolicy;
        let d = policy.decide(DecisionRequest::BuildChoice {
            player: 0,
            buildable: &[1, 3],
        });
        assert_eq!(d, Decision::Pass);
        let d = policy.decide(DecisionRequest::MortgageChoice {
            player: 0,
            mortgageable: &[1],
        });
        assert_eq!(d, Decision::Pass);
    }
}
