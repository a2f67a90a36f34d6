// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Card Decks

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::VecDeque;

use crate::types::{SquareId, SquareKind};

// ─── Card Action ─────────────────────────────────────────────────────────────

/// Closed set of card effects, matched exhaustively by the dispatcher.
/// Adding an action kind is a compile-time-checked extension.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum CardAction {
    /// Move forward to an absolute position, collecting GO on the way.
    MoveTo { position: SquareId },
    /// Move forward to the nearest square of `kind`; rent owed there is
    /// doubled when `double_rent` is set.
    MoveToNearest { kind: SquareKind, double_rent: bool },
    Collect { amount: i64 },
    Pay { amount: i64 },
    CollectFromPlayers { amount: i64 },
    PayEachPlayer { amount: i64 },
    JailRelease,
    GoToJail,
    /// Per-asset repair levy, charged only on the drawer's own holdings.
    Repairs { per_house: i64, per_hotel: i64 },
    /// One-off perturbation of inflation; triggers an immediate
    /// out-of-cycle macro recompute.
    InflationShock { delta: f64 },
}

// ─── Card ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub text: &'static str,
    pub action: CardAction,
}

// ─── Deck ────────────────────────────────────────────────────────────────────

/// Cyclic deck: drawing pops the front card and pushes it to the back, so
/// the deck never shrinks and is never reshuffled mid-game.
#[derive(Debug, Clone, Serialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    /// Fisher-Yates shuffle, session start only.
    pub fn shuffle(&mut self, rng: &mut ChaCha8Rng) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn draw(&mut self) -> Card {
        let card = self
            .cards
            .pop_front()
            .expect("decks are non-empty by construction");
        self.cards.push_back(card.clone());
        card
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ─── Standard Decks ──────────────────────────────────────────────────────────

/// Chance deck: exogenous one-off inflation shocks.
pub fn chance_deck() -> Deck {
    let shock = |text, delta| Card {
        text,
        action: CardAction::InflationShock { delta },
    };
    Deck::new(vec![
        shock("Global oil price spike! Inflation temporarily rises.", 0.03),
        shock("Supply chain crisis deepens. Inflation gets worse.", 0.02),
        shock(
            "Central Bank unexpectedly raises interest rate targets. Inflation cools.",
            -0.015,
        ),
        shock("Breakthrough in AI boosts productivity! Inflation eases.", -0.02),
        shock(
            "Government announces major infrastructure spending. Inflationary pressures mount.",
            0.025,
        ),
        shock(
            "Bumper harvest leads to lower food prices. Disinflationary shock.",
            -0.01,
        ),
        shock("New trade tariffs imposed on imports. Prices jump.", 0.015),
        shock(
            "Consumer confidence surges, spending increases. Inflation ticks up.",
            0.01,
        ),
        shock(
            "A major bank requires a bailout, shaking confidence. Mildly deflationary.",
            -0.005,
        ),
        shock(
            "Technological stagnation reported in key sectors. Inflationary pressure builds.",
            0.01,
        ),
        shock(
            "International peace treaty signed, opening new markets. Disinflationary.",
            -0.01,
        ),
        shock(
            "Housing market boom cools faster than expected. Deflationary pressure.",
            -0.015,
        ),
    ])
}

/// Community treasury deck: classic cash and movement effects.
pub fn community_deck() -> Deck {
    use CardAction::*;
    Deck::new(vec![
        Card {
            text: "Advance to Go (Collect $200)",
            action: MoveTo { position: 0 },
        },
        Card {
            text: "Bank error in your favor. Collect $200.",
            action: Collect { amount: 200 },
        },
        Card {
            text: "Doctor's fees. Pay $50.",
            action: Pay { amount: 50 },
        },
        Card {
            text: "From sale of stock you get $50.",
            action: Collect { amount: 50 },
        },
        Card {
            text: "Get Out of Jail Free.",
            action: JailRelease,
        },
        Card {
            text: "Go to Jail. Go directly to jail.",
            action: GoToJail,
        },
        Card {
            text: "Grand Opera Night. Collect $50 from every player for opening night seats.",
            action: CollectFromPlayers { amount: 50 },
        },
        Card {
            text: "Holiday Fund matures. Receive $100.",
            action: Collect { amount: 100 },
        },
        Card {
            text: "Income tax refund. Collect $20.",
            action: Collect { amount: 20 },
        },
        Card {
            text: "It is your birthday. Collect $10 from every player.",
            action: CollectFromPlayers { amount: 10 },
        },
        Card {
            text: "Life insurance matures. Collect $100.",
            action: Collect { amount: 100 },
        },
        Card {
            text: "Pay hospital fees of $100.",
            action: Pay { amount: 100 },
        },
        Card {
            text: "Pay school fees of $150.",
            action: Pay { amount: 150 },
        },
        Card {
            text: "Receive $25 consultancy fee.",
            action: Collect { amount: 25 },
        },
        Card {
            text: "You have won second prize in a beauty contest. Collect $10.",
            action: Collect { amount: 10 },
        },
        Card {
            text: "You inherit $100.",
            action: Collect { amount: 100 },
        },
        Card {
            text: "You have been elected Chairman of the Board. Pay each player $50.",
            action: PayEachPlayer { amount: 50 },
        },
        Card {
            text: "Make general repairs on all your property: For each house pay $25, for each hotel $100",
            action: Repairs {
                per_house: 25,
                per_hotel: 100,
            },
        },
    ])
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_deck_length_invariant_across_draws() {
        let mut deck = chance_deck();
        let n = deck.len();
        for _ in 0..(n * 3 + 5) {
            deck.draw();
        }
        assert_eq!(deck.len(), n);
    }

    #[test]
    fn test_draw_cycles_in_order() {
        let mut deck = community_deck();
        let n = deck.len();
        let first_pass: Vec<&'static str> = (0..n).map(|_| deck.draw().text).collect();
        let second_pass: Vec<&'static str> = (0..n).map(|_| deck.draw().text).collect();
        // Without reshuffling, the cycle repeats exactly and skips nothing.
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_shuffle_preserves_contents() {
        let mut deck = community_deck();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = deck.len();
        deck.shuffle(&mut rng);
        assert_eq!(deck.len(), n);
        let mut texts: Vec<&'static str> = (0..n).map(|_| deck.draw().text).collect();
        texts.sort_unstable();
        let mut pristine = community_deck();
        let mut expected: Vec<&'static str> = (0..n).map(|_| pristine.draw().text).collect();
        expected.sort_unstable();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_standard_deck_sizes() {
        assert_eq!(chance_deck().len(), 12);
        assert_eq!(community_deck().len(), 18);
    }

    #[test]
    fn test_chance_deck_is_all_inflation_shocks() {
        let mut deck = chance_deck();
        for _ in 0..deck.len() {
            let card = deck.draw();
            assert!(matches!(card.action, CardAction::InflationShock { .. }));
        }
    }
}
