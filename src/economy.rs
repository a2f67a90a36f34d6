// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite - Macroeconomic Model

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::types::ColorGroup;

// ─── Model Parameters ────────────────────────────────────────────────────────

/// Coefficients of the linearized IS / Phillips / Taylor system, plus the
/// clamps that keep the game economy inside playable bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconParams {
    /// pi*
    pub inflation_target: f64,
    /// r_bar
    pub natural_rate: f64,
    /// y_bar
    pub potential_output: f64,
    /// Inflation persistence.
    pub beta: f64,
    /// Phillips curve slope.
    pub kappa: f64,
    /// Taylor rule response to the inflation gap.
    pub phi_pi: f64,
    /// Taylor rule response to the output gap.
    pub phi_y: f64,
    /// IS curve sensitivity to the real-rate gap.
    pub sigma: f64,
    /// Property-price elasticity to effective inflation.
    pub lambda_prop: f64,
    /// Half-width of the uniform output shock.
    pub eps_y_std: f64,
    /// Half-width of the uniform inflation shock.
    pub eps_pi_std: f64,
    /// Deflation floor applied to payout indexation. Kept separate from
    /// `reprice_floor`: the two clamps guard different feedback loops.
    pub payout_floor: f64,
    /// Multiplicative floor on a single repricing step.
    pub reprice_floor: f64,
}

impl Default for EconParams {
    fn default() -> Self {
        Self {
            inflation_target: 0.02,
            natural_rate: 0.02,
            potential_output: 100.0,
            beta: 0.60,
            kappa: 0.10,
            phi_pi: 1.5,
            phi_y: 0.25,
            sigma: 1.0,
            lambda_prop: 0.5,
            eps_y_std: 0.5,
            eps_pi_std: 0.0025,
            payout_floor: -0.25,
            reprice_floor: 0.95,
        }
    }
}

// ─── History Series ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub round: u64,
    pub value: f64,
}

// ─── Macro Update Summary ────────────────────────────────────────────────────

/// Gaps and shocks realized by one model step, for logging and display.
#[derive(Debug, Clone, Copy)]
pub struct MacroUpdate {
    pub output_gap: f64,
    pub inflation_gap: f64,
    pub eps_y: f64,
    pub eps_pi: f64,
}

// ─── Economy State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyState {
    pub params: EconParams,
    pub inflation: f64,
    pub interest_rate: f64,
    pub output: f64,
    pub go_payout: f64,
    pub inflation_history: Vec<HistoryPoint>,
    pub rate_history: Vec<HistoryPoint>,
    pub output_history: Vec<HistoryPoint>,
}

impl EconomyState {
    pub fn new(params: EconParams) -> Self {
        let inflation = params.inflation_target;
        let interest_rate = params.natural_rate;
        let output = params.potential_output;
        Self {
            params,
            inflation,
            interest_rate,
            output,
            go_payout: 200.0,
            inflation_history: Vec::new(),
            rate_history: Vec::new(),
            output_history: Vec::new(),
        }
    }

    /// Inflation floored for indexation, preventing a runaway deflationary
    /// collapse of the payout.
    pub fn effective_inflation(&self) -> f64 {
        self.inflation.max(self.params.payout_floor)
    }

    /// Rounded GO payout collected when a player wraps the board.
    pub fn go_collect_amount(&self) -> i64 {
        self.go_payout.round() as i64
    }

    /// Advance the model one step.
    ///
    /// Invoked once per completed round, and again out-of-cycle whenever a
    /// card shock perturbs `inflation` directly — both triggers run the same
    /// recurrence, reading whatever inflation value is current.
    ///
    /// 1. Uniform shocks on output and inflation.
    /// 2. IS curve: `y_t = y* - sigma * (i_{t-1} - pi_{t-1} - r*) + eps_y`
    /// 3. Phillips curve: `pi_t = beta * pi_{t-1} + kappa * gap_y + eps_pi`
    /// 4. Taylor rule with zero lower bound.
    /// 5. Payout indexation with the deflation floor.
    pub fn advance(&mut self, round: u64, rng: &mut ChaCha8Rng) -> MacroUpdate {
        let p = self.params.clone();
        let eps_y = (rng.gen::<f64>() - 0.5) * 2.0 * p.eps_y_std;
        let eps_pi = (rng.gen::<f64>() - 0.5) * 2.0 * p.eps_pi_std;

        let prev_rate = self.interest_rate;
        let prev_inflation = self.inflation;

        let output = p.potential_output
            - p.sigma * (prev_rate - prev_inflation - p.natural_rate)
            + eps_y;
        self.output = output;
        let output_gap = output - p.potential_output;

        let inflation = p.beta * prev_inflation + p.kappa * output_gap + eps_pi;
        self.inflation = inflation;
        let inflation_gap = inflation - p.inflation_target;

        let unbounded = p.natural_rate
            + inflation
            + p.phi_pi * inflation_gap
            + p.phi_y * output_gap;
        // Zero lower bound.
        self.interest_rate = unbounded.max(0.0);

        let pi_effective = inflation.max(p.payout_floor);
        self.go_payout *= 1.0 + pi_effective;

        self.inflation_history.push(HistoryPoint {
            round,
            value: self.inflation,
        });
        self.rate_history.push(HistoryPoint {
            round,
            value: self.interest_rate,
        });
        self.output_history.push(HistoryPoint {
            round,
            value: self.output,
        });

        MacroUpdate {
            output_gap,
            inflation_gap,
            eps_y,
            eps_pi,
        }
    }
}

// ─── Structural Shocks ───────────────────────────────────────────────────────

/// Per-application deltas of an active structural shock. Each delta is the
/// template amount divided by the shock's duration.
#[derive(Debug, Clone, Serialize)]
pub struct ShockEffects {
    pub inflation: f64,
    pub output: f64,
    pub rate_cut: f64,
    /// Multiplies prices of the matching color band while active.
    pub sector: Option<(ColorGroup, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShockTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub duration: u32,
    pub effects: ShockEffects,
}

/// The structural shock table. Distinct from the chance deck's one-off
/// inflation shocks: these decay over several rounds.
pub fn shock_table() -> Vec<ShockTemplate> {
    vec![
        ShockTemplate {
            name: "Tech Productivity Boom",
            description: "Technological advancement increases productivity across all sectors",
            duration: 3,
            effects: ShockEffects {
                inflation: -0.01,
                output: 15.0,
                rate_cut: 0.0,
                sector: None,
            },
        },
        ShockTemplate {
            name: "Oil Price Shock",
            description: "Sudden increase in energy costs drives up inflation",
            duration: 2,
            effects: ShockEffects {
                inflation: 0.015,
                output: -8.0,
                rate_cut: 0.0,
                sector: None,
            },
        },
        ShockTemplate {
            name: "Financial Crisis Warning",
            description: "Market uncertainty leads to flight to safety",
            duration: 4,
            effects: ShockEffects {
                inflation: -0.005,
                output: -20.0,
                rate_cut: 0.01,
                sector: None,
            },
        },
        ShockTemplate {
            name: "Global Trade Expansion",
            description: "Increased international trade boosts economic activity",
            duration: 3,
            effects: ShockEffects {
                inflation: 0.008,
                output: 12.0,
                rate_cut: 0.0,
                sector: None,
            },
        },
        ShockTemplate {
            name: "Demographic Shift",
            description: "Population changes affect labor markets and housing demand",
            duration: 5,
            effects: ShockEffects {
                inflation: 0.0,
                output: 5.0,
                rate_cut: 0.0,
                sector: Some((ColorGroup::Brown, 0.025)),
            },
        },
    ]
}

/// At most one structural shock is active at a time.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveShock {
    pub template: ShockTemplate,
    pub turns_remaining: u32,
}

impl ActiveShock {
    pub fn new(template: ShockTemplate) -> Self {
        let turns_remaining = template.duration;
        Self {
            template,
            turns_remaining,
        }
    }

    /// Apply one decay step to the economy. Returns the sector price
    /// multiplier (if any) for the market to apply, and whether the shock
    /// has expired.
    pub fn apply(&mut self, economy: &mut EconomyState) -> (Option<(ColorGroup, f64)>, bool) {
        let duration = self.template.duration.max(1) as f64;
        let fx = &self.template.effects;

        economy.inflation += fx.inflation / duration;
        economy.output += fx.output / duration;
        if fx.rate_cut != 0.0 {
            economy.interest_rate = (economy.interest_rate - fx.rate_cut / duration).max(0.0);
        }
        let sector = fx
            .sector
            .map(|(group, effect)| (group, 1.0 + effect / duration));

        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        (sector, self.turns_remaining == 0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
