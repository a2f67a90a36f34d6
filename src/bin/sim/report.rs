// Batch Simulation Report Types
// Structured output for offline analysis of macro-coupled game runs

use serde::Serialize;

// ─── Statistics (per-metric batch aggregation) ──────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Game Result ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub seed: u64,
    pub turns_played: u64,
    pub rounds: u64,
    pub completed: bool,
    pub winner: Option<String>,
    pub survivors: usize,
    pub bankruptcies: usize,
    pub final_inflation: f64,
    pub final_rate: f64,
    pub final_go_payout: f64,
    pub properties_owned: usize,
    pub avg_net_worth: f64,
    pub elapsed_ms: u128,
}

// ─── Batch Report ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_unix: u64,
    pub games: usize,
    pub turns_per_game: u64,
    pub players: usize,
    pub base_seed: u64,
    pub completion_rate: f64,
    pub final_inflation: Stats,
    pub final_rate: Stats,
    pub final_go_payout: Stats,
    pub survivors: Stats,
    pub properties_owned: Stats,
    pub avg_net_worth: Stats,
    pub results: Vec<GameResult>,
}
