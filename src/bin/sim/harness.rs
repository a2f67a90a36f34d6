// Headless Game Harness — one seeded game per call
// Flat-rent mode with the baseline auto policy, run to completion or the
// turn cap, whichever comes first

use monopoly_engine::{AutoPolicy, GameConfig, GameSession};

use crate::report::GameResult;
use std::time::Instant;

pub fn run_single(players: usize, turns: u64, seed: u64) -> GameResult {
    let start = Instant::now();
    let config = GameConfig {
        num_players: players,
        seed,
        flat_rent: true,
        ..GameConfig::default()
    };
    let mut session = GameSession::new(config);
    let mut policy = AutoPolicy;

    let mut turns_played = 0;
    for _ in 0..turns {
        if session.is_game_over() {
            break;
        }
        session.play_turn(&mut policy);
        turns_played += 1;
    }

    let survivors = session.players().len();
    let winner = if session.is_game_over() {
        session.players().first().map(|p| p.name.clone())
    } else {
        None
    };
    let properties_owned = session
        .market()
        .properties()
        .iter()
        .filter(|p| p.owner.is_some())
        .count();
    let avg_net_worth = if survivors > 0 {
        session.players().iter().map(|p| p.net_worth).sum::<f64>() / survivors as f64
    } else {
        0.0
    };

    GameResult {
        seed,
        turns_played,
        rounds: session.round(),
        completed: session.is_game_over(),
        winner,
        survivors,
        bankruptcies: players - survivors,
        final_inflation: session.economy().inflation,
        final_rate: session.economy().interest_rate,
        final_go_payout: session.economy().go_payout,
        properties_owned,
        avg_net_worth,
        elapsed_ms: start.elapsed().as_millis(),
    }
}
