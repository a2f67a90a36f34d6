// Batch Simulation Runner v1.0.0 — Macro-Coupled Game Statistics
// N seeded headless games, flat-rent auto policy, aggregate JSON report
//
// Usage:
//   cargo run --release --bin sim                    # 30 games, defaults
//   cargo run --release --bin sim -- --games 100     # Bigger batch
//   cargo run --release --bin sim -- --turns 500     # Longer games
//   cargo run --release --bin sim -- --players 6     # More players
//   cargo run --release --bin sim -- --seed 42       # Custom base seed

mod harness;
mod report;

use report::*;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    games: usize,
    turns: u64,
    players: usize,
    seed: u64,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        games: 30,
        turns: 200,
        players: 4,
        seed: 0,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                if i < args.len() {
                    cli.games = args[i].parse().unwrap_or(30);
                }
            }
            "--turns" => {
                i += 1;
                if i < args.len() {
                    cli.turns = args[i].parse().unwrap_or(200);
                }
            }
            "--players" => {
                i += 1;
                if i < args.len() {
                    cli.players = args[i].parse().unwrap_or(4);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();

    println!("\n  Batch Simulation Runner v1.0.0");
    println!(
        "  PRNG: ChaCha8Rng | Games: {} | Turns/game: {} | Players: {} | Base seed: {}",
        cli.games, cli.turns, cli.players, cli.seed
    );
    println!(
        "\n  {:<6} {:>7} {:>6} {:>9} {:>8} {:>10} {:>12} {:>7}",
        "Game", "Rounds", "Done", "Infl%", "Rate%", "Payout", "AvgNW", "Time"
    );
    println!("  {}", "-".repeat(72));

    let suite_start = Instant::now();
    let mut results = Vec::with_capacity(cli.games);

    for game in 0..cli.games {
        let result = harness::run_single(cli.players, cli.turns, cli.seed + game as u64);
        println!(
            "  {:<6} {:>7} {:>6} {:>8.2}% {:>7.2}% {:>10.0} {:>12.0} {:>5}ms",
            game,
            result.rounds,
            if result.completed { "yes" } else { "no" },
            result.final_inflation * 100.0,
            result.final_rate * 100.0,
            result.final_go_payout,
            result.avg_net_worth,
            result.elapsed_ms,
        );
        results.push(result);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Aggregation ────────────────────────────────────────────────────

    let completed = results.iter().filter(|r| r.completed).count();
    let report = BatchReport {
        generated_unix: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        games: cli.games,
        turns_per_game: cli.turns,
        players: cli.players,
        base_seed: cli.seed,
        completion_rate: completed as f64 / cli.games.max(1) as f64,
        final_inflation: Stats::from_samples(
            &results.iter().map(|r| r.final_inflation).collect::<Vec<_>>(),
        ),
        final_rate: Stats::from_samples(
            &results.iter().map(|r| r.final_rate).collect::<Vec<_>>(),
        ),
        final_go_payout: Stats::from_samples(
            &results.iter().map(|r| r.final_go_payout).collect::<Vec<_>>(),
        ),
        survivors: Stats::from_samples(
            &results.iter().map(|r| r.survivors as f64).collect::<Vec<_>>(),
        ),
        properties_owned: Stats::from_samples(
            &results.iter().map(|r| r.properties_owned as f64).collect::<Vec<_>>(),
        ),
        avg_net_worth: Stats::from_samples(
            &results.iter().map(|r| r.avg_net_worth).collect::<Vec<_>>(),
        ),
        results,
    };

    println!("  {}", "-".repeat(72));
    println!(
        "  Completed: {}/{} ({:.0}%)  Suite time: {:.1}s",
        completed,
        cli.games,
        report.completion_rate * 100.0,
        suite_elapsed.as_secs_f64()
    );
    println!(
        "  Inflation: {:.2}% ± {:.2}%  Rate: {:.2}%  GO payout: {:.0} ± {:.0}",
        report.final_inflation.mean * 100.0,
        (report.final_inflation.ci_upper - report.final_inflation.ci_lower) / 2.0 * 100.0,
        report.final_rate.mean * 100.0,
        report.final_go_payout.mean,
        (report.final_go_payout.ci_upper - report.final_go_payout.ci_lower) / 2.0,
    );

    // ─── JSON Report ────────────────────────────────────────────────────

    let out_dir = std::path::Path::new("simulation-results");
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }
    let out_path = out_dir.join(format!("sim-{}.json", report.generated_unix));
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&out_path, json) {
                eprintln!("Failed to write {}: {}", out_path.display(), e);
                std::process::exit(1);
            }
            println!("  Report written to {}\n", out_path.display());
        }
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
