//! randbeans-runner: prints records drawn from a plan file, one JSON object per line.
//!
//! Usage:
//!   randbeans-runner --plan data/sample_plan.json --rows 10
//!   randbeans-runner --plan data/sample_plan.json --rows 10 --seed 12345
//!
//! Seed precedence: --seed, the plan's "seed", RANDBEANS_SEED, entropy.

use anyhow::{Context, Result};
use randbeans_core::{config::PlanConfig, plan::RecordPlan};
use std::env;
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let rows = parse_arg(&args, "--rows", 10usize);
    let seed = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .map(|w| w[1].parse::<u64>())
        .transpose()
        .context("--seed must be a u64")?;
    let plan_path = args
        .windows(2)
        .find(|w| w[0] == "--plan")
        .map(|w| w[1].as_str())
        .unwrap_or("./data/sample_plan.json");

    let config = PlanConfig::load(plan_path)?;
    let plan = RecordPlan::from_config(&config, seed)?;
    log::info!("Drawing {rows} records from {plan_path} (seed {})", plan.seed());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..rows {
        writeln!(out, "{}", serde_json::to_string(&plan.next_record())?)?;
    }
    out.flush()?;
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
