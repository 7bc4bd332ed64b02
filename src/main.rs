//! `lfg-sim`: run a dungeon queue simulation from the command line.

use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;

use lfg_scheduler::builders::SimulationBuilder;
use lfg_scheduler::config::{parse_integer, RawArgs, SimulationConfig};
use lfg_scheduler::core::{AppResult, EventSink};
use lfg_scheduler::report;
use lfg_scheduler::util::init_tracing;

/// Simulate dungeon instances forming parties from a shared player pool.
#[derive(Debug, Parser)]
#[command(name = "lfg-sim", version, about)]
struct Cli {
    /// Number of concurrent dungeon instances (1-100).
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    instances: Option<String>,
    /// Initial tanks.
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    tanks: Option<String>,
    /// Initial healers.
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    healers: Option<String>,
    /// Initial damage dealers.
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    dps: Option<String>,
    /// Minimum dungeon duration in seconds.
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    t1: Option<String>,
    /// Maximum dungeon duration in seconds (clamped to 15).
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    t2: Option<String>,
    /// Seconds to generate bonus players (0 or omitted = infinite).
    #[arg(allow_hyphen_values = true)]
    bonus_duration: Option<String>,

    /// Load the configuration from a JSON file instead of positional values.
    #[arg(long, value_name = "PATH", conflicts_with = "instances")]
    config: Option<PathBuf>,
    /// Seed every random stream for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Real milliseconds per simulated second.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn load_config(&self) -> AppResult<SimulationConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return Ok(SimulationConfig::from_json_str(&text)?);
        }

        let field = |name: &'static str, value: &Option<String>| -> AppResult<i64> {
            let raw = value
                .as_deref()
                .with_context(|| format!("missing argument `{name}`"))?;
            Ok(parse_integer(name, raw)?)
        };
        let raw = RawArgs {
            instances: field("instances", &self.instances)?,
            tanks: field("tanks", &self.tanks)?,
            healers: field("healers", &self.healers)?,
            dps: field("dps", &self.dps)?,
            t1: field("t1", &self.t1)?,
            t2: field("t2", &self.t2)?,
            bonus_duration: self
                .bonus_duration
                .as_deref()
                .map(|raw| parse_integer("bonus_duration", raw))
                .transpose()?,
        };
        Ok(SimulationConfig::from_raw(raw)?)
    }
}

fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing("warn");
    let cli = Cli::parse();

    let (events, rx) = EventSink::channel();
    let simulation = SimulationBuilder::new(cli.load_config()?)
        .seed(cli.seed)
        .tick_ms(cli.tick_ms)
        .events(events)
        .build()?;

    let quiet = cli.json;
    if !quiet {
        for clamp in simulation.config().clamps() {
            println!("Note: {clamp}");
        }
        if simulation.config().starts_exhausted() {
            println!(
                "Warning: Not enough players to form even one party (need 1 Tank, 1 Healer, 3 DPS)"
            );
        }
        println!("{}", report::banner(simulation.config()));
    }

    let printer = thread::Builder::new()
        .name("lfg-printer".into())
        .spawn(move || {
            for event in rx {
                if !quiet {
                    println!("{}", report::describe(&event));
                }
            }
        })
        .context("spawning event printer")?;

    let outcome = simulation.run();
    // the simulation owned the last sender; the printer drains and exits
    if printer.join().is_err() {
        tracing::warn!("event printer panicked");
    }
    let summary = outcome?;

    if quiet {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{summary}");
    }
    Ok(())
}
