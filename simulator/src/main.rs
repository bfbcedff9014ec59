use anyhow::{Context, Result};
use clap::Parser;
use luckybox_simulator::{encode_journal, run, Config, ValidatedConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config's seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of rounds.
    #[arg(long)]
    rounds: Option<u64>,

    /// Write the encoded event journal here.
    #[arg(long)]
    journal: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<ValidatedConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_yaml::from_str::<Config>(&raw).context("failed to parse config")?
        }
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if args.journal.is_some() {
        config.journal = args.journal.clone();
    }
    config.validate().context("invalid config")
}

fn init_tracing(config: &ValidatedConfig) {
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(config.log_level)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(config.log_level)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_tracing(&config);
    info!(
        seed = config.seed,
        rounds = config.rounds,
        players = config.players,
        "starting simulation"
    );

    let summary = run(&config).context("simulation failed")?;
    if let Some(path) = &config.journal {
        std::fs::write(path, encode_journal(&summary.events))
            .with_context(|| format!("failed to write journal {}", path.display()))?;
        info!(path = %path.display(), events = summary.events.len(), "journal written");
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
