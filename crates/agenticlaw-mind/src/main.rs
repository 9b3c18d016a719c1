use agenticlaw_mind::{config::MindConfig, Manager};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "agenticlaw-mind", about = "Spiritual Biology — per-agent self-improvement engine")]
struct Cli {
    /// Directory holding per-agent mind stores (a `mind/` subdirectory is created under it).
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Path to a TOML config file; falls back to built-in defaults if absent.
    #[arg(long, default_value = "./mind.toml")]
    config: PathBuf,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard snapshot for one agent.
    Dashboard { agent_id: String },
    /// Print the dream-cron scheduler payload for one agent.
    DreamCronPayload { agent_id: String },
    /// Run one dream cycle for one agent and print the composed prompt.
    Dream {
        agent_id: String,
        #[arg(long)]
        days: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = MindConfig::load(&cli.config);

    if cli.dump_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let manager = Manager::new(&cli.data_dir, config);

    match cli.command {
        Some(Command::Dashboard { agent_id }) => {
            let dashboard = manager.dashboard(&agent_id)?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        Some(Command::DreamCronPayload { agent_id }) => {
            let payload = manager.dream_cron_payload(&agent_id);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Some(Command::Dream { agent_id, days }) => {
            let store = manager.get_mind_store(&agent_id)?;
            let config = manager.config();
            let output = agenticlaw_mind::dream::dream(
                &store,
                days,
                &config.dream,
                config.decay.decay_factor,
                config.decay.min_relevance,
            );
            println!("{}", output.prompt);
        }
        None => {
            tracing::info!("no subcommand given; use --help to see available commands");
        }
    }

    manager.close_all();
    Ok(())
}
