//! Quippy Control - CLI client for the Quippy daemon
//!
//! Describe a computer problem, get a system-aware answer.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use quippyctl::client::{QuippyClient, DEFAULT_URL};
use quippyctl::{display, repl};

// Version is embedded at build time
const VERSION: &str = env!("QUIPPY_VERSION");

#[derive(Parser)]
#[command(name = "quippyctl")]
#[command(about = "The Quippy - computer troubleshooting assistant", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Daemon address
    #[arg(long, env = "QUIPPY_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current system snapshot
    Scan,

    /// Ask one question and print the answer
    Ask {
        /// Problem description
        #[arg(required = true, trailing_var_arg = true)]
        problem: Vec<String>,
    },

    /// Start an interactive chat session
    Chat,

    /// Show daemon health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = QuippyClient::new(cli.url);

    match cli.command {
        Commands::Scan => {
            let snapshot = client.scan().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                display::print_snapshot(&snapshot);
            }
        }
        Commands::Ask { problem } => {
            let problem = problem.join(" ");
            if problem.trim().is_empty() {
                bail!("Problem description is empty");
            }
            let reply = client.chat(&problem).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                display::print_user(&problem);
                display::print_system(&reply.reply.content);
            }
        }
        Commands::Chat => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run_chat(&client, stdin).await?;
        }
        Commands::Health => {
            let health = client.health().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                display::print_health(&health, client.base_url());
            }
        }
    }

    Ok(())
}
