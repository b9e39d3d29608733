use anyhow::Context;
use clap::{Parser, Subcommand};
use prompter::{
    init,
    assistant::configuration::Configuration,
    assistant::graph::PromptGraph,
    repl::run_repl,
    server::run_server,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Refine music descriptions into Text-to-Music prompts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the chat page (default)
    Serve,
    /// Chat in the terminal
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables from .env
    init();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Configuration::from_env().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Repl => {
            let graph = PromptGraph::new(config);
            run_repl(&graph, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
        }
    }
}
