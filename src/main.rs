use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use chatline::cli::{init_logging, run_ask, run_repl, Cli, Commands};
use chatline::connector::tui;
use chatline::{ChatApp, Conversation};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_target(), cli.verbose)?;

    let backend = cli.backend();
    if let Some(client) = backend.client() {
        info!("Using chat model {}", client.model_name());
    }

    match cli.command() {
        Commands::Chat => {
            tui::run(ChatApp::new(backend)).await?;
        }

        Commands::Ask { prompt } => {
            let mut conversation = Conversation::new(backend);
            run_ask(
                &mut conversation,
                &prompt,
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await?;
        }

        Commands::Repl => {
            let mut conversation = Conversation::new(backend);
            let stdin = BufReader::new(tokio::io::stdin());
            run_repl(&mut conversation, stdin, &mut std::io::stdout()).await?;
        }
    }

    Ok(())
}
