//! # SmartCompile Main Entry Point
//!
//! Line-oriented code workbench backed by a SmartCompile server.

use anyhow::Result;
use smartcompile::cmd_args::CommandLineArgs;
use smartcompile::config;
use smartcompile::{AppController, AppState, HttpTransport};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    let profile_path = config::get_profile_path();
    let profile = config::load_profile(args.profile(), &profile_path)?;
    let server = args.server().unwrap_or(profile.server());

    let transport = HttpTransport::new(server, profile.timeout())?;
    let mut app = AppController::with_state(
        AppState::with_language(args.language()),
        Arc::new(transport),
    );

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!("🔵 SmartCompile Workbench");
        println!("Backend: {server}");
        println!("Type ':help' for commands, ':show' to see the code, ':quit' to exit");
        println!();
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    app.run(stdin, &mut stdout, interactive).await?;

    if interactive {
        println!("\n👋 Thanks for using SmartCompile!");
    }
    Ok(())
}
