use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use pwhois::{spawn_lookup, Cli, ColorScheme, OutputColorizer, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(&args).await {
        eprintln!("{}: {:#}", "Query failed".bright_red(), err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Cli) -> Result<()> {
    args.check_targets()?;
    let config = args.server_config();
    let kind = args.query_kind();

    if args.verbose {
        println!("{}: {}", "Query".bright_green(), args.targets.join(" ").bright_white());
        println!("{}: {}", "Lookup".bright_cyan(), kind.to_string().yellow());
        println!("{}: {}", "Server".bright_cyan(), config.address().yellow());
    }

    let mut session = Session::new(config);
    let query = session.builder().build(kind, args.targets.as_slice())?;

    session
        .connect()
        .await
        .with_context(|| format!("Cannot reach pwhois server {}", session.config().address()))?;

    let lookup = spawn_lookup(session, query)
        .await
        .context("Lookup task ended without a result")??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lookup)?);
        return Ok(());
    }

    let output = OutputColorizer::render(&lookup);
    let scheme = if args.use_color() {
        ColorScheme::Pwhois
    } else {
        ColorScheme::None
    };
    println!("{}", OutputColorizer::colorize(&output, scheme));
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "pwhois=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
