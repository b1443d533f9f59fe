use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod interactive;
mod output;
mod progress;
mod save;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("promptly error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Config { action } => return commands::config::handle(action.as_ref(), &flags),
        cli::Commands::Templates => return commands::templates::handle(&flags),
        _ => {}
    }

    let config = bootstrap::load_config()?;
    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(config)?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PROMPTLY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
