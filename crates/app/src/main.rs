mod cli;
mod commands;
mod render;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn main() -> miette::Result<()> {
    let cli = <cli::Cli as clap::Parser>::parse();

    init_tracing();
    tracing::debug!(command = ?cli.command, "starting ced");

    let stdout = std::io::stdout();

    commands::run(&cli, &mut stdout.lock())
}
