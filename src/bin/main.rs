use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cineniche")]
#[command(about = "Browse and manage the CineNiche movie catalog", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "cineniche.yaml")]
    config: String,

    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: cineniche::Command,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug { "cineniche=debug" } else { "cineniche=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cineniche::run(&args.config, args.debug, args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
