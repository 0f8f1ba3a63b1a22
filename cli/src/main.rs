use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stdout is reserved for the saved path)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,floorplan_export=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = args::Args::parse();
    let saved = run::run(args).await?;

    println!("{}", saved.display());
    Ok(())
}
