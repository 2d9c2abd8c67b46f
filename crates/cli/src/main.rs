use anyhow::Context;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Book catalog service
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service until interrupted
    Serve,
    /// Print the genre allow-list, one label per line
    Genres,
    /// Print the effective settings as JSON
    Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    match cli.command {
        Command::Serve => serve(settings),
        Command::Genres => {
            let store = bookstore_app::modules::books::build_store(&settings.catalog)?;
            for genre in store.allowed_genres() {
                println!("{genre}");
            }
            Ok(())
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn serve(settings: Settings) -> anyhow::Result<()> {
    bookstore_telemetry::init(&settings.telemetry)?;
    tracing::info!(env = ?settings.environment, "bookstore serve starting");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "failed to build tokio runtime")?
        .block_on(bookstore_app::run(settings))
}
