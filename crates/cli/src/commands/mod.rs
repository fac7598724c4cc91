//! Subcommand handlers. Results go to stdout; diagnostics go through `tracing`.

mod library;
mod write;

use cowriter::CoWriter;
use pipeline::Timestamp;

use crate::cli::Commands;

/// Runs a parsed command against a ready co-writer.
pub async fn dispatch(command: Commands, writer: &mut CoWriter) -> anyhow::Result<()> {
    match command {
        Commands::Seed { action } => library::seed(action, writer).await,
        Commands::Note { action } => library::note(action, writer).await,
        Commands::Article { action } => library::article(action, writer).await,
        Commands::Stats => library::stats(writer).await,
        Commands::Status => {
            library::status(writer);
            Ok(())
        }
        Commands::Write(args) => write::run(args, writer).await,
    }
}

/// Prints the setup banner, if any configuration is missing.
pub fn print_setup_notice(writer: &CoWriter) {
    if let Some(notice) = writer.setup_notice() {
        for line in notice.messages() {
            println!("! {line}");
        }
        println!();
    }
}

fn short_date(ts: Timestamp) -> String {
    ts.as_datetime().format("%Y-%m-%d").to_string()
}
