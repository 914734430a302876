//! Sync command: pull the server's entries into the local store.

use clap::Args;

use diary::sync::ItemOutcome;
use diary::{DiaryStore, Reconciler};

/// Merge entries from the server into the local diary
#[derive(Args)]
pub struct SyncCommand {
    /// List what happened to each remote entry
    #[arg(long, short)]
    pub verbose: bool,
}

impl SyncCommand {
    pub async fn run(
        &self,
        store: &DiaryStore,
        reconciler: &Reconciler,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("Syncing with server...");

        let report = match reconciler.run(store).await {
            Some(report) => report,
            None => {
                println!("  ✗ server unreachable or returned an invalid response");
                return Ok(());
            }
        };

        if self.verbose {
            for (date, outcome) in &report.outcomes {
                match outcome {
                    ItemOutcome::Inserted(id) => println!("  + {} (ID {})", date, id),
                    ItemOutcome::Skipped => println!("  = {} (kept local entry)", date),
                    ItemOutcome::Failed(e) => println!("  ✗ {} - {}", date, e),
                }
            }
        }

        println!();
        println!(
            "{} fetched, {} added, {} already present, {} failed",
            report.fetched(),
            report.inserted(),
            report.skipped(),
            report.failed()
        );
        Ok(())
    }
}
