use chrono::Local;
use clap::Args;

use super::parse_date;
use diary::{compose, ApiClient, DiaryStore};

/// Write today's entry from a keyword
#[derive(Args)]
pub struct WriteCommand {
    /// Keyword or short prompt describing the day
    pub keyword: String,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,
}

impl WriteCommand {
    pub async fn run(
        &self,
        store: &DiaryStore,
        api: &ApiClient,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = match &self.date {
            Some(d) => parse_date(d)?,
            None => Local::now().date_naive(),
        };

        if let Some(existing) = store.get_entry_by_date(date).await {
            println!(
                "Note: {} already has an entry (ID {}); adding another.",
                date, existing.id
            );
        }

        println!("Creating your diary entry...");
        let composed = compose(store, api, date, &self.keyword).await?;

        println!("Your diary entry has been saved (ID {}).", composed.id);
        println!();
        println!("{}", composed.content);
        Ok(())
    }
}
