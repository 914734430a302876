use clap::Args;

use super::{parse_date, OutputFormat};
use diary::{DiaryStore, History};

/// List all entries, newest first
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub async fn run(&self, store: &DiaryStore) -> Result<(), Box<dyn std::error::Error>> {
        let entries = store.get_entries().await;

        if entries.is_empty() {
            println!("No diary entries found");
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                for entry in &entries {
                    let preview = match &entry.content {
                        Some(content) => preview(content, 50),
                        None => "(no content yet)".to_string(),
                    };
                    println!(
                        "{:>4}  {}  {:16} {}",
                        entry.id,
                        entry.date,
                        preview_keyword(&entry.raw_input),
                        preview
                    );
                }
                println!("\nTotal: {} entr{}", entries.len(), plural_y(entries.len()));
            }
        }
        Ok(())
    }
}

/// Show the entry for a date, with the neighbouring dates
#[derive(Args)]
pub struct ShowCommand {
    /// Date (YYYY-MM-DD), defaults to the most recent entry
    pub date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub async fn run(&self, store: &DiaryStore) -> Result<(), Box<dyn std::error::Error>> {
        let history = History::new(store.get_entries().await);

        let date = match &self.date {
            Some(d) => parse_date(d)?,
            None => match history.latest() {
                Some(date) => date,
                None => {
                    println!("No diary entries found");
                    return Ok(());
                }
            },
        };

        let entry = history
            .entry(date)
            .ok_or_else(|| format!("No entry for {}", date))?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(entry)?);
            }
            OutputFormat::Text => {
                println!("{}", entry);
                let previous = history
                    .previous(date)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let next = history
                    .next(date)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("Previous: {}    Next: {}", previous, next);
            }
        }
        Ok(())
    }
}

/// Replace the content of an entry
#[derive(Args)]
pub struct EditCommand {
    /// Entry ID
    pub id: i64,

    /// New content
    pub content: String,
}

impl EditCommand {
    pub async fn run(&self, store: &DiaryStore) -> Result<(), Box<dyn std::error::Error>> {
        if store.update_entry(self.id, &self.content).await? {
            println!("Updated entry {}", self.id);
        } else {
            println!("No entry with ID {}; nothing changed", self.id);
        }
        Ok(())
    }
}

/// Delete an entry
#[derive(Args)]
pub struct DeleteCommand {
    /// Entry ID
    pub id: i64,
}

impl DeleteCommand {
    pub async fn run(&self, store: &DiaryStore) -> Result<(), Box<dyn std::error::Error>> {
        if store.delete_entry(self.id).await? {
            println!("Deleted entry {}", self.id);
        } else {
            println!("No entry with ID {}; nothing deleted", self.id);
        }
        Ok(())
    }
}

fn preview(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() > max_chars {
        let truncated: String = first_line.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}

fn preview_keyword(raw_input: &str) -> String {
    preview(raw_input, 16)
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}
