mod ask;
mod config_cmd;
mod entries;
mod sync_cmd;
mod write;

pub use ask::AskCommand;
pub use config_cmd::ConfigCommand;
pub use entries::{DeleteCommand, EditCommand, ListCommand, ShowCommand};
pub use sync_cmd::SyncCommand;
pub use write::WriteCommand;

use chrono::NaiveDate;
use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        let err = parse_date("05/03/2024").unwrap_err();
        assert!(err.contains("Use YYYY-MM-DD"));
    }
}
