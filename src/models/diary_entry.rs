use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single diary record as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    /// The keyword or prompt the user typed.
    pub raw_input: String,
    /// Generated prose, absent until the generation call has returned.
    pub content: Option<String>,
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl fmt::Display for DiaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = self.date.to_string();
        writeln!(f, "{}", heading)?;
        writeln!(f, "{}", "=".repeat(heading.len()))?;
        writeln!(f, "ID:      {}", self.id)?;
        writeln!(f, "Keyword: {}", self.raw_input)?;

        match &self.content {
            Some(content) => writeln!(f, "\n{}", content)?,
            None => writeln!(f, "\n(no content yet)")?,
        }

        Ok(())
    }
}

/// An entry as returned by the remote diary list endpoint.
///
/// Only the fields needed to recreate the entry locally are read; anything
/// else the server sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub date: NaiveDate,
    pub raw_input: String,
    #[serde(default)]
    pub content: Option<String>,
}
