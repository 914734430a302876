//! Browsing past entries date by date.

use chrono::NaiveDate;

use crate::models::DiaryEntry;

/// A snapshot of the diary ordered for date-by-date browsing.
pub struct History {
    entries: Vec<DiaryEntry>,
    dates: Vec<NaiveDate>,
}

impl History {
    pub fn new(mut entries: Vec<DiaryEntry>) -> Self {
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));

        let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        dates.dedup();

        Self { entries, dates }
    }

    /// Dates that have at least one entry, newest first.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// The entry shown for `date`; the lowest id if there are several.
    pub fn entry(&self, date: NaiveDate) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    /// The closest date before `date` that has an entry.
    pub fn previous(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.dates.iter().copied().find(|d| *d < date)
    }

    /// The closest date after `date` that has an entry.
    pub fn next(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.dates.iter().rev().copied().find(|d| *d > date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(id: i64, day: &str, raw_input: &str) -> DiaryEntry {
        let now = Utc::now();
        DiaryEntry {
            id,
            user_id: 1,
            date: date(day),
            raw_input: raw_input.to_string(),
            content: None,
            img_url: None,
            created_at: now,
            last_modified: now,
        }
    }

    fn sample() -> History {
        History::new(vec![
            entry(1, "2024-01-05", "middle"),
            entry(2, "2024-01-01", "oldest"),
            entry(3, "2024-01-09", "newest"),
        ])
    }

    #[test]
    fn test_dates_newest_first() {
        let history = sample();
        assert_eq!(
            history.dates(),
            &[date("2024-01-09"), date("2024-01-05"), date("2024-01-01")]
        );
        assert_eq!(history.latest(), Some(date("2024-01-09")));
    }

    #[test]
    fn test_previous_and_next() {
        let history = sample();

        assert_eq!(history.previous(date("2024-01-05")), Some(date("2024-01-01")));
        assert_eq!(history.next(date("2024-01-05")), Some(date("2024-01-09")));
        assert_eq!(history.previous(date("2024-01-01")), None);
        assert_eq!(history.next(date("2024-01-09")), None);
    }

    #[test]
    fn test_navigation_from_date_without_entry() {
        let history = sample();

        assert_eq!(history.previous(date("2024-01-07")), Some(date("2024-01-05")));
        assert_eq!(history.next(date("2024-01-07")), Some(date("2024-01-09")));
    }

    #[test]
    fn test_entry_picks_lowest_id_for_shared_date() {
        let history = History::new(vec![
            entry(8, "2024-02-01", "later"),
            entry(4, "2024-02-01", "earlier"),
        ]);

        assert_eq!(history.dates(), &[date("2024-02-01")]);
        assert_eq!(history.entry(date("2024-02-01")).unwrap().id, 4);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new(Vec::new());

        assert!(history.is_empty());
        assert_eq!(history.latest(), None);
        assert!(history.entry(date("2024-01-01")).is_none());
    }
}
