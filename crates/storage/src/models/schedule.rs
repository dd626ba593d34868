use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One round on a season's calendar. Rows exist for future rounds too; the
/// pipeline only fetches results for rounds whose date has passed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleEntry {
    pub season: i64,
    pub round: i64,
    pub name: String,
    pub date: NaiveDate,
    pub country: Option<String>,
    pub is_sprint: bool,
    pub qualifying_date: Option<NaiveDate>,
    pub sprint_date: Option<NaiveDate>,
}

impl ScheduleEntry {
    /// Whether the round's main event has taken place as of `today`.
    pub fn is_completed(&self, today: NaiveDate) -> bool {
        self.date <= today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str) -> ScheduleEntry {
        ScheduleEntry {
            season: 2025,
            round: 1,
            name: "Australian Grand Prix".to_string(),
            date: date.parse().unwrap(),
            country: Some("Australia".to_string()),
            is_sprint: false,
            qualifying_date: None,
            sprint_date: None,
        }
    }

    #[test]
    fn completed_on_or_before_today() {
        let today: NaiveDate = "2025-03-20".parse().unwrap();
        assert!(entry("2025-03-16").is_completed(today));
        assert!(entry("2025-03-20").is_completed(today));
        assert!(!entry("2025-03-23").is_completed(today));
    }
}
