use super::work_status::WorkStatus;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// One user's bookkeeping for one Monday-anchored week.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkRecord {
    pub id: i64,                                // ⇔ work_records.id (0 = not stored yet)
    pub user_id: String,                        // ⇔ work_records.user_id
    pub week_start: NaiveDate,                  // ⇔ work_records.week_start (TEXT "YYYY-MM-DD")
    pub total_work_time: i64,                   // minutes
    pub remaining_time: i64,                    // minutes, derived from total_work_time
    pub work_status: WorkStatus,                // ⇔ work_records.work_status ('in' | 'out')
    pub last_clock_in: Option<DateTime<Local>>, // only while clocked in
    pub last_increase: i64,                     // minutes added by the latest clock-out
    pub undo_pending: bool,                     // latest clock-out can still be undone
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl WorkRecord {
    /// Fresh, clocked-out record with nothing worked yet.
    /// `version = 0` and `id = 0` mark it as not yet persisted.
    pub fn new(user_id: &str, week_start: NaiveDate, weekly_target: i64) -> Self {
        let now = Local::now().to_rfc3339();
        Self {
            id: 0,
            user_id: user_id.to_string(),
            week_start,
            total_work_time: 0,
            remaining_time: weekly_target,
            work_status: WorkStatus::ClockedOut,
            last_clock_in: None,
            last_increase: 0,
            undo_pending: false,
            version: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn recompute_remaining(&mut self, weekly_target: i64) {
        self.remaining_time = remaining_minutes(self.total_work_time, weekly_target);
    }

    pub fn week_str(&self) -> String {
        self.week_start.format("%Y-%m-%d").to_string()
    }

    /// "user@week" label used in messages and the audit log.
    pub fn key(&self) -> String {
        format!("{}@{}", self.user_id, self.week_str())
    }
}

pub fn remaining_minutes(total_work_time: i64, weekly_target: i64) -> i64 {
    (weekly_target - total_work_time).max(0)
}
