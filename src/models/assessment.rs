use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of the weekly penalty assessment for one (user, week).
///
/// Stored once per pair; its presence marks the week as processed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PenaltyAssessment {
    pub user_id: String,
    pub week_start: NaiveDate,
    pub total_work_time: i64,
    pub shortfall: i64,
    pub hours_used: i64,
    pub penalty: i64,
    pub bank_before: i64,
    pub bank_after: i64,
    pub assessed_at: String,
}
