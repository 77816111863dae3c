//! Read-only views: penalty board, weekly status, assessment history.

use crate::errors::{AppError, AppResult};
use crate::models::assessment::PenaltyAssessment;
use crate::models::penalty_record::PenaltyRecord;
use crate::models::work_record::WorkRecord;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub struct ReportLogic;

impl ReportLogic {
    /// Every user's penalty account, ordered by user id.
    pub fn penalty_board(store: &dyn RecordStore) -> AppResult<Vec<PenaltyRecord>> {
        store.list_penalty_records()
    }

    pub fn week_status(
        store: &dyn RecordStore,
        user_id: &str,
        week_start: NaiveDate,
    ) -> AppResult<WorkRecord> {
        store
            .get_work_record(user_id, week_start)?
            .ok_or_else(|| AppError::NotFound(format!("work record {}@{}", user_id, week_start)))
    }

    /// Past assessments of `user_id`, most recent week first.
    pub fn assessment_history(
        store: &dyn RecordStore,
        user_id: &str,
    ) -> AppResult<Vec<PenaltyAssessment>> {
        if !store.user_exists(user_id)? {
            return Err(AppError::NotFound(format!("user '{}'", user_id)));
        }
        store.list_assessments(user_id)
    }
}
