//! Record-store seam between the business logic in `core` and persistence.
//!
//! `core` only talks to `dyn RecordStore`; `db::sqlite_store::SqliteStore`
//! is the production implementation.

use crate::errors::AppResult;
use crate::models::assessment::PenaltyAssessment;
use crate::models::penalty_record::{PenaltyPatch, PenaltyRecord};
use crate::models::user::User;
use crate::models::work_record::WorkRecord;
use crate::models::work_status::WorkStatus;
use chrono::NaiveDate;

pub trait RecordStore {
    fn get_work_record(&self, user_id: &str, week_start: NaiveDate)
    -> AppResult<Option<WorkRecord>>;

    /// Insert `record` when it is new, otherwise update it if the stored
    /// version still equals `record.version`. Returns the stored row.
    ///
    /// Errors with `ConcurrentModification` on a version mismatch or when a
    /// record for the same (user, week) was inserted meanwhile.
    fn upsert_work_record(&mut self, record: &WorkRecord) -> AppResult<WorkRecord>;

    fn list_work_records(
        &self,
        week_start: NaiveDate,
        status: Option<WorkStatus>,
    ) -> AppResult<Vec<WorkRecord>>;

    fn get_penalty_record(&self, user_id: &str) -> AppResult<Option<PenaltyRecord>>;

    /// Errors with `NotFound` when the user has no penalty record and with
    /// `ConcurrentModification` when `patch.expected_version` is stale.
    fn update_penalty_record(
        &mut self,
        user_id: &str,
        patch: &PenaltyPatch,
    ) -> AppResult<PenaltyRecord>;

    fn list_all_user_ids(&self) -> AppResult<Vec<String>>;

    fn user_exists(&self, user_id: &str) -> AppResult<bool>;

    /// Store the user, its penalty account and first work record together.
    fn register_user(
        &mut self,
        user: &User,
        penalty: &PenaltyRecord,
        first_week: &WorkRecord,
    ) -> AppResult<()>;

    fn list_penalty_records(&self) -> AppResult<Vec<PenaltyRecord>>;

    /// Add `hours` to every bank. Returns the number of accounts touched.
    fn add_hours_to_all(&mut self, hours: i64) -> AppResult<usize>;

    fn is_assessed(&self, user_id: &str, week_start: NaiveDate) -> AppResult<bool>;

    /// Record `assessment` and apply `patch` atomically.
    ///
    /// Returns `Ok(false)` without touching anything when the week was
    /// already assessed for that user.
    fn commit_assessment(
        &mut self,
        assessment: &PenaltyAssessment,
        patch: Option<&PenaltyPatch>,
    ) -> AppResult<bool>;

    /// Assessments for `user_id`, most recent week first.
    fn list_assessments(&self, user_id: &str) -> AppResult<Vec<PenaltyAssessment>>;

    /// Append a row to the internal audit log.
    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;
}
