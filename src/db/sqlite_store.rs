//! `RecordStore` backed by a single SQLite connection.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::assessment::PenaltyAssessment;
use crate::models::penalty_record::{PenaltyPatch, PenaltyRecord};
use crate::models::user::User;
use crate::models::work_record::WorkRecord;
use crate::models::work_status::WorkStatus;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str, busy_timeout_ms: u64) -> AppResult<Self> {
        let pool = DbPool::with_busy_timeout(path, busy_timeout_ms)?;
        Self::from_pool(pool)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::open_in_memory()?)
    }

    pub fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }
}

impl RecordStore for SqliteStore {
    fn get_work_record(
        &self,
        user_id: &str,
        week_start: NaiveDate,
    ) -> AppResult<Option<WorkRecord>> {
        queries::load_work_record(&self.pool.conn, user_id, &week_start)
    }

    fn upsert_work_record(&mut self, record: &WorkRecord) -> AppResult<WorkRecord> {
        let id = if record.is_new() {
            queries::insert_work_record(&self.pool.conn, record)?
        } else {
            queries::update_work_record(&self.pool.conn, record)?;
            record.id
        };

        queries::load_work_record_by_id(&self.pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("work record {}", record.key())))
    }

    fn list_work_records(
        &self,
        week_start: NaiveDate,
        status: Option<WorkStatus>,
    ) -> AppResult<Vec<WorkRecord>> {
        queries::load_work_records_by_week(&self.pool.conn, &week_start, status)
    }

    fn get_penalty_record(&self, user_id: &str) -> AppResult<Option<PenaltyRecord>> {
        queries::load_penalty_record(&self.pool.conn, user_id)
    }

    fn update_penalty_record(
        &mut self,
        user_id: &str,
        patch: &PenaltyPatch,
    ) -> AppResult<PenaltyRecord> {
        queries::patch_penalty_record(&self.pool.conn, user_id, patch)
    }

    fn list_all_user_ids(&self) -> AppResult<Vec<String>> {
        queries::load_user_ids(&self.pool.conn)
    }

    fn user_exists(&self, user_id: &str) -> AppResult<bool> {
        queries::user_exists(&self.pool.conn, user_id)
    }

    fn register_user(
        &mut self,
        user: &User,
        penalty: &PenaltyRecord,
        first_week: &WorkRecord,
    ) -> AppResult<()> {
        let tx = self.pool.conn.transaction()?;

        queries::insert_user(&tx, user)?;
        queries::insert_penalty_record(&tx, penalty)?;
        queries::insert_work_record(&tx, first_week)?;

        tx.commit()?;
        Ok(())
    }

    fn list_penalty_records(&self) -> AppResult<Vec<PenaltyRecord>> {
        queries::load_penalty_records(&self.pool.conn)
    }

    fn add_hours_to_all(&mut self, hours: i64) -> AppResult<usize> {
        queries::add_hours_to_all(&self.pool.conn, hours)
    }

    fn is_assessed(&self, user_id: &str, week_start: NaiveDate) -> AppResult<bool> {
        queries::assessment_exists(&self.pool.conn, user_id, &week_start)
    }

    fn commit_assessment(
        &mut self,
        assessment: &PenaltyAssessment,
        patch: Option<&PenaltyPatch>,
    ) -> AppResult<bool> {
        let tx = self.pool.conn.transaction()?;

        // Dropping `tx` without commit rolls back.
        if !queries::insert_assessment(&tx, assessment)? {
            return Ok(false);
        }

        if let Some(p) = patch.filter(|p| !p.is_empty()) {
            queries::patch_penalty_record(&tx, &assessment.user_id, p)?;
        }

        tx.commit()?;
        Ok(true)
    }

    fn list_assessments(&self, user_id: &str) -> AppResult<Vec<PenaltyAssessment>> {
        queries::load_assessments(&self.pool.conn, user_id)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.pool.conn, operation, target, message).map(|_| ())
    }
}
