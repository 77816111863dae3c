//! Weekly rollover: closes the previous week, settles its shortfalls against
//! the hour bank / penalty account and seeds the new week.
//!
//! The three steps run strictly in order. Inside each step every user is
//! processed on its own: a failure is logged, collected in the report and the
//! loop moves on to the next user.
//!
//! Re-running the job for the same week is safe:
//! - force-close only touches records still clocked in;
//! - assessment is committed together with a per-(user, week) marker, so a
//!   week is charged at most once;
//! - seeding checks for an existing record before inserting.

use crate::core::calculator::penalty::assess;
use crate::core::log::audit_or_warn;
use crate::core::policy::WorkPolicy;
use crate::errors::{AppError, AppResult};
use crate::models::assessment::PenaltyAssessment;
use crate::models::penalty_record::PenaltyPatch;
use crate::models::work_record::WorkRecord;
use crate::models::work_status::WorkStatus;
use crate::store::RecordStore;
use crate::ui::messages::{error, info};
use crate::utils::date::{format_date, previous_week, week_start_at};
use crate::utils::format_amount;
use crate::utils::time::minutes_between;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RolloverStep {
    ForceClose,
    Assess,
    Seed,
}

impl fmt::Display for RolloverStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RolloverStep::ForceClose => "force-close",
            RolloverStep::Assess => "assess",
            RolloverStep::Seed => "seed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserFailure {
    pub user_id: String,
    pub step: RolloverStep,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RolloverReport {
    pub previous_week: NaiveDate,
    pub current_week: NaiveDate,
    /// Users auto-clocked-out at rollover time.
    pub force_closed: Vec<String>,
    /// Assessments committed by this run.
    pub assessed: Vec<PenaltyAssessment>,
    /// Users whose previous week had been assessed by an earlier run.
    pub already_assessed: Vec<String>,
    pub seeded: Vec<String>,
    pub already_seeded: Vec<String>,
    pub failures: Vec<UserFailure>,
}

impl RolloverReport {
    fn new(previous_week: NaiveDate, current_week: NaiveDate) -> Self {
        Self {
            previous_week,
            current_week,
            force_closed: Vec::new(),
            assessed: Vec::new(),
            already_assessed: Vec::new(),
            seeded: Vec::new(),
            already_seeded: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_penalty(&self) -> i64 {
        self.assessed.iter().map(|a| a.penalty).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, store: &dyn RecordStore, user_id: &str, step: RolloverStep, err: &AppError) {
        let message = err.to_string();
        error(format!("Rollover {} failed for '{}': {}", step, user_id, message));
        audit_or_warn(store, "rollover_error", user_id, &format!("{}: {}", step, message));
        self.failures.push(UserFailure {
            user_id: user_id.to_string(),
            step,
            message,
        });
    }
}

pub struct RolloverLogic;

impl RolloverLogic {
    /// Roll over into the week containing `now`.
    ///
    /// Per-user failures end up in `RolloverReport::failures`; only failures
    /// that prevent a whole step from running (listing records or users) are
    /// returned as `Err`. Every step already completed stays valid and a new
    /// run picks up where this one stopped.
    pub fn run(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        now: DateTime<Local>,
    ) -> AppResult<RolloverReport> {
        let current_week = week_start_at(&now);
        let prev_week = previous_week(current_week);
        let mut report = RolloverReport::new(prev_week, current_week);

        info(format!(
            "Weekly rollover: closing week {} → opening week {}",
            format_date(&prev_week),
            format_date(&current_week)
        ));

        // 1) force-close stragglers
        let unclosed = Self::force_close(store, policy, prev_week, now, &mut report)?;

        // 2) penalty assessment
        Self::assess_week(store, policy, prev_week, &unclosed, now, &mut report)?;

        // 3) new-week seeding
        Self::seed_week(store, policy, current_week, &mut report)?;

        audit_or_warn(
            store,
            "rollover",
            &format_date(&prev_week),
            &format!(
                "closed {}, assessed {} (penalties {}), seeded {}, failures {}",
                report.force_closed.len(),
                report.assessed.len(),
                report.total_penalty(),
                report.seeded.len(),
                report.failures.len()
            ),
        );

        Ok(report)
    }

    /// Returns the users whose record could not be closed; they must not be
    /// assessed in this run.
    fn force_close(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        week: NaiveDate,
        now: DateTime<Local>,
        report: &mut RolloverReport,
    ) -> AppResult<HashSet<String>> {
        let open = store.list_work_records(week, Some(WorkStatus::ClockedIn))?;
        let mut unclosed = HashSet::new();

        for rec in open {
            let user_id = rec.user_id.clone();
            match Self::force_close_one(store, policy, rec, now) {
                Ok(closed) => {
                    audit_or_warn(
                        store,
                        "rollover_close",
                        &closed.key(),
                        &format!("Auto clock-out, total {} min", closed.total_work_time),
                    );
                    report.force_closed.push(user_id);
                }
                Err(e) => {
                    report.fail(store, &user_id, RolloverStep::ForceClose, &e);
                    unclosed.insert(user_id);
                }
            }
        }

        Ok(unclosed)
    }

    fn force_close_one(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        mut rec: WorkRecord,
        now: DateTime<Local>,
    ) -> AppResult<WorkRecord> {
        let last_in = rec
            .last_clock_in
            .ok_or_else(|| AppError::NoActiveClockIn(rec.key()))?;

        // a clock-in stamped after `now` contributes nothing
        let duration = minutes_between(&last_in, &now).max(0);

        rec.total_work_time += duration;
        rec.recompute_remaining(policy.weekly_target_minutes);
        rec.work_status = WorkStatus::ClockedOut;
        rec.last_clock_in = None;
        rec.last_increase = 0;
        rec.undo_pending = false;

        store.upsert_work_record(&rec)
    }

    fn assess_week(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        week: NaiveDate,
        unclosed: &HashSet<String>,
        now: DateTime<Local>,
        report: &mut RolloverReport,
    ) -> AppResult<()> {
        let records = store.list_work_records(week, None)?;

        for rec in records {
            if unclosed.contains(&rec.user_id) {
                continue;
            }

            match Self::assess_one(store, policy, &rec, now) {
                Ok(Some(a)) => {
                    if a.penalty > 0 || a.hours_used > 0 {
                        audit_or_warn(
                            store,
                            "rollover_penalty",
                            &rec.key(),
                            &format!(
                                "shortfall {} min, {}h from bank ({} → {}), penalty {}",
                                a.shortfall,
                                a.hours_used,
                                a.bank_before,
                                a.bank_after,
                                format_amount(a.penalty)
                            ),
                        );
                    }
                    report.assessed.push(a);
                }
                Ok(None) => report.already_assessed.push(rec.user_id.clone()),
                Err(e) => report.fail(store, &rec.user_id, RolloverStep::Assess, &e),
            }
        }

        Ok(())
    }

    /// `Ok(None)` when the week had already been assessed for this user.
    fn assess_one(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        rec: &WorkRecord,
        now: DateTime<Local>,
    ) -> AppResult<Option<PenaltyAssessment>> {
        if store.is_assessed(&rec.user_id, rec.week_start)? {
            return Ok(None);
        }

        if rec.work_status.is_in() {
            return Err(AppError::Other(format!(
                "{} is still clocked in, week not closed",
                rec.key()
            )));
        }

        let account = store
            .get_penalty_record(&rec.user_id)?
            .ok_or_else(|| AppError::NotFound(format!("penalty record for '{}'", rec.user_id)))?;

        let outcome = assess(rec.total_work_time, account.additional_hours, policy);

        let assessment = PenaltyAssessment {
            user_id: rec.user_id.clone(),
            week_start: rec.week_start,
            total_work_time: rec.total_work_time,
            shortfall: outcome.shortfall,
            hours_used: outcome.hours_used,
            penalty: outcome.penalty,
            bank_before: account.additional_hours,
            bank_after: outcome.bank_after,
            assessed_at: now.to_rfc3339(),
        };

        // target met: marker only, account untouched
        let patch = (outcome.shortfall > 0).then(|| PenaltyPatch {
            accumulated_penalty: Some(account.accumulated_penalty + outcome.penalty),
            additional_hours: Some(outcome.bank_after),
            expected_version: Some(account.version),
        });

        if !store.commit_assessment(&assessment, patch.as_ref())? {
            return Ok(None);
        }

        Ok(Some(assessment))
    }

    fn seed_week(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        week: NaiveDate,
        report: &mut RolloverReport,
    ) -> AppResult<()> {
        let users = store.list_all_user_ids()?;

        for user_id in users {
            match Self::seed_one(store, policy, &user_id, week) {
                Ok(true) => report.seeded.push(user_id),
                Ok(false) => report.already_seeded.push(user_id),
                Err(e) => report.fail(store, &user_id, RolloverStep::Seed, &e),
            }
        }

        Ok(())
    }

    /// `Ok(false)` when the user already has a record for `week`.
    fn seed_one(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        user_id: &str,
        week: NaiveDate,
    ) -> AppResult<bool> {
        if store.get_work_record(user_id, week)?.is_some() {
            return Ok(false);
        }

        let fresh = WorkRecord::new(user_id, week, policy.weekly_target_minutes);
        match store.upsert_work_record(&fresh) {
            Ok(_) => Ok(true),
            // inserted between the check and the insert (e.g. an early clock-in)
            Err(AppError::ConcurrentModification(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
