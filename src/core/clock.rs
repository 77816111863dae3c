use crate::config::ClockInPolicy;
use crate::core::log::audit_or_warn;
use crate::core::policy::WorkPolicy;
use crate::errors::{AppError, AppResult};
use crate::models::work_record::WorkRecord;
use crate::models::work_status::WorkStatus;
use crate::store::RecordStore;
use crate::utils::date::{format_date, week_start_at};
use crate::utils::time::{format_timestamp, minutes_between};
use chrono::{DateTime, Local, NaiveDate};

/// A week the rollover has assessed is frozen.
fn ensure_open_week(
    store: &dyn RecordStore,
    user_id: &str,
    week_start: NaiveDate,
) -> AppResult<()> {
    if store.is_assessed(user_id, week_start)? {
        return Err(AppError::WeekClosed(format!(
            "{}@{}",
            user_id,
            format_date(&week_start)
        )));
    }
    Ok(())
}

/// Clock-in / clock-out / undo on a user's weekly record.
pub struct ClockLogic;

impl ClockLogic {
    /// Start a work interval at `ts`, creating the week's record if needed.
    pub fn clock_in(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        user_id: &str,
        week_start: NaiveDate,
        ts: DateTime<Local>,
    ) -> AppResult<WorkRecord> {
        if !store.user_exists(user_id)? {
            return Err(AppError::NotFound(format!("user '{}'", user_id)));
        }

        // new intervals only open in the week the clock-in falls in or later
        if week_start < week_start_at(&ts) {
            return Err(AppError::WeekClosed(format!(
                "{}@{}",
                user_id,
                format_date(&week_start)
            )));
        }
        ensure_open_week(store, user_id, week_start)?;

        let mut rec = store
            .get_work_record(user_id, week_start)?
            .unwrap_or_else(|| WorkRecord::new(user_id, week_start, policy.weekly_target_minutes));

        if rec.work_status.is_in() && policy.clock_in_policy == ClockInPolicy::Reject {
            let since = rec
                .last_clock_in
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "--".into());
            return Err(AppError::AlreadyClockedIn(user_id.to_string(), since));
        }

        rec.work_status = WorkStatus::ClockedIn;
        rec.last_clock_in = Some(ts);

        let saved = store.upsert_work_record(&rec)?;

        audit_or_warn(
            store,
            "clock_in",
            &saved.key(),
            &format!("Clocked in at {}", format_timestamp(&ts)),
        );

        Ok(saved)
    }

    /// Close the open interval at `ts` and add its whole minutes to the week.
    pub fn clock_out(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        user_id: &str,
        week_start: NaiveDate,
        ts: DateTime<Local>,
    ) -> AppResult<WorkRecord> {
        ensure_open_week(store, user_id, week_start)?;

        let mut rec = store
            .get_work_record(user_id, week_start)?
            .filter(|r| r.work_status.is_in())
            .ok_or_else(|| AppError::NoActiveClockIn(format!("{}@{}", user_id, week_start)))?;

        let last_in = rec
            .last_clock_in
            .ok_or_else(|| AppError::NoActiveClockIn(rec.key()))?;

        if ts <= last_in {
            return Err(AppError::InvalidTimeOrder(format_timestamp(&last_in)));
        }

        let duration = minutes_between(&last_in, &ts);

        rec.total_work_time += duration;
        rec.recompute_remaining(policy.weekly_target_minutes);
        rec.work_status = WorkStatus::ClockedOut;
        rec.last_clock_in = None;
        rec.last_increase = duration;
        rec.undo_pending = true;

        let saved = store.upsert_work_record(&rec)?;

        audit_or_warn(
            store,
            "clock_out",
            &saved.key(),
            &format!(
                "Clocked out at {} (+{} min, total {} min)",
                format_timestamp(&ts),
                duration,
                saved.total_work_time
            ),
        );

        Ok(saved)
    }

    /// Revert the most recent clock-out of the week.
    pub fn undo_last_clock_out(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        user_id: &str,
        week_start: NaiveDate,
    ) -> AppResult<WorkRecord> {
        ensure_open_week(store, user_id, week_start)?;

        let mut rec = store
            .get_work_record(user_id, week_start)?
            .ok_or_else(|| AppError::NotFound(format!("work record {}@{}", user_id, week_start)))?;

        if rec.work_status.is_in() {
            return Err(AppError::CannotUndoWhileClockedIn(rec.key()));
        }

        // a sub-minute clock-out adds 0 minutes but is still undoable
        if !rec.undo_pending {
            return Err(AppError::NothingToUndo(rec.key()));
        }

        let reverted = rec.total_work_time - rec.last_increase;
        if reverted < 0 {
            return Err(AppError::NegativeWorkTime(rec.key(), reverted));
        }

        let undone = rec.last_increase;
        rec.total_work_time = reverted;
        rec.recompute_remaining(policy.weekly_target_minutes);
        rec.last_increase = 0;
        rec.undo_pending = false;

        let saved = store.upsert_work_record(&rec)?;

        audit_or_warn(
            store,
            "undo",
            &saved.key(),
            &format!(
                "Reverted last clock-out (-{} min, total {} min)",
                undone, saved.total_work_time
            ),
        );

        Ok(saved)
    }
}
