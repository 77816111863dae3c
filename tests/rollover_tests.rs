use chrono::NaiveDate;
use rweeklog::core::calculator::penalty::{assess, penalty_tier};
use rweeklog::core::clock::ClockLogic;
use rweeklog::core::policy::WorkPolicy;
use rweeklog::core::rollover::{RolloverLogic, RolloverStep};
use rweeklog::db::sqlite_store::SqliteStore;
use rweeklog::errors::{AppError, AppResult};
use rweeklog::models::assessment::PenaltyAssessment;
use rweeklog::models::penalty_record::{PenaltyPatch, PenaltyRecord};
use rweeklog::models::user::User;
use rweeklog::models::work_record::WorkRecord;
use rweeklog::models::work_status::WorkStatus;
use rweeklog::store::RecordStore;
use std::collections::HashSet;

mod common;
use common::{day, store_with_users, ts, week1};

/// Work `minutes` for `user` during week1 in a single interval.
fn work(store: &mut SqliteStore, user: &str, minutes: i64) {
    let policy = WorkPolicy::default();
    let start = ts("2025-09-02 06:00");
    ClockLogic::clock_in(store, &policy, user, week1(), start).unwrap();
    ClockLogic::clock_out(
        store,
        &policy,
        user,
        week1(),
        start + chrono::Duration::minutes(minutes),
    )
    .unwrap();
}

fn account(store: &SqliteStore, user: &str) -> PenaltyRecord {
    store.get_penalty_record(user).unwrap().unwrap()
}

/// Store wrapper that fails selected operations for selected users.
struct FlakyStore {
    inner: SqliteStore,
    broken_upserts: HashSet<String>,
    broken_assessments: HashSet<String>,
}

impl FlakyStore {
    fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            broken_upserts: HashSet::new(),
            broken_assessments: HashSet::new(),
        }
    }

    fn into_inner(self) -> SqliteStore {
        self.inner
    }
}

impl RecordStore for FlakyStore {
    fn get_work_record(&self, user_id: &str, week: NaiveDate) -> AppResult<Option<WorkRecord>> {
        self.inner.get_work_record(user_id, week)
    }

    fn upsert_work_record(&mut self, record: &WorkRecord) -> AppResult<WorkRecord> {
        if self.broken_upserts.contains(&record.user_id) {
            return Err(AppError::Other("simulated write failure".into()));
        }
        self.inner.upsert_work_record(record)
    }

    fn list_work_records(
        &self,
        week: NaiveDate,
        status: Option<WorkStatus>,
    ) -> AppResult<Vec<WorkRecord>> {
        self.inner.list_work_records(week, status)
    }

    fn get_penalty_record(&self, user_id: &str) -> AppResult<Option<PenaltyRecord>> {
        self.inner.get_penalty_record(user_id)
    }

    fn update_penalty_record(
        &mut self,
        user_id: &str,
        patch: &PenaltyPatch,
    ) -> AppResult<PenaltyRecord> {
        self.inner.update_penalty_record(user_id, patch)
    }

    fn list_all_user_ids(&self) -> AppResult<Vec<String>> {
        self.inner.list_all_user_ids()
    }

    fn user_exists(&self, user_id: &str) -> AppResult<bool> {
        self.inner.user_exists(user_id)
    }

    fn register_user(
        &mut self,
        user: &User,
        penalty: &PenaltyRecord,
        first_week: &WorkRecord,
    ) -> AppResult<()> {
        self.inner.register_user(user, penalty, first_week)
    }

    fn list_penalty_records(&self) -> AppResult<Vec<PenaltyRecord>> {
        self.inner.list_penalty_records()
    }

    fn add_hours_to_all(&mut self, hours: i64) -> AppResult<usize> {
        self.inner.add_hours_to_all(hours)
    }

    fn is_assessed(&self, user_id: &str, week: NaiveDate) -> AppResult<bool> {
        self.inner.is_assessed(user_id, week)
    }

    fn commit_assessment(
        &mut self,
        assessment: &PenaltyAssessment,
        patch: Option<&PenaltyPatch>,
    ) -> AppResult<bool> {
        if self.broken_assessments.contains(&assessment.user_id) {
            return Err(AppError::Other("simulated commit failure".into()));
        }
        self.inner.commit_assessment(assessment, patch)
    }

    fn list_assessments(&self, user_id: &str) -> AppResult<Vec<PenaltyAssessment>> {
        self.inner.list_assessments(user_id)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.inner.audit(operation, target, message)
    }
}

#[test]
fn test_penalty_tiers() {
    let p = WorkPolicy::default();

    assert_eq!(assess(1200, 0, &p).penalty, 0);
    assert_eq!(assess(1300, 0, &p).shortfall, 0);
    assert_eq!(assess(1100, 0, &p).penalty, 5_000);
    assert_eq!(assess(500, 0, &p).penalty, 10_000);
    assert_eq!(assess(0, 0, &p).penalty, 10_000);

    assert_eq!(penalty_tier(599, &p), 10_000);
    assert_eq!(penalty_tier(600, &p), 5_000);
    assert_eq!(penalty_tier(1199, &p), 5_000);
    assert_eq!(penalty_tier(1200, &p), 0);
}

#[test]
fn test_bank_covers_shortfall_rounded_up() {
    let p = WorkPolicy::default();

    let out = assess(1140, 5, &p);
    assert_eq!(out.shortfall, 60);
    assert_eq!(out.hours_used, 1);
    assert_eq!(out.penalty, 0);
    assert_eq!(out.bank_after, 4);

    // 61 minutes short needs two hours
    let out = assess(1139, 5, &p);
    assert_eq!(out.hours_used, 2);
    assert_eq!(out.bank_after, 3);
}

#[test]
fn test_insufficient_bank_is_spent_before_tiering() {
    let p = WorkPolicy::default();

    // 400 + 4h = 640 → high tier
    let out = assess(400, 4, &p);
    assert_eq!(out.hours_used, 4);
    assert_eq!(out.bank_after, 0);
    assert_eq!(out.penalty, 5_000);

    // 300 + 4h = 540 → low tier
    let out = assess(300, 4, &p);
    assert_eq!(out.bank_after, 0);
    assert_eq!(out.penalty, 10_000);
}

#[test]
fn test_rollover_assesses_and_seeds() {
    let mut store = store_with_users(&["alice", "bob", "carol"]);
    work(&mut store, "alice", 1200);
    work(&mut store, "bob", 1140);
    work(&mut store, "carol", 300);

    let report =
        RolloverLogic::run(&mut store, &WorkPolicy::default(), ts("2025-09-08 00:10")).unwrap();

    assert_eq!(report.previous_week, week1());
    assert_eq!(report.current_week, day("2025-09-08"));
    assert!(report.is_complete());
    assert_eq!(report.assessed.len(), 3);
    assert_eq!(report.seeded.len(), 3);

    let alice = account(&store, "alice");
    assert_eq!((alice.accumulated_penalty, alice.additional_hours), (0, 10));

    let bob = account(&store, "bob");
    assert_eq!((bob.accumulated_penalty, bob.additional_hours), (0, 9));

    // 300 + 10h = 900 → high tier
    let carol = account(&store, "carol");
    assert_eq!((carol.accumulated_penalty, carol.additional_hours), (5_000, 0));
    assert_eq!(report.total_penalty(), 5_000);

    for u in ["alice", "bob", "carol"] {
        let rec = store.get_work_record(u, day("2025-09-08")).unwrap().unwrap();
        assert_eq!(rec.total_work_time, 0);
        assert_eq!(rec.remaining_time, 1200);
        assert_eq!(rec.work_status, WorkStatus::ClockedOut);
    }
}

#[test]
fn test_rollover_force_closes_open_records() {
    let mut store = store_with_users(&["alice"]);
    let policy = WorkPolicy::default();

    ClockLogic::clock_in(&mut store, &policy, "alice", week1(), ts("2025-09-07 22:10")).unwrap();

    let report = RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:10")).unwrap();
    assert_eq!(report.force_closed, vec!["alice".to_string()]);

    let rec = store.get_work_record("alice", week1()).unwrap().unwrap();
    assert_eq!(rec.work_status, WorkStatus::ClockedOut);
    assert_eq!(rec.total_work_time, 120);
    assert_eq!(rec.last_increase, 0);
    assert!(rec.last_clock_in.is_none());

    // 120 + 10h = 720 → high tier
    assert_eq!(account(&store, "alice").accumulated_penalty, 5_000);
}

#[test]
fn test_rollover_twice_charges_once() {
    let mut store = store_with_users(&["alice"]);
    work(&mut store, "alice", 100);
    let policy = WorkPolicy::default();

    RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:10")).unwrap();
    // 100 + 10h = 700 → high tier
    let first = account(&store, "alice");
    assert_eq!(first.accumulated_penalty, 5_000);
    assert_eq!(first.additional_hours, 0);

    let report = RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:20")).unwrap();
    assert!(report.assessed.is_empty());
    assert_eq!(report.already_assessed, vec!["alice".to_string()]);
    assert!(report.seeded.is_empty());
    assert_eq!(report.already_seeded, vec!["alice".to_string()]);

    let second = account(&store, "alice");
    assert_eq!(second.accumulated_penalty, first.accumulated_penalty);
    assert_eq!(second.additional_hours, first.additional_hours);
    assert_eq!(store.list_assessments("alice").unwrap().len(), 1);
}

#[test]
fn test_seeding_keeps_existing_record() {
    let mut store = store_with_users(&["alice"]);
    let policy = WorkPolicy::default();
    let week2 = day("2025-09-08");

    // early clock-in in the new week, before the rollover job runs
    ClockLogic::clock_in(&mut store, &policy, "alice", week2, ts("2025-09-08 00:01")).unwrap();

    let report = RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:10")).unwrap();
    assert_eq!(report.already_seeded, vec!["alice".to_string()]);

    let rec = store.get_work_record("alice", week2).unwrap().unwrap();
    assert_eq!(rec.work_status, WorkStatus::ClockedIn);
}

#[test]
fn test_rollover_isolates_failing_user_and_resumes() {
    let mut store = store_with_users(&["alice", "bob"]);
    work(&mut store, "alice", 100);
    work(&mut store, "bob", 100);
    let policy = WorkPolicy::default();

    let mut flaky = FlakyStore::new(store);
    flaky.broken_assessments.insert("bob".into());

    let report = RolloverLogic::run(&mut flaky, &policy, ts("2025-09-08 00:10")).unwrap();
    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].user_id, "bob");
    assert_eq!(report.failures[0].step, RolloverStep::Assess);
    assert_eq!(report.assessed.len(), 1);
    assert_eq!(report.seeded.len(), 2);

    let mut store = flaky.into_inner();
    assert_eq!(account(&store, "alice").accumulated_penalty, 5_000);
    assert_eq!(account(&store, "bob").accumulated_penalty, 0);
    assert_eq!(account(&store, "bob").additional_hours, 10);

    let report = RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:20")).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.assessed.len(), 1);
    assert_eq!(report.assessed[0].user_id, "bob");
    assert_eq!(account(&store, "alice").accumulated_penalty, 5_000);
    assert_eq!(account(&store, "bob").accumulated_penalty, 5_000);
}

#[test]
fn test_unclosed_user_is_not_assessed() {
    let mut store = store_with_users(&["alice", "bob"]);
    let policy = WorkPolicy::default();
    ClockLogic::clock_in(&mut store, &policy, "bob", week1(), ts("2025-09-07 20:00")).unwrap();

    let mut flaky = FlakyStore::new(store);
    flaky.broken_upserts.insert("bob".into());

    let report = RolloverLogic::run(&mut flaky, &policy, ts("2025-09-08 00:10")).unwrap();

    let steps: Vec<RolloverStep> = report.failures.iter().map(|f| f.step).collect();
    assert_eq!(steps, vec![RolloverStep::ForceClose, RolloverStep::Seed]);
    assert!(report.assessed.iter().all(|a| a.user_id != "bob"));
    assert!(!flaky.is_assessed("bob", week1()).unwrap());
    assert!(flaky.is_assessed("alice", week1()).unwrap());
}

#[test]
fn test_assessment_history_is_most_recent_first() {
    let mut store = store_with_users(&["alice"]);
    let policy = WorkPolicy::default();

    RolloverLogic::run(&mut store, &policy, ts("2025-09-08 00:10")).unwrap();
    RolloverLogic::run(&mut store, &policy, ts("2025-09-15 00:10")).unwrap();

    let history =
        rweeklog::core::report::ReportLogic::assessment_history(&store, "alice").unwrap();
    let weeks: Vec<NaiveDate> = history.iter().map(|a| a.week_start).collect();
    assert_eq!(weeks, vec![day("2025-09-08"), week1()]);

    // zero hours both weeks: 0 + 10h = 600 → high tier, then empty bank → low tier
    assert_eq!(history[1].penalty, 5_000);
    assert_eq!(history[0].penalty, 10_000);
    assert_eq!(account(&store, "alice").accumulated_penalty, 15_000);
}
