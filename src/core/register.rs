use crate::core::log::audit_or_warn;
use crate::core::policy::WorkPolicy;
use crate::errors::AppResult;
use crate::models::penalty_record::PenaltyRecord;
use crate::models::user::{User, validate_user_id};
use crate::models::work_record::WorkRecord;
use crate::store::RecordStore;
use crate::utils::date::week_start_at;
use chrono::{DateTime, Local};

pub struct RegisterLogic;

impl RegisterLogic {
    /// Create a user with an empty penalty account and a record for the
    /// week containing `now`.
    pub fn apply(
        store: &mut dyn RecordStore,
        policy: &WorkPolicy,
        raw_user_id: &str,
        now: DateTime<Local>,
    ) -> AppResult<User> {
        let user_id = validate_user_id(raw_user_id)?;
        let created_at = now.to_rfc3339();

        let user = User {
            id: user_id.clone(),
            created_at: created_at.clone(),
        };

        let account = PenaltyRecord {
            id: 0,
            user_id: user_id.clone(),
            accumulated_penalty: 0,
            additional_hours: policy.initial_additional_hours,
            version: 0,
            created_at: created_at.clone(),
            updated_at: created_at,
        };

        let first_week =
            WorkRecord::new(&user_id, week_start_at(&now), policy.weekly_target_minutes);

        store.register_user(&user, &account, &first_week)?;

        audit_or_warn(
            store,
            "register",
            &user_id,
            &format!(
                "Registered with {}h bank, first week {}",
                policy.initial_additional_hours,
                first_week.week_str()
            ),
        );

        Ok(user)
    }
}
