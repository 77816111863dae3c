use crate::core::log::audit_or_warn;
use crate::errors::{AppError, AppResult};
use crate::models::penalty_record::{PenaltyPatch, PenaltyRecord};
use crate::models::user::{CurrentUser, validate_user_id};
use crate::store::RecordStore;
use crate::utils::format_amount;

pub struct SettleLogic;

impl SettleLogic {
    /// Zero the accumulated penalty of `user_id`. Self-service only.
    pub fn apply(
        store: &mut dyn RecordStore,
        user_id: &str,
        requester: &CurrentUser,
    ) -> AppResult<PenaltyRecord> {
        let target = validate_user_id(user_id)?;
        let user_id = target.as_str();

        if !requester.is(user_id) {
            return Err(AppError::Forbidden(format!(
                "'{}' cannot settle the penalties of '{}'",
                requester.user_id, user_id
            )));
        }

        let before = store
            .get_penalty_record(user_id)?
            .ok_or_else(|| AppError::NotFound(format!("penalty record for '{}'", user_id)))?;

        let after = store.update_penalty_record(user_id, &PenaltyPatch::settle())?;

        audit_or_warn(
            store,
            "settle",
            user_id,
            &format!("Settled {}", format_amount(before.accumulated_penalty)),
        );

        Ok(after)
    }
}
