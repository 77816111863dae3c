use crate::core::log::audit_or_warn;
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;

pub struct TopUpLogic;

impl TopUpLogic {
    /// Add `hours` to every user's bank of additional hours.
    ///
    /// The bank is uncapped. Returns the number of accounts updated.
    pub fn apply(store: &mut dyn RecordStore, hours: i64) -> AppResult<usize> {
        if hours < 0 {
            return Err(AppError::InvalidHours(hours));
        }

        let updated = store.add_hours_to_all(hours)?;

        audit_or_warn(
            store,
            "top_up",
            "all",
            &format!("Added {}h to {} account(s)", hours, updated),
        );

        Ok(updated)
    }
}
