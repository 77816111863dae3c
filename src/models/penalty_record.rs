use serde::Serialize;

/// Per-user penalty account. Created once at registration, never recreated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PenaltyRecord {
    pub id: i64,
    pub user_id: String,
    pub accumulated_penalty: i64,
    pub additional_hours: i64,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update for a penalty record. `None` fields are left as they are.
///
/// With `expected_version` set the update only applies if the stored row
/// still carries that version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyPatch {
    pub accumulated_penalty: Option<i64>,
    pub additional_hours: Option<i64>,
    pub expected_version: Option<i64>,
}

impl PenaltyPatch {
    pub fn settle() -> Self {
        Self {
            accumulated_penalty: Some(0),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated_penalty.is_none() && self.additional_hours.is_none()
    }
}
