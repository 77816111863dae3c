use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    ClockedIn,
    ClockedOut,
}

impl WorkStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            WorkStatus::ClockedIn => "in",
            WorkStatus::ClockedOut => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(WorkStatus::ClockedIn),
            "out" => Some(WorkStatus::ClockedOut),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::ClockedIn => "clocked in",
            WorkStatus::ClockedOut => "clocked out",
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, WorkStatus::ClockedIn)
    }
}
