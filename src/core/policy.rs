use crate::config::{ClockInPolicy, Config};

/// Business rules shared by the time clock and the rollover engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPolicy {
    pub weekly_target_minutes: i64,
    pub initial_additional_hours: i64,
    pub low_tier_threshold_minutes: i64,
    pub low_tier_penalty: i64,
    pub high_tier_penalty: i64,
    pub clock_in_policy: ClockInPolicy,
}

impl Default for WorkPolicy {
    fn default() -> Self {
        Self {
            weekly_target_minutes: 1200,
            initial_additional_hours: 10,
            low_tier_threshold_minutes: 600,
            low_tier_penalty: 10_000,
            high_tier_penalty: 5_000,
            clock_in_policy: ClockInPolicy::Reject,
        }
    }
}

impl From<&Config> for WorkPolicy {
    fn from(cfg: &Config) -> Self {
        Self {
            weekly_target_minutes: cfg.weekly_target_minutes,
            initial_additional_hours: cfg.initial_additional_hours,
            low_tier_threshold_minutes: cfg.low_tier_threshold_minutes,
            low_tier_penalty: cfg.low_tier_penalty,
            high_tier_penalty: cfg.high_tier_penalty,
            clock_in_policy: cfg.clock_in_policy,
        }
    }
}
