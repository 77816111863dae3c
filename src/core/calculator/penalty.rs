//! Weekly shortfall → bank consumption / monetary penalty.

use crate::core::policy::WorkPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Minutes missing to reach the weekly target (0 when met).
    pub shortfall: i64,
    /// Whole hours taken from the bank.
    pub hours_used: i64,
    pub penalty: i64,
    pub bank_after: i64,
}

/// Assess one closed week.
///
/// The shortfall is rounded up to whole hours. If the bank covers those
/// hours they are consumed and no penalty applies; otherwise the whole bank
/// is spent and the penalty tier is picked from the minutes worked plus the
/// banked hours.
pub fn assess(total_work_time: i64, bank: i64, policy: &WorkPolicy) -> Outcome {
    let bank = bank.max(0);
    let shortfall = (policy.weekly_target_minutes - total_work_time).max(0);

    if shortfall == 0 {
        return Outcome {
            shortfall: 0,
            hours_used: 0,
            penalty: 0,
            bank_after: bank,
        };
    }

    let needed_hours = (shortfall + 59) / 60;

    if bank >= needed_hours {
        return Outcome {
            shortfall,
            hours_used: needed_hours,
            penalty: 0,
            bank_after: bank - needed_hours,
        };
    }

    let final_total = total_work_time + bank * 60;

    Outcome {
        shortfall,
        hours_used: bank,
        penalty: penalty_tier(final_total, policy),
        bank_after: 0,
    }
}

/// Penalty for a week that ends at `final_total_minutes` after the bank.
pub fn penalty_tier(final_total_minutes: i64, policy: &WorkPolicy) -> i64 {
    if final_total_minutes < policy.low_tier_threshold_minutes {
        policy.low_tier_penalty
    } else if final_total_minutes < policy.weekly_target_minutes {
        policy.high_tier_penalty
    } else {
        0
    }
}
