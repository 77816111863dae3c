/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Penalty color:
/// \>0 → red
/// 0 → reset
pub fn color_for_penalty(value: i64) -> &'static str {
    if value > 0 { RED } else { RESET }
}

/// Remaining-time color: green once the weekly target is met.
pub fn color_for_remaining(remaining: i64) -> &'static str {
    if remaining == 0 { GREEN } else { YELLOW }
}

/// Returns GREY for "--" placeholders, the value untouched otherwise.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
