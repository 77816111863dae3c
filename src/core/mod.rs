pub mod calculator;
pub mod clock;
pub mod log;
pub mod policy;
pub mod register;
pub mod report;
pub mod rollover;
pub mod settle;
pub mod top_up;
