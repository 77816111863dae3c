pub mod assessment;
pub mod penalty_record;
pub mod user;
pub mod work_record;
pub mod work_status;
