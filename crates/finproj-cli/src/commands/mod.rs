pub mod consolidation;
pub mod projection;
pub mod schedules;
