pub mod calculator;
pub mod clock;
pub mod dashboard;
pub mod log;
pub mod org;
pub mod tasks;
