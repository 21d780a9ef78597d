pub mod department;
pub mod project;
pub mod stats;
pub mod task;
pub mod task_status;
pub mod time_session;
