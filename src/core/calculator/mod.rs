pub mod hours;
pub mod periods;
pub mod progress;
