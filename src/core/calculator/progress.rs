//! Progress and hour roll-ups for tasks, projects and departments.
//!
//! Everything is recomputed from the child collections passed in. Empty
//! collections yield 0, never NaN.

use crate::core::calculator::hours::sum_hours;
use crate::models::project::Project;
use crate::models::task::Task;

/// Anything carrying an optional estimate and an actual hour count.
pub trait Estimated {
    fn estimated_hours(&self) -> Option<f64>;
    fn actual_hours(&self) -> f64;
}

impl Estimated for Task {
    fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    fn actual_hours(&self) -> f64 {
        self.hours_worked
    }
}

impl Estimated for Project {
    fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    fn actual_hours(&self) -> f64 {
        project_total_hours(self)
    }
}

/// Completed / total subtasks × 100, unrounded.
pub fn task_progress(task: &Task) -> f64 {
    let total = task.subtasks.len();
    if total == 0 {
        return 0.0;
    }
    task.completed_subtasks() as f64 / total as f64 * 100.0
}

/// Mean of the task progresses, rounded half-up.
pub fn project_progress(project: &Project) -> u8 {
    rounded_average(project.tasks.iter().map(task_progress))
}

pub fn project_total_hours(project: &Project) -> f64 {
    sum_hours(project.tasks.iter().map(|t| t.hours_worked))
}

/// Mean of the project progresses, rounded half-up.
pub fn department_progress(projects: &[Project]) -> u8 {
    rounded_average(projects.iter().map(|p| f64::from(project_progress(p))))
}

/// `max(0, estimate - actual)`; a missing estimate counts as 0.
pub fn remaining(estimated: Option<f64>, actual: f64) -> f64 {
    (estimated.unwrap_or(0.0) - actual).max(0.0)
}

pub fn remaining_hours<E: Estimated>(entity: &E) -> f64 {
    remaining(entity.estimated_hours(), entity.actual_hours())
}

/// Average of percentages in [0, 100], rounded half-up; 0 when empty.
fn rounded_average<I>(values: I) -> u8
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));

    if count == 0 {
        return 0;
    }

    // Inputs are non-negative, so round() (half away from zero) is half-up here.
    (sum / count as f64).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectStatus;
    use crate::models::task::Subtask;
    use chrono::NaiveDate;

    fn task_with(done: usize, total: usize, hours: f64) -> Task {
        let mut t = Task::new(1, "t", NaiveDate::from_ymd_opt(2025, 4, 7).unwrap());
        t.hours_worked = hours;
        t.subtasks = (0..total)
            .map(|i| Subtask {
                id: i as i64 + 1,
                task_id: 0,
                title: format!("s{}", i),
                is_completed: i < done,
            })
            .collect();
        t
    }

    fn project_with(tasks: Vec<Task>, estimate: Option<f64>) -> Project {
        Project {
            id: 1,
            department_id: 1,
            name: "p".into(),
            status: ProjectStatus::InProgress,
            estimated_hours: estimate,
            tasks,
        }
    }

    #[test]
    fn task_progress_is_completion_ratio() {
        assert_eq!(task_progress(&task_with(1, 4, 0.0)), 25.0);
        assert_eq!(task_progress(&task_with(0, 0, 0.0)), 0.0);
        assert_eq!(task_progress(&task_with(3, 3, 0.0)), 100.0);

        let third = task_progress(&task_with(1, 3, 0.0));
        assert!((third - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn project_progress_averages_and_rounds() {
        let p = project_with(
            vec![task_with(0, 2, 0.0), task_with(1, 2, 0.0), task_with(2, 2, 0.0)],
            None,
        );
        assert_eq!(project_progress(&p), 50);

        // [25, 100] → 62.5 → 63 (half-up)
        let half = project_with(vec![task_with(1, 4, 0.0), task_with(1, 1, 0.0)], None);
        assert_eq!(project_progress(&half), 63);

        assert_eq!(project_progress(&project_with(vec![], None)), 0);
    }

    #[test]
    fn totals_and_remaining_hours() {
        let p = project_with(vec![task_with(0, 0, 4.5), task_with(0, 0, 7.5)], Some(10.0));
        assert_eq!(project_total_hours(&p), 12.0);
        assert_eq!(remaining_hours(&p), 0.0);
        assert_eq!(remaining(Some(10.0), 12.0), 0.0);
        assert_eq!(remaining(Some(10.0), 4.0), 6.0);
        assert_eq!(remaining(None, 4.0), 0.0);

        let mut t = task_with(0, 0, 2.0);
        t.estimated_hours = Some(5.5);
        assert_eq!(remaining_hours(&t), 3.5);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let p = project_with(vec![task_with(1, 3, 1.1), task_with(2, 7, 2.2)], Some(3.0));
        assert_eq!(project_progress(&p), project_progress(&p));
        assert_eq!(project_total_hours(&p), project_total_hours(&p));
    }

    #[test]
    fn department_progress_averages_projects() {
        let a = project_with(vec![task_with(1, 1, 0.0)], None); // 100
        let b = project_with(vec![task_with(0, 1, 0.0)], None); // 0
        let c = project_with(vec![], None); // 0
        assert_eq!(department_progress(&[a, b, c]), 33);
        assert_eq!(department_progress(&[]), 0);
    }
}
