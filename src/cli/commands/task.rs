use crate::cli::parser::TaskAction;
use crate::config::Config;
use crate::core::calculator::progress::task_progress;
use crate::core::tasks::TaskLogic;
use crate::errors::AppResult;
use crate::models::task::Task;
use crate::models::task_status::TaskStatus;
use crate::ui::messages::{header, success};
use crate::utils::date::parse_date;
use crate::utils::formatting::format_hours;

pub fn handle(action: &TaskAction, cfg: &Config) -> AppResult<()> {
    let mut pool = super::open_pool(cfg)?;
    let decimals = cfg.hours_decimals;

    match action {
        TaskAction::Add {
            title,
            user,
            date,
            project,
            estimate,
            hours,
            subtasks,
        } => {
            let mut task = Task::new(*user, title, parse_date(date)?);
            task.project_id = *project;
            task.estimated_hours = *estimate;
            task.hours_worked = *hours;

            let task = pool.with_conn(|conn| TaskLogic::create(conn, task, subtasks))?;
            success(format!(
                "Task {} created with id {} ({} subtasks)",
                task.title,
                task.id,
                task.subtasks.len()
            ));
        }
        TaskAction::Status { id, status } => {
            let task = TaskLogic::set_status(&pool.conn, *id, TaskStatus::parse(status)?)?;
            success(format!("Task {} is now {}", task.id, task.status.to_db_str()));
        }
        TaskAction::Hours { id, hours } => {
            let task = TaskLogic::set_hours(&pool.conn, *id, *hours)?;
            success(format!(
                "Task {} hours set to {}",
                task.id,
                format_hours(task.hours_worked, decimals)
            ));
        }
        TaskAction::Subtask { id, title } => {
            let task = TaskLogic::add_subtask(&pool.conn, *id, title)?;
            success(format!("Subtask added to task {} ({} total)", task.id, task.subtasks.len()));
        }
        TaskAction::Done { subtask_id, undo } => {
            let task = TaskLogic::set_subtask_completed(&pool.conn, *subtask_id, !*undo)?;
            success(format!(
                "Subtask {} {}; task {} at {:.0}%",
                subtask_id,
                if *undo { "reopened" } else { "completed" },
                task.id,
                task_progress(&task)
            ));
        }
        TaskAction::Show { id } => {
            let report = TaskLogic::report(&pool.conn, *id)?;
            let t = &report.task;

            header(format!("Task {}", t.title));
            println!("Date      : {}", t.task_date);
            println!("Status    : {}", t.status.to_db_str());
            if let Some(pid) = t.project_id {
                println!("Project   : {}", pid);
            }
            println!("Worked    : {}", format_hours(t.hours_worked, decimals));
            println!("Remaining : {}", format_hours(report.remaining_hours, decimals));
            println!("Progress  : {:.2}%", report.progress);
            for s in &t.subtasks {
                println!("  [{}] {:>4} {}", if s.is_completed { "x" } else { " " }, s.id, s.title);
            }
        }
        TaskAction::Del { id } => {
            TaskLogic::delete(&pool.conn, *id)?;
            success(format!("Task {} deleted", id));
        }
    }

    Ok(())
}
