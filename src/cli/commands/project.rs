use crate::cli::parser::ProjectAction;
use crate::config::Config;
use crate::core::org::OrgLogic;
use crate::errors::AppResult;
use crate::models::project::ProjectStatus;
use crate::ui::messages::{header, success};
use crate::utils::formatting::format_hours;

pub fn handle(action: &ProjectAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;
    let decimals = cfg.hours_decimals;

    match action {
        ProjectAction::Add {
            name,
            dept,
            estimate,
            status,
        } => {
            let status = ProjectStatus::parse(status)?;
            let project = OrgLogic::create_project(&pool.conn, name, *dept, *estimate, status)?;
            success(format!("Project {} created with id {}", project.name, project.id));
        }
        ProjectAction::Show { id } => {
            let report = OrgLogic::project_report(&pool.conn, *id)?;

            header(format!("Project {}", report.name));
            println!("Status    : {}", report.status.to_db_str());
            println!("Tasks     : {}", report.tasks);
            println!("Progress  : {}%", report.progress);
            println!("Worked    : {}", format_hours(report.total_hours, decimals));
            match report.estimated_hours {
                Some(est) => println!("Estimated : {}", format_hours(est, decimals)),
                None => println!("Estimated : -"),
            }
            println!("Remaining : {}", format_hours(report.remaining_hours, decimals));
        }
        ProjectAction::Status { id, status } => {
            let status = ProjectStatus::parse(status)?;
            OrgLogic::set_project_status(&pool.conn, *id, status)?;
            success(format!("Project {} is now {}", id, status.to_db_str()));
        }
    }

    Ok(())
}
