use crate::cli::parser::DeptAction;
use crate::config::Config;
use crate::core::dashboard::DashboardLogic;
use crate::core::org::OrgLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, success};
use crate::utils::date::timestamp_or_now;
use crate::utils::formatting::format_hours;

pub fn handle(action: &DeptAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;

    match action {
        DeptAction::Add { name, color } => {
            let dept = OrgLogic::create_department(&pool.conn, name, color.as_deref())?;
            success(format!(
                "Department {} ({}) created with id {}",
                dept.name, dept.color, dept.id
            ));
        }
        DeptAction::Show { id, now } => {
            let tz = cfg.offset()?;
            let now = timestamp_or_now(now.as_deref(), tz)?;
            let stats = DashboardLogic::department_stats(&pool.conn, *id, now, tz)?;

            header(format!("Department {}", stats.name));
            println!("Team size        : {}", stats.team_size);
            println!("Projects         : {}", stats.projects_count);
            println!("Active projects  : {}", stats.active_projects_count);
            println!("Progress         : {}%", stats.progress);
            println!(
                "Hours this month : {}",
                format_hours(stats.monthly_hours, cfg.hours_decimals)
            );
        }
        DeptAction::Del { id } => {
            OrgLogic::delete_department(&pool.conn, *id)?;
            success(format!("Department {} deleted", id));
        }
    }

    Ok(())
}
