//! Dashboard summaries: employee time stats, admin week overview,
//! department statistics and the employee task list.
//!
//! The `build_*` / `time_stats` functions are pure; the `DashboardLogic`
//! methods load a snapshot from the store and hand it to them.

use crate::core::calculator::hours::sum_hours;
use crate::core::calculator::periods::{
    Period, elapsed_window, local_date, month_bounds, period_start_date, week_bounds,
};
use crate::core::calculator::progress::{department_progress, task_progress};
use crate::db::queries::{org, projects, sessions, tasks};
use crate::errors::{AppError, AppResult};
use crate::models::department::{Department, User};
use crate::models::project::Project;
use crate::models::stats::{DepartmentStats, TaskProgressRow, TimeStats, UserHours, WeekOverview};
use crate::models::task::Task;
use crate::models::time_session::TimeSession;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};

/// Hours booked on `tasks` for today, this week and this month as of `now`.
///
/// A task counts toward a window when its date lies between the window's
/// first day and today (both inclusive), in `tz`.
pub fn time_stats(tasks: &[Task], now: DateTime<Utc>, tz: FixedOffset) -> TimeStats {
    let hours_in = |period: Period| {
        let window = elapsed_window(period, now, tz);
        let (first, today) = (window.first_day(), window.last_day());
        sum_hours(
            tasks
                .iter()
                .filter(|t| t.task_date >= first && t.task_date <= today)
                .map(|t| t.hours_worked),
        )
    };

    TimeStats {
        today: hours_in(Period::Today),
        this_week: hours_in(Period::Week),
        this_month: hours_in(Period::Month),
    }
}

/// Admin overview of the Monday-Sunday week containing `date`.
pub fn build_week_overview(
    date: NaiveDate,
    week_tasks: &[Task],
    week_sessions: &[TimeSession],
    users: &[User],
    tz: FixedOffset,
) -> WeekOverview {
    let bounds = week_bounds(date, tz);
    let (first, last) = (bounds.first_day(), bounds.last_day());

    let in_week: Vec<&Task> = week_tasks
        .iter()
        .filter(|t| t.task_date >= first && t.task_date <= last)
        .collect();

    let active: BTreeSet<i64> = in_week.iter().map(|t| t.user_id).collect();

    let mut per_user: BTreeMap<i64, f64> = BTreeMap::new();
    for s in week_sessions.iter().filter(|s| bounds.contains(s.clock_in)) {
        // Open sessions have hours_worked = 0 until they are closed.
        *per_user.entry(s.user_id).or_insert(0.0) += s.hours_worked;
    }

    let names: BTreeMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();

    WeekOverview {
        week_start: first,
        week_end: last,
        total_task_hours: sum_hours(in_week.iter().map(|t| t.hours_worked)),
        total_tasks: in_week.len(),
        completed_tasks: in_week.iter().filter(|t| t.status.is_done()).count(),
        active_employees: active.len(),
        session_hours: per_user
            .into_iter()
            .map(|(user_id, hours)| UserHours {
                user_id,
                name: names.get(&user_id).map(|n| n.to_string()).unwrap_or_default(),
                hours,
            })
            .collect(),
    }
}

/// Department counters and progress, computed from the relations passed in.
pub fn build_department_stats(
    department: &Department,
    members: &[User],
    department_projects: &[Project],
    member_sessions: &[TimeSession],
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> DepartmentStats {
    let month = month_bounds(local_date(now, tz), tz);
    let member_ids: BTreeSet<i64> = members.iter().map(|u| u.id).collect();

    let monthly_hours = sum_hours(
        member_sessions
            .iter()
            .filter(|s| member_ids.contains(&s.user_id))
            .filter(|s| !s.is_open() && month.contains(s.clock_in))
            .map(|s| s.hours_worked),
    );

    DepartmentStats {
        department_id: department.id,
        name: department.name.clone(),
        team_size: members.len(),
        projects_count: department_projects.len(),
        active_projects_count: department_projects
            .iter()
            .filter(|p| p.status.is_active())
            .count(),
        progress: department_progress(department_projects),
        monthly_hours,
    }
}

pub struct DashboardLogic;

impl DashboardLogic {
    /// Employee dashboard: `{today, this_week, this_month}` for `user_id`.
    pub fn summarize(
        conn: &Connection,
        user_id: i64,
        now: DateTime<Utc>,
        tz: FixedOffset,
    ) -> AppResult<TimeStats> {
        if !org::user_exists(conn, user_id)? {
            return Err(AppError::not_found("user", user_id));
        }

        let today = local_date(now, tz);
        // The week can start in the previous month.
        let from = period_start_date(Period::Week, today).min(period_start_date(Period::Month, today));
        let user_tasks = tasks::tasks_for_user_between(conn, user_id, &from, &today)?;

        Ok(time_stats(&user_tasks, now, tz))
    }

    pub fn week_overview(conn: &Connection, date: NaiveDate, tz: FixedOffset) -> AppResult<WeekOverview> {
        let bounds = week_bounds(date, tz);

        let week_tasks = tasks::tasks_between(conn, &bounds.first_day(), &bounds.last_day())?;
        let week_sessions = sessions::sessions_between(
            conn,
            &bounds.start.with_timezone(&Utc),
            &bounds.end.with_timezone(&Utc),
        )?;
        let users = org::list_users(conn)?;

        Ok(build_week_overview(date, &week_tasks, &week_sessions, &users, tz))
    }

    pub fn department_stats(
        conn: &Connection,
        department_id: i64,
        now: DateTime<Utc>,
        tz: FixedOffset,
    ) -> AppResult<DepartmentStats> {
        let department = org::load_department(conn, department_id)?
            .ok_or_else(|| AppError::not_found("department", department_id))?;

        let members = org::users_in_department(conn, department_id)?;
        let department_projects = projects::projects_for_department(conn, department_id)?;

        let month = month_bounds(local_date(now, tz), tz);
        let month_sessions = sessions::sessions_between(
            conn,
            &month.start.with_timezone(&Utc),
            &month.end.with_timezone(&Utc),
        )?;

        Ok(build_department_stats(
            &department,
            &members,
            &department_projects,
            &month_sessions,
            now,
            tz,
        ))
    }

    /// The user's latest in-progress/done tasks with their progress.
    pub fn employee_tasks(conn: &Connection, user_id: i64, limit: usize) -> AppResult<Vec<TaskProgressRow>> {
        if !org::user_exists(conn, user_id)? {
            return Err(AppError::not_found("user", user_id));
        }

        let recent = tasks::recent_active_tasks(conn, user_id, limit)?;

        let mut project_names: BTreeMap<i64, String> = BTreeMap::new();
        let mut rows = Vec::with_capacity(recent.len());

        for t in &recent {
            let project = match t.project_id {
                Some(pid) => {
                    if !project_names.contains_key(&pid)
                        && let Some(p) = projects::load_project_header(conn, pid)?
                    {
                        project_names.insert(pid, p.name);
                    }
                    project_names.get(&pid).cloned()
                }
                None => None,
            };

            rows.push(TaskProgressRow {
                id: t.id,
                title: t.title.clone(),
                project,
                status: t.status,
                hours_worked: t.hours_worked,
                progress: task_progress(t),
            });
        }

        Ok(rows)
    }
}
