use crate::cli::parser::UserAction;
use crate::config::Config;
use crate::core::org::OrgLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::pad_right;

pub fn handle(action: &UserAction, cfg: &Config) -> AppResult<()> {
    let pool = super::open_pool(cfg)?;

    match action {
        UserAction::Add { name, dept } => {
            let user = OrgLogic::create_user(&pool.conn, name, *dept)?;
            success(format!("User {} created with id {}", user.name, user.id));
        }
        UserAction::List => {
            let users = OrgLogic::list_users(&pool.conn)?;
            if users.is_empty() {
                info("No users yet.");
                return Ok(());
            }
            println!("{} {} DEPT", pad_right("ID", 5), pad_right("NAME", 24));
            for u in users {
                let dept = u.department_id.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
                println!("{} {} {}", pad_right(&u.id.to_string(), 5), pad_right(&u.name, 24), dept);
            }
        }
    }

    Ok(())
}
