pub mod clock;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod dept;
pub mod init;
pub mod log;
pub mod project;
pub mod task;
pub mod user;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database with every migration applied.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
