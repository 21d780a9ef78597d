#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtaskclock::db::initialize::init_db;
use rtaskclock::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("rtaskclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtaskclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `init` a fresh database through the binary.
pub fn init_cli_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Open a migrated database file through the library.
pub fn open_db(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// In-memory database with `users` named user1..userN (ids 1..=N).
pub fn memory_db_with_users(n: usize) -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    for i in 1..=n {
        rtaskclock::db::queries::org::insert_user(&pool.conn, &format!("user{i}"), None)
            .expect("insert user");
    }
    pool
}
