//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Clock / time accounting
    // ---------------------------
    #[error("User {0} is already clocked in")]
    AlreadyClockedIn(i64),

    #[error("User {0} is not clocked in")]
    NotClockedIn(i64),

    #[error("Invalid interval: clock-out {clock_out} is not after clock-in {clock_in}")]
    InvalidInterval { clock_in: String, clock_out: String },

    #[error("Interval {clock_in}..{clock_out} overlaps session {session_id}")]
    OverlappingSession {
        session_id: i64,
        clock_in: String,
        clock_out: String,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        AppError::NotFound { kind, id }
    }
}

pub type AppResult<T> = Result<T, AppError>;
