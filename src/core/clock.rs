//! Time accounting: clock in, clock out, status and admin corrections.
//!
//! Invariants: a user has at most one session with `clock_out = NULL`, and
//! no two sessions of a user share time (an open session runs to infinity).
//! Every mutation runs inside an IMMEDIATE transaction (the write lock is
//! held from the open-session check to the commit), under the per-user lock
//! below, and the partial unique index `idx_sessions_one_open` rejects a
//! second open row from any other writer.

use crate::db::log::audit;
use crate::db::queries::{org, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::time_session::{ClockStatus, TimeSession};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, ErrorCode, TransactionBehavior};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

/// Registry of per-user mutexes. Different users never wait on each other.
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `user_id`.
    pub fn with_user<T, F>(&self, user_id: i64, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let entry = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(user_id).or_default())
        };

        let result = {
            let _guard = entry.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };

        // Clones are only taken and released under the map lock, so a count
        // of 1 means nobody else holds or waits on this entry.
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        drop(entry);
        if map
            .get(&user_id)
            .is_some_and(|e| Arc::strong_count(e) == 1)
        {
            map.remove(&user_id);
        }

        result
    }

    /// Number of users currently tracked.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static USER_LOCKS: LazyLock<UserLocks> = LazyLock::new(UserLocks::new);

/// Storage precision for instants.
fn normalize(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Reject `session` if it shares time with any other session of its user.
fn ensure_no_overlap(conn: &Connection, session: &TimeSession) -> AppResult<()> {
    let exclude = (session.id != 0).then_some(session.id);
    let other = sessions::find_overlapping_session(
        conn,
        session.user_id,
        exclude,
        &session.clock_in,
        session.clock_out.as_ref(),
    )?;

    match other {
        Some(other) => Err(AppError::OverlappingSession {
            session_id: other.id,
            clock_in: session.clock_in.to_rfc3339(),
            clock_out: session
                .clock_out
                .map(|o| o.to_rfc3339())
                .unwrap_or_else(|| "open".into()),
        }),
        None => Ok(()),
    }
}

pub struct ClockLogic;

impl ClockLogic {
    /// Open a new session for `user_id` at `at`.
    pub fn clock_in(conn: &mut Connection, user_id: i64, at: DateTime<Utc>) -> AppResult<TimeSession> {
        let at = normalize(at);

        USER_LOCKS.with_user(user_id, || {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !org::user_exists(&tx, user_id)? {
                return Err(AppError::not_found("user", user_id));
            }
            if sessions::find_open_session(&tx, user_id)?.is_some() {
                return Err(AppError::AlreadyClockedIn(user_id));
            }

            // an open session must not start before an earlier clock-out
            let mut session = TimeSession::open(user_id, at);
            ensure_no_overlap(&tx, &session)?;
            session.id = sessions::insert_session(&tx, &session).map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::AlreadyClockedIn(user_id)
                } else {
                    AppError::Storage(e)
                }
            })?;

            audit(
                &tx,
                "clock_in",
                &format!("user {}", user_id),
                &format!("session {} opened at {}", session.id, at.to_rfc3339()),
            )?;

            tx.commit()?;
            Ok(session)
        })
    }

    /// Close the user's open session at `at`.
    ///
    /// Clock-out and hours are written by one UPDATE inside the transaction;
    /// on any error nothing is written.
    pub fn clock_out(conn: &mut Connection, user_id: i64, at: DateTime<Utc>) -> AppResult<TimeSession> {
        let at = normalize(at);

        USER_LOCKS.with_user(user_id, || {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session = sessions::find_open_session(&tx, user_id)?
                .ok_or(AppError::NotClockedIn(user_id))?;

            session.close(at)?;
            ensure_no_overlap(&tx, &session)?;
            sessions::update_session(&tx, &session)?;

            audit(
                &tx,
                "clock_out",
                &format!("user {}", user_id),
                &format!(
                    "session {} closed at {} ({:.2} h)",
                    session.id,
                    at.to_rfc3339(),
                    session.hours_worked
                ),
            )?;

            tx.commit()?;
            Ok(session)
        })
    }

    /// Read-only: is the user clocked in, and since when.
    pub fn current_status(conn: &Connection, user_id: i64) -> AppResult<ClockStatus> {
        let open = sessions::find_open_session(conn, user_id)?;
        Ok(ClockStatus::from_open_session(open.as_ref()))
    }

    /// Admin correction of either boundary; hours are re-derived.
    pub fn correct_session(
        conn: &mut Connection,
        session_id: i64,
        clock_in: Option<DateTime<Utc>>,
        clock_out: Option<DateTime<Utc>>,
    ) -> AppResult<TimeSession> {
        if clock_in.is_none() && clock_out.is_none() {
            return Err(AppError::InvalidInput(
                "Nothing to do: specify at least --in or --out.".into(),
            ));
        }

        let user_id = sessions::load_session(conn, session_id)?
            .ok_or_else(|| AppError::not_found("session", session_id))?
            .user_id;

        USER_LOCKS.with_user(user_id, || {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut session = sessions::load_session(&tx, session_id)?
                .ok_or_else(|| AppError::not_found("session", session_id))?;
            let before = session.clone();

            session.correct(clock_in.map(normalize), clock_out.map(normalize))?;
            ensure_no_overlap(&tx, &session)?;
            sessions::update_session(&tx, &session)?;

            audit(
                &tx,
                "clock_fix",
                &format!("session {}", session.id),
                &format!(
                    "{} → {} ({:.2} h → {:.2} h)",
                    describe_interval(&before),
                    describe_interval(&session),
                    before.hours_worked,
                    session.hours_worked
                ),
            )?;

            tx.commit()?;
            Ok(session)
        })
    }

    pub fn list_sessions(conn: &Connection, user_id: i64, limit: usize) -> AppResult<Vec<TimeSession>> {
        if !org::user_exists(conn, user_id)? {
            return Err(AppError::not_found("user", user_id));
        }
        Ok(sessions::list_sessions(conn, user_id, limit)?)
    }
}

fn describe_interval(s: &TimeSession) -> String {
    match s.clock_out {
        Some(out) => format!("{}..{}", s.clock_in.to_rfc3339(), out.to_rfc3339()),
        None => format!("{}..", s.clock_in.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn user_locks_serialize_same_user() {
        let locks = Arc::new(UserLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    locks.with_user(7, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn user_locks_do_not_block_other_users() {
        let locks = UserLocks::new();
        let nested = locks.with_user(1, || locks.with_user(2, || 42));
        assert_eq!(nested, 42);
        assert!(locks.is_empty());
    }
}
