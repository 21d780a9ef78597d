use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtaskclock::core::clock::ClockLogic;
use rtaskclock::db::queries::sessions::{count_open_sessions, list_sessions};
use rtaskclock::errors::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

mod common;
use common::{memory_db_with_users, open_db, setup_test_db};

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 7, h, m, 0).unwrap()
}

#[test]
fn clock_in_then_out_computes_fractional_hours() {
    let mut pool = memory_db_with_users(1);

    let opened = ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();
    assert!(opened.is_open());
    assert!(ClockLogic::current_status(&pool.conn, 1).unwrap().is_clocked_in);

    let closed = ClockLogic::clock_out(&mut pool.conn, 1, t(10, 30)).unwrap();
    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.hours_worked, 1.5);

    let status = ClockLogic::current_status(&pool.conn, 1).unwrap();
    assert!(!status.is_clocked_in);
    assert_eq!(status.clock_in_time, None);
}

#[test]
fn second_clock_in_is_rejected() {
    let mut pool = memory_db_with_users(1);
    ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();

    let err = ClockLogic::clock_in(&mut pool.conn, 1, t(9, 5)).unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn(1)));
    assert_eq!(count_open_sessions(&pool.conn, 1).unwrap(), 1);
}

#[test]
fn clock_out_without_open_session_is_rejected() {
    let mut pool = memory_db_with_users(1);

    let err = ClockLogic::clock_out(&mut pool.conn, 1, t(9, 0)).unwrap_err();
    assert!(matches!(err, AppError::NotClockedIn(1)));

    // also after a completed session
    ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();
    ClockLogic::clock_out(&mut pool.conn, 1, t(12, 0)).unwrap();
    let err = ClockLogic::clock_out(&mut pool.conn, 1, t(13, 0)).unwrap_err();
    assert!(matches!(err, AppError::NotClockedIn(1)));
}

#[test]
fn invalid_interval_leaves_session_open() {
    let mut pool = memory_db_with_users(1);
    ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();

    for bad in [t(9, 0), t(8, 0)] {
        let err = ClockLogic::clock_out(&mut pool.conn, 1, bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidInterval { .. }));
    }

    let sessions = list_sessions(&pool.conn, 1, 10).unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_open());
    assert_eq!(sessions[0].hours_worked, 0.0);
}

#[test]
fn unknown_user_cannot_clock_in() {
    let mut pool = memory_db_with_users(1);
    let err = ClockLogic::clock_in(&mut pool.conn, 42, t(9, 0)).unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "user", id: 42 }));
}

#[test]
fn correction_rederives_hours() {
    let mut pool = memory_db_with_users(1);
    ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();
    let s = ClockLogic::clock_out(&mut pool.conn, 1, t(17, 0)).unwrap();
    assert_eq!(s.hours_worked, 8.0);

    let fixed = ClockLogic::correct_session(&mut pool.conn, s.id, Some(t(8, 30)), None).unwrap();
    assert_eq!(fixed.hours_worked, 8.5);

    let fixed = ClockLogic::correct_session(&mut pool.conn, s.id, None, Some(t(12, 15))).unwrap();
    assert_eq!(fixed.hours_worked, 3.75);

    let stored = &list_sessions(&pool.conn, 1, 1).unwrap()[0];
    assert_eq!(stored.hours_worked, 3.75);

    let err = ClockLogic::correct_session(&mut pool.conn, s.id, Some(t(13, 0)), None).unwrap_err();
    assert!(matches!(err, AppError::InvalidInterval { .. }));
    assert_eq!(list_sessions(&pool.conn, 1, 1).unwrap()[0].hours_worked, 3.75);

    let err = ClockLogic::correct_session(&mut pool.conn, 999, Some(t(8, 0)), None).unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: "session", .. }));
}

#[test]
fn correcting_an_open_session_closes_it_when_out_is_given() {
    let mut pool = memory_db_with_users(1);
    let open = ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();

    let moved = ClockLogic::correct_session(&mut pool.conn, open.id, Some(t(8, 0)), None).unwrap();
    assert!(moved.is_open());
    assert_eq!(moved.hours_worked, 0.0);

    let closed = ClockLogic::correct_session(&mut pool.conn, open.id, None, Some(t(10, 0))).unwrap();
    assert!(!closed.is_open());
    assert_eq!(closed.hours_worked, 2.0);
    assert!(!ClockLogic::current_status(&pool.conn, 1).unwrap().is_clocked_in);
}

#[test]
fn backdated_clock_in_inside_a_closed_session_is_rejected() {
    let mut pool = memory_db_with_users(1);
    let first = ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();
    ClockLogic::clock_out(&mut pool.conn, 1, t(17, 0)).unwrap();

    let err = ClockLogic::clock_in(&mut pool.conn, 1, t(10, 0)).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { session_id, .. } if session_id == first.id));
    assert_eq!(count_open_sessions(&pool.conn, 1).unwrap(), 0);

    // a clock-in before every stored session would also run across them
    let err = ClockLogic::clock_in(&mut pool.conn, 1, t(8, 0)).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { .. }));

    // touching the previous clock-out is fine
    ClockLogic::clock_in(&mut pool.conn, 1, t(17, 0)).unwrap();
    let s = ClockLogic::clock_out(&mut pool.conn, 1, t(18, 0)).unwrap();
    assert_eq!(s.hours_worked, 1.0);

    let total: f64 = list_sessions(&pool.conn, 1, 10).unwrap().iter().map(|s| s.hours_worked).sum();
    assert_eq!(total, 9.0);
}

#[test]
fn correction_cannot_make_sessions_overlap() {
    let mut pool = memory_db_with_users(1);
    let morning = ClockLogic::clock_in(&mut pool.conn, 1, t(9, 0)).unwrap();
    ClockLogic::clock_out(&mut pool.conn, 1, t(12, 0)).unwrap();
    let afternoon = ClockLogic::clock_in(&mut pool.conn, 1, t(13, 0)).unwrap();
    ClockLogic::clock_out(&mut pool.conn, 1, t(17, 0)).unwrap();

    let err = ClockLogic::correct_session(&mut pool.conn, morning.id, None, Some(t(14, 0))).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { session_id, .. } if session_id == afternoon.id));

    let err = ClockLogic::correct_session(&mut pool.conn, afternoon.id, Some(t(11, 0)), None).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { session_id, .. } if session_id == morning.id));

    // nothing was written
    let stored = list_sessions(&pool.conn, 1, 10).unwrap();
    assert_eq!(stored[0].hours_worked, 4.0);
    assert_eq!(stored[1].hours_worked, 3.0);

    // up to the boundary is accepted
    let fixed = ClockLogic::correct_session(&mut pool.conn, morning.id, None, Some(t(13, 0))).unwrap();
    assert_eq!(fixed.hours_worked, 4.0);

    // an open session reaches past any later closed one
    let open = ClockLogic::clock_in(&mut pool.conn, 1, t(18, 0)).unwrap();
    let err = ClockLogic::correct_session(&mut pool.conn, open.id, Some(t(16, 0)), None).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { session_id, .. } if session_id == afternoon.id));
    let err = ClockLogic::correct_session(&mut pool.conn, afternoon.id, None, Some(t(19, 0))).unwrap_err();
    assert!(matches!(err, AppError::OverlappingSession { session_id, .. } if session_id == open.id));
}

/// Randomized clock-in/out sequences, some backdated, against a simple model
/// of who is open and when each user last clocked out.
#[test]
fn randomized_sequences_keep_one_open_session_per_user() {
    let mut rng = StdRng::seed_from_u64(0x5eed_c10c);
    let users = 4;
    let mut pool = memory_db_with_users(users);

    let mut open_since: HashMap<i64, DateTime<Utc>> = HashMap::new();
    let mut last_out: HashMap<i64, DateTime<Utc>> = HashMap::new();
    let mut now = t(6, 0);

    for _ in 0..400 {
        now += Duration::minutes(rng.random_range(1..=90));
        let user = rng.random_range(1..=users as i64);

        if rng.random_bool(0.5) {
            let at = if rng.random_bool(0.3) {
                now - Duration::minutes(rng.random_range(1..=600))
            } else {
                now
            };
            let res = ClockLogic::clock_in(&mut pool.conn, user, at);
            if open_since.contains_key(&user) {
                assert!(matches!(res, Err(AppError::AlreadyClockedIn(u)) if u == user));
            } else if last_out.get(&user).is_some_and(|out| *out > at) {
                assert!(matches!(res, Err(AppError::OverlappingSession { .. })));
            } else {
                res.unwrap();
                open_since.insert(user, at);
            }
        } else {
            let res = ClockLogic::clock_out(&mut pool.conn, user, now);
            match open_since.remove(&user) {
                Some(start) => {
                    let s = res.unwrap();
                    let expected = (now - start).num_milliseconds() as f64 / 3_600_000.0;
                    assert!((s.hours_worked - expected).abs() < 1e-9);
                    last_out.insert(user, now);
                }
                None => assert!(matches!(res, Err(AppError::NotClockedIn(u)) if u == user)),
            }
        }

        for u in 1..=users as i64 {
            let open = count_open_sessions(&pool.conn, u).unwrap();
            assert!(open <= 1);
            assert_eq!(open == 1, open_since.contains_key(&u));
        }
    }

    for u in 1..=users as i64 {
        let mut sessions = list_sessions(&pool.conn, u, 1_000).unwrap();
        sessions.reverse();
        for pair in sessions.windows(2) {
            let end = pair[0].clock_out.expect("only the latest session may be open");
            assert!(end <= pair[1].clock_in, "sessions {} and {} overlap", pair[0].id, pair[1].id);
        }
    }
}

#[test]
fn concurrent_clock_ins_for_one_user_yield_one_session() {
    let db_path = setup_test_db("concurrent_clock_in");
    let pool = open_db(&db_path);
    rtaskclock::db::queries::org::insert_user(&pool.conn, "ann", None).unwrap();
    drop(pool);

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let db_path = db_path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut pool = rtaskclock::db::pool::DbPool::new(&db_path).unwrap();
                barrier.wait();
                ClockLogic::clock_in(&mut pool.conn, 1, t(9, i as u32))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::AlreadyClockedIn(1))))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(rejected, threads - 1);

    let pool = open_db(&db_path);
    assert_eq!(count_open_sessions(&pool.conn, 1).unwrap(), 1);
}

#[test]
fn different_users_clock_in_in_parallel() {
    let db_path = setup_test_db("parallel_users_clock_in");
    let pool = open_db(&db_path);
    for name in ["ann", "bob", "cid", "dee"] {
        rtaskclock::db::queries::org::insert_user(&pool.conn, name, None).unwrap();
    }
    drop(pool);

    let handles: Vec<_> = (1..=4i64)
        .map(|user| {
            let db_path = db_path.clone();
            thread::spawn(move || {
                let mut pool = rtaskclock::db::pool::DbPool::new(&db_path).unwrap();
                ClockLogic::clock_in(&mut pool.conn, user, t(9, 0))
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap().unwrap();
    }

    let pool = open_db(&db_path);
    for user in 1..=4 {
        assert_eq!(count_open_sessions(&pool.conn, user).unwrap(), 1);
    }
}

#[test]
fn storage_rejects_a_second_open_session_directly() {
    let pool = memory_db_with_users(1);
    pool.conn
        .execute(
            "INSERT INTO time_sessions (user_id, clock_in) VALUES (1, '2025-04-07T09:00:00.000Z')",
            [],
        )
        .unwrap();
    let second = pool.conn.execute(
        "INSERT INTO time_sessions (user_id, clock_in) VALUES (1, '2025-04-07T10:00:00.000Z')",
        [],
    );
    assert!(second.is_err());
}
