//! End-to-end replay scenarios.
//!
//! Every scenario mutates process-global state, so they serialize on one
//! lock and reset the globals up front. The globals use relaxed atomics:
//! ordinary memory here would make the intentional main/shadow overlap
//! undefined behavior instead of merely detector-visible.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use shadowrace_core::{Finding, with_capture, wrap_fn, wrap_fn_r, wrap_recover};

static TEST_LOCK: Mutex<()> = Mutex::new(());

static FLAG: AtomicBool = AtomicBool::new(false);
static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn reset_globals() {
    FLAG.store(false, Ordering::Relaxed);
    COUNTER.store(0, Ordering::Relaxed);
}

#[test]
fn empty_function_produces_no_findings() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let ((), findings) = with_capture(|| wrap_fn(|| {}));
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
}

#[test]
fn consistent_panic_and_recover_produces_no_findings() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            let outcome = panic::catch_unwind(|| panic!("boom"));
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
        });
    });
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
}

#[test]
fn global_write_before_panic_replays_cleanly() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    // Setting the flag twice is idempotent; only a race detector would have
    // something to say about the replayed store.
    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            let outcome = panic::catch_unwind(|| {
                FLAG.store(true, Ordering::Relaxed);
                panic!("after flag");
            });
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
        });
    });
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    assert!(FLAG.load(Ordering::Relaxed));
}

#[test]
fn counter_in_the_payload_is_flagged_as_a_mismatch() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            let outcome = panic::catch_unwind(|| {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
                panic!("{n}");
            });
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
        });
    });
    assert_eq!(
        findings,
        vec![Finding::PayloadMismatch {
            main: "1".to_string(),
            shadow: "2".to_string()
        }]
    );
    assert_eq!(COUNTER.load(Ordering::Relaxed), 2);
}

#[test]
fn replay_that_does_not_panic_is_reported() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    // Panics only on the first execution; the replay sails through.
    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            let outcome = panic::catch_unwind(|| {
                if COUNTER.fetch_add(1, Ordering::Relaxed) == 0 {
                    panic!("first run only");
                }
            });
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
        });
    });
    assert_eq!(findings, vec![Finding::ShadowDidNotPanic]);
    assert_eq!(COUNTER.load(Ordering::Relaxed), 2);
}

#[test]
fn replay_that_does_not_recover_is_reported() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    // The panic flips the flag first, and the handler only recovers while
    // the flag is set. Main run: false -> true, recovered. Replay: true ->
    // false, the panic is rethrown and escapes the replayed closure.
    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            let outcome = panic::catch_unwind(|| {
                FLAG.fetch_xor(true, Ordering::Relaxed);
                panic!("flip");
            });
            if let Err(payload) = outcome {
                if FLAG.load(Ordering::Relaxed) {
                    let _ = wrap_recover(payload);
                } else {
                    panic::resume_unwind(payload);
                }
            }
        });
    });
    assert_eq!(findings, vec![Finding::ShadowDidNotRecover]);
}

#[test]
fn replay_recovering_twice_is_reported() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    // Two recover points with identical payload text. The first main-side
    // recover triggers a replay that forwards both of them.
    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            for _ in 0..2 {
                let outcome = panic::catch_unwind(|| panic!("again"));
                if let Err(payload) = outcome {
                    let _ = wrap_recover(payload);
                }
            }
        });
    });
    assert!(
        findings
            .iter()
            .any(|finding| matches!(finding, Finding::ShadowRecoveredMultiple(2))),
        "expected a multiple-recover finding, got: {findings:?}"
    );
    assert!(
        !findings
            .iter()
            .any(|finding| matches!(finding, Finding::PayloadMismatch { .. })),
        "payloads were identical, got: {findings:?}"
    );
}

#[test]
fn nested_wraps_replay_inline_in_the_shadow_thread() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let ((), findings) = with_capture(|| {
        wrap_fn(|| {
            wrap_fn(|| {
                COUNTER.fetch_add(1, Ordering::Relaxed);
            });
            let outcome = panic::catch_unwind(|| panic!("outer"));
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
        });
    });
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    // Inner body runs once in the main execution and once in the replay,
    // without a second shadow thread.
    assert_eq!(COUNTER.load(Ordering::Relaxed), 2);
}

#[test]
fn panic_unwinding_out_of_wrap_fn_still_releases_the_shadow_thread() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        wrap_fn(|| {
            panic!("escapes the wrap");
        });
    }));
    // If the frame guard failed to shut the shadow thread down, the scoped
    // join inside wrap_fn would hang and this test would never finish.
    assert!(result.is_err());
}

#[test]
fn wrap_fn_r_value_survives_a_recover_cycle() {
    let _guard = TEST_LOCK.lock().unwrap();
    reset_globals();

    let (value, findings) = with_capture(|| {
        wrap_fn_r(|| {
            let outcome = panic::catch_unwind(|| panic!("boom"));
            if let Err(payload) = outcome {
                let _ = wrap_recover(payload);
            }
            "done"
        })
    });
    assert_eq!(value, "done");
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");
}
