//! Wrapped execution and recover checking.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crate::frame::{self, FrameGuard};
use crate::relay::{Command, Event, Relay};
use crate::report::{self, Finding};

/// Panic payload as produced by `std::panic::catch_unwind`.
pub type Payload = Box<dyn Any + Send>;

/// Runs `f` under a frame whose shadow thread stands by to replay it.
///
/// The shadow thread is spawned before `f` runs: replayed writes must not be
/// ordered after the originals, or the detector would never see them race.
/// It is released when the call returns, including by unwind.
pub fn wrap_fn<F>(f: F)
where
    F: Fn() + Sync,
{
    wrap_fn_r(|| f());
}

/// Like [`wrap_fn`], returning the wrapped function's result.
///
/// Inside a shadow thread this only pushes a marker frame and calls `f`;
/// shadow threads never spawn shadow threads of their own.
pub fn wrap_fn_r<T, F>(f: F) -> T
where
    F: Fn() -> T + Sync,
{
    if frame::in_shadow_thread() {
        let _frame = FrameGuard::push_shadow();
        return f();
    }
    let relay = Arc::new(Relay::new());
    thread::scope(|scope| {
        let shadow_relay = Arc::clone(&relay);
        let f_ref = &f;
        scope.spawn(move || shadow_thread(shadow_relay, f_ref));
        let _frame = FrameGuard::push_main(Arc::clone(&relay));
        f()
    })
}

/// Hands a caught panic payload over for replay checking, then returns it.
///
/// On a main thread with an enclosing wrapped call, the frame's shadow
/// thread re-executes the wrapped function and the replay's recovers are
/// compared against `payload`; divergence is reported through
/// [`report`](crate::report). In a shadow thread, the payload is forwarded
/// to the main thread when the recover belongs to the replayed function
/// itself; recovers inside nested wrapped calls stay local.
pub fn wrap_recover(payload: Payload) -> Payload {
    if frame::in_shadow_thread() {
        if frame::depth() == 0 {
            if let Some(relay) = frame::replay_relay() {
                relay.send(Event::Recovered(payload_text(payload.as_ref())));
                relay.await_ack();
            }
        }
        return payload;
    }

    let Some(relay) = frame::top_relay() else {
        report::emit(Finding::UnenclosedRecover);
        return payload;
    };

    let main_text = payload_text(payload.as_ref());
    relay.order(Command::Replay);
    let mut recovers = 0usize;
    loop {
        match relay.recv() {
            Event::Recovered(shadow_text) => {
                if shadow_text != main_text {
                    report::emit(Finding::PayloadMismatch {
                        main: main_text.clone(),
                        shadow: shadow_text,
                    });
                }
                recovers += 1;
                relay.ack();
            }
            Event::Done { panicked } => {
                if recovers == 0 {
                    report::emit(if panicked {
                        Finding::ShadowDidNotRecover
                    } else {
                        Finding::ShadowDidNotPanic
                    });
                } else if recovers >= 2 {
                    report::emit(Finding::ShadowRecoveredMultiple(recovers));
                }
                break;
            }
        }
    }
    payload
}

fn shadow_thread<T, F>(relay: Arc<Relay>, f: &F)
where
    F: Fn() -> T + Sync,
{
    frame::mark_shadow_thread();
    loop {
        match relay.wait_order() {
            Command::Exit => break,
            Command::Replay => {
                frame::set_replay_relay(Some(Arc::clone(&relay)));
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    f();
                }));
                frame::set_replay_relay(None);
                relay.send(Event::Done {
                    panicked: outcome.is_err(),
                });
            }
        }
    }
}

/// String form used to compare panic payloads across the two executions.
fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_text_handles_both_string_forms() {
        let static_str: Payload = Box::new("boom");
        let owned: Payload = Box::new("boom".to_string());
        let other: Payload = Box::new(17u32);
        assert_eq!(payload_text(static_str.as_ref()), "boom");
        assert_eq!(payload_text(owned.as_ref()), "boom");
        assert_eq!(payload_text(other.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn wrap_fn_r_returns_the_wrapped_result() {
        assert_eq!(wrap_fn_r(|| 7), 7);
        assert_eq!(wrap_fn_r(|| wrap_fn_r(|| "nested")), "nested");
    }

    #[test]
    fn unenclosed_recover_reports_and_returns_the_payload() {
        let (payload, findings) = report::with_capture(|| {
            let payload: Payload = Box::new("stray");
            wrap_recover(payload)
        });
        assert_eq!(findings, vec![Finding::UnenclosedRecover]);
        assert_eq!(payload_text(payload.as_ref()), "stray");
    }
}
