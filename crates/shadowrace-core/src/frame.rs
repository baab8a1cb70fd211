//! Per-thread bookkeeping for wrapped calls.
//!
//! Each thread keeps its own stack of frames, one per live `wrap_fn` /
//! `wrap_fn_r` call. Main-thread frames own a shadow thread, reachable over
//! the frame's relay; frames pushed inside a shadow thread during a replay
//! are markers only (shadow threads never spawn shadow threads).

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use crate::relay::{Command, Relay};

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
    static IS_SHADOW: Cell<bool> = const { Cell::new(false) };
    static REPLAY_RELAY: RefCell<Option<Arc<Relay>>> = const { RefCell::new(None) };
}

enum Frame {
    /// Pushed on a main thread; its shadow thread listens on `relay`.
    Main { relay: Arc<Relay> },
    /// Pushed inside a shadow thread during a replay.
    Shadow,
}

pub(crate) fn in_shadow_thread() -> bool {
    IS_SHADOW.get()
}

/// Marks the current thread as a shadow thread. Called once by the shadow
/// runner; never unset, shadow threads do not outlive their frame.
pub(crate) fn mark_shadow_thread() {
    IS_SHADOW.set(true);
}

pub(crate) fn depth() -> usize {
    FRAMES.with_borrow(Vec::len)
}

/// Relay of the innermost enclosing main-thread frame, if any.
pub(crate) fn top_relay() -> Option<Arc<Relay>> {
    FRAMES.with_borrow(|frames| match frames.last() {
        Some(Frame::Main { relay }) => Some(Arc::clone(relay)),
        _ => None,
    })
}

/// Relay handed to a shadow thread for the duration of one replay.
pub(crate) fn replay_relay() -> Option<Arc<Relay>> {
    REPLAY_RELAY.with_borrow(|slot| slot.clone())
}

pub(crate) fn set_replay_relay(relay: Option<Arc<Relay>>) {
    REPLAY_RELAY.with_borrow_mut(|slot| *slot = relay);
}

/// Pops its frame on drop; main-thread frames also release their shadow
/// thread, so an unwinding panic still shuts it down.
pub(crate) struct FrameGuard {
    relay: Option<Arc<Relay>>,
}

impl FrameGuard {
    pub(crate) fn push_main(relay: Arc<Relay>) -> Self {
        FRAMES.with_borrow_mut(|frames| {
            frames.push(Frame::Main {
                relay: Arc::clone(&relay),
            });
        });
        Self { relay: Some(relay) }
    }

    pub(crate) fn push_shadow() -> Self {
        FRAMES.with_borrow_mut(|frames| frames.push(Frame::Shadow));
        Self { relay: None }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with_borrow_mut(|frames| {
            frames.pop();
        });
        if let Some(relay) = self.relay.take() {
            relay.order(Command::Exit);
        }
    }
}
