//! Main/shadow rendezvous with detector-invisible ordering.
//!
//! The command word and the recover acknowledgement are relaxed atomics
//! polled with spin/yield loops: a replay order must not hand the race
//! detector a happens-before edge, or the replayed writes would appear
//! ordered after the originals and never race. Event payloads travel through
//! a mutex queue, but the main thread only drains it after a relaxed counter
//! announces an entry, and the drain tolerates losing that race by retrying.

use std::collections::VecDeque;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;

const CMD_NONE: u8 = 0;
const CMD_REPLAY: u8 = 1;
const CMD_EXIT: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Replay,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Event {
    /// A recover reached during the replay, carrying the payload's string form.
    Recovered(String),
    /// The replay finished; `panicked` is set when the panic escaped the
    /// replayed closure without being recovered.
    Done { panicked: bool },
}

/// One relay per main-thread frame, shared with that frame's shadow thread.
#[derive(Debug, Default)]
pub(crate) struct Relay {
    command: AtomicU8,
    events: Mutex<VecDeque<Event>>,
    pending: AtomicUsize,
    ack: AtomicBool,
}

impl Relay {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Main side: order the shadow thread around. Relaxed store only; the
    /// shadow thread sees the order without a synchronization edge.
    pub(crate) fn order(&self, command: Command) {
        let word = match command {
            Command::Replay => CMD_REPLAY,
            Command::Exit => CMD_EXIT,
        };
        self.command.store(word, Ordering::Relaxed);
    }

    /// Shadow side: wait for the next order and consume it.
    pub(crate) fn wait_order(&self) -> Command {
        loop {
            match self.command.swap(CMD_NONE, Ordering::Relaxed) {
                CMD_NONE => {
                    hint::spin_loop();
                    thread::yield_now();
                }
                CMD_REPLAY => return Command::Replay,
                _ => return Command::Exit,
            }
        }
    }

    /// Shadow side: publish an event for the main thread.
    pub(crate) fn send(&self, event: Event) {
        self.events.lock().push_back(event);
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Main side: wait for and take the next event.
    pub(crate) fn recv(&self) -> Event {
        loop {
            while self.pending.load(Ordering::Relaxed) == 0 {
                hint::spin_loop();
                thread::yield_now();
            }
            // The relaxed counter can run ahead of the queued entry.
            if let Some(event) = self.events.lock().pop_front() {
                self.pending.fetch_sub(1, Ordering::Relaxed);
                return event;
            }
            thread::yield_now();
        }
    }

    /// Main side: release a shadow thread parked in [`Relay::await_ack`].
    pub(crate) fn ack(&self) {
        self.ack.store(true, Ordering::Relaxed);
    }

    /// Shadow side: wait until the main thread has handled a forwarded
    /// recover. Keeps the two threads from ever running the wrapped
    /// function at the same time.
    pub(crate) fn await_ack(&self) {
        while !self.ack.swap(false, Ordering::Relaxed) {
            hint::spin_loop();
            thread::yield_now();
        }
    }
}
