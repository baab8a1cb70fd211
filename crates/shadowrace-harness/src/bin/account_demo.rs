//! Bank-account scenario.
//!
//! A withdrawal debits the balance *before* checking for overdraft, so the
//! panic leaves a stale global mutation behind. The replay re-applies that
//! mutation from the shadow thread; run under ThreadSanitizer, the two
//! unsynchronized writes are reported as a data race. The balance is a plain
//! `static mut` on purpose: atomics would hide exactly the bug class this
//! scenario exists to exhibit. The engine serializes the two executions, so
//! the accesses never overlap in time.

use shadowrace_core::{wrap_fn, wrap_recover};

static mut BALANCE: i64 = 100;

fn balance() -> i64 {
    // SAFETY: main and shadow executions are serialized by the engine.
    unsafe { *(&raw const BALANCE) }
}

fn adjust(delta: i64) {
    // SAFETY: same serialization argument as `balance`.
    unsafe { *(&raw mut BALANCE) += delta }
}

fn main() {
    let mut rng = Xorshift::new(0x5eed);
    for _ in 0..5 {
        if rng.below(2) == 0 {
            let credit = rng.below(50) as i64;
            println!("Depositing {credit}...");
            adjust(credit);
        } else {
            let debit = rng.below(100) as i64;
            println!("Withdrawing {debit}...");
            withdraw(debit);
        }
        println!("New balance: {}", balance());
    }
    // Guaranteed overdraft so every run exhibits the replay path.
    println!("Withdrawing 500...");
    withdraw(500);
    println!("Final balance: {}", balance());
}

fn withdraw(debit: i64) {
    wrap_fn(|| {
        let outcome = std::panic::catch_unwind(|| {
            adjust(-debit);
            if balance() < 0 {
                panic!("insufficient funds");
            }
        });
        if let Err(payload) = outcome {
            let payload = wrap_recover(payload);
            if let Some(reason) = payload.downcast_ref::<&str>() {
                eprintln!("withdrawal rejected: {reason}");
            }
        }
    });
}

/// Small deterministic PRNG; the scenario must replay identically run to run.
struct Xorshift {
    state: u64,
}

impl Xorshift {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}
