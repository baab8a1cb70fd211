//! Replay diagnostics.
//!
//! Findings are emitted as stable stderr marker lines (scanned by the
//! harness) and, when a capture is active on the current thread, recorded as
//! values so in-process tests do not have to scrape stderr.

use std::cell::RefCell;
use std::fmt;

/// A divergence observed while replaying a recovered panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The replay ran to completion without panicking.
    ShadowDidNotPanic,
    /// The replay panicked but the panic never came back through
    /// [`wrap_recover`](crate::wrap_recover).
    ShadowDidNotRecover,
    /// The replay recovered more than once.
    ShadowRecoveredMultiple(usize),
    /// The replay panicked with a different payload.
    PayloadMismatch { main: String, shadow: String },
    /// `wrap_recover` was called with no enclosing `wrap_fn`/`wrap_fn_r`.
    UnenclosedRecover,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ShadowDidNotPanic => {
                write!(f, "shadow thread did not panic as it should have")
            }
            Finding::ShadowDidNotRecover => {
                write!(f, "shadow thread did not recover as it should have")
            }
            Finding::ShadowRecoveredMultiple(n) => {
                write!(f, "shadow thread recovered multiple times ({n})")
            }
            Finding::PayloadMismatch { main, shadow } => write!(
                f,
                "shadow thread panicked with different payload: {main} != {shadow}"
            ),
            Finding::UnenclosedRecover => {
                write!(f, "wrap_recover called with no enclosing wrap_fn or wrap_fn_r")
            }
        }
    }
}

/// Prefix of every diagnostic line on stderr.
pub const MARKER_PREFIX: &str = "=== shadowrace:";

thread_local! {
    static CAPTURE: RefCell<Option<Vec<Finding>>> = const { RefCell::new(None) };
}

pub(crate) fn emit(finding: Finding) {
    eprintln!("{MARKER_PREFIX} {finding}");
    CAPTURE.with_borrow_mut(|slot| {
        if let Some(findings) = slot {
            findings.push(finding);
        }
    });
}

/// Runs `f` while recording findings emitted on this thread, and returns
/// them alongside `f`'s result.
pub fn with_capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Finding>) {
    CAPTURE.with_borrow_mut(|slot| *slot = Some(Vec::new()));
    let result = f();
    let findings = CAPTURE.with_borrow_mut(|slot| slot.take().unwrap_or_default());
    (result, findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_and_resets() {
        let ((), findings) = with_capture(|| {
            emit(Finding::ShadowDidNotPanic);
            emit(Finding::ShadowRecoveredMultiple(3));
        });
        assert_eq!(
            findings,
            vec![
                Finding::ShadowDidNotPanic,
                Finding::ShadowRecoveredMultiple(3)
            ]
        );

        // Outside a capture, emissions go to stderr only.
        emit(Finding::ShadowDidNotRecover);
        let ((), findings) = with_capture(|| {});
        assert!(findings.is_empty());
    }

    #[test]
    fn display_lines_match_the_harness_markers() {
        assert_eq!(
            Finding::PayloadMismatch {
                main: "1".to_string(),
                shadow: "2".to_string()
            }
            .to_string(),
            "shadow thread panicked with different payload: 1 != 2"
        );
        assert_eq!(
            Finding::ShadowRecoveredMultiple(2).to_string(),
            "shadow thread recovered multiple times (2)"
        );
    }
}
