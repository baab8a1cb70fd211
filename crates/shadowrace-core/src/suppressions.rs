//! Suppression installation for runs under a real race detector.
//!
//! The replay races this engine provokes on purpose still hit application
//! state the detector should report. What it should not report is traffic on
//! the engine's own internals; [`DEFAULT_RULES`] silences those.
//!
//! Only meaningful when the real sanitizer runtime is linked: with the weak
//! fallback stubs in place the underlying call traps (see `shadowrace-abi`).

use shadowrace_abi::suppressions::{self, SuppressionError};

/// Rules that silence races on the engine's own frames and relays.
pub const DEFAULT_RULES: &str = "race:shadowrace\n";

/// Installs `rules` into the runtime's global suppression context.
pub fn install(rules: &str) -> Result<(), SuppressionError> {
    suppressions::parse(rules).map(|_| ())
}

/// Installs [`DEFAULT_RULES`].
pub fn install_default() -> Result<(), SuppressionError> {
    install(DEFAULT_RULES)
}
