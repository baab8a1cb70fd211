//! Safe wrapper over the suppression entry points.

use std::ffi::{CString, NulError};

use libc::c_int;
use thiserror::Error;

use crate::suppression_abi::{__sanitizer_SuppressionContext_Parse, __tsan_Suppressions};

/// Failures the wrapper can detect on its own side of the boundary.
///
/// A missing runtime is not representable here: with only the weak stubs
/// linked, the call traps instead of returning an error.
#[derive(Debug, Error)]
pub enum SuppressionError {
    #[error("suppression rules contain an embedded NUL byte")]
    EmbeddedNul(#[from] NulError),
    #[error("sanitizer runtime returned a null suppression context")]
    NullContext,
}

/// Feeds `rules` to the runtime's global suppression context.
///
/// Returns the runtime's raw status code untouched; the stub contract gives
/// the code no meaning this crate could interpret.
pub fn parse(rules: &str) -> Result<c_int, SuppressionError> {
    let text = CString::new(rules)?;
    // SAFETY: the accessor takes no arguments and either returns the
    // runtime's context or traps without returning.
    let ctx = unsafe { __tsan_Suppressions() };
    if ctx.is_null() {
        return Err(SuppressionError::NullContext);
    }
    // SAFETY: `ctx` came from the runtime and `text` is a NUL-terminated
    // string that outlives the call.
    Ok(unsafe { __sanitizer_SuppressionContext_Parse(ctx, text.as_ptr()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only the pre-FFI path is exercised here: in this test binary the weak
    // stubs are the linked definitions, and reaching one would trap.
    #[test]
    fn embedded_nul_is_rejected_before_the_ffi_call() {
        let err = parse("race:a\0b").unwrap_err();
        assert!(matches!(err, SuppressionError::EmbeddedNul(_)));
    }

    #[test]
    fn error_messages_are_stable() {
        let err = parse("deadlock:\0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "suppression rules contain an embedded NUL byte"
        );
        assert_eq!(
            SuppressionError::NullContext.to_string(),
            "sanitizer runtime returned a null suppression context"
        );
    }
}
