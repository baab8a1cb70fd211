//! Weak stubs and plain forwarders for the suppression symbols.
//!
//! The mangled names are the itanium-ABI forms of `__tsan::Suppressions()`
//! and `__sanitizer::SuppressionContext::Parse(char const*)`. The stubs are
//! `#[linkage = "weak"]`, so a strong definition from the real runtime wins
//! the link and the stub bodies are discarded. When only the stubs are
//! present, any call traps immediately and never returns.
//!
//! Forwarders call *through the symbol* (an `extern` declaration) rather
//! than the stub function: link-time resolution, not Rust dispatch, decides
//! which definition is reached.

use std::marker::{PhantomData, PhantomPinned};

use libc::{c_char, c_int};

/// Suppression store owned by the sanitizer runtime.
///
/// Never constructed or inspected here; it exists only so the entry-point
/// signatures type-check. Pointer-only, per the opaque-type FFI pattern.
#[repr(C)]
pub struct SuppressionContext {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

// __tsan::Suppressions()
#[unsafe(export_name = "_ZN6__tsan12SuppressionsEv")]
#[linkage = "weak"]
pub extern "C" fn tsan_suppressions_fallback() -> *mut SuppressionContext {
    core::intrinsics::abort()
}

// __sanitizer::SuppressionContext::Parse(char const*)
#[unsafe(export_name = "_ZN11__sanitizer18SuppressionContext5ParseEPKc")]
#[linkage = "weak"]
pub extern "C" fn suppression_context_parse_fallback(
    _ctx: *mut SuppressionContext,
    _rules: *const c_char,
) -> c_int {
    core::intrinsics::abort()
}

unsafe extern "C" {
    #[link_name = "_ZN6__tsan12SuppressionsEv"]
    fn tsan_suppressions_raw() -> *mut SuppressionContext;

    #[link_name = "_ZN11__sanitizer18SuppressionContext5ParseEPKc"]
    fn suppression_context_parse_raw(
        ctx: *mut SuppressionContext,
        rules: *const c_char,
    ) -> c_int;
}

/// Returns the runtime's global suppression context.
///
/// With only the weak stub linked this traps and does not return.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tsan_Suppressions() -> *mut SuppressionContext {
    unsafe { tsan_suppressions_raw() }
}

/// Parses NUL-terminated suppression rules into `ctx`.
///
/// Both arguments are forwarded positionally unchanged. With only the weak
/// stub linked this traps before any argument is examined.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __sanitizer_SuppressionContext_Parse(
    ctx: *mut SuppressionContext,
    rules: *const c_char,
) -> c_int {
    unsafe { suppression_context_parse_raw(ctx, rules) }
}
