//! C ABI for the RataMUD engine.
//!
//! Every resource a host holds is an opaque `uint64_t` handle issued by one
//! process-wide [`Registry`]; 0 is never a valid handle and is returned on
//! failure. Functions returning `int` use 0 for success and -1 for failure,
//! except the input and update calls, which return 1 to continue, 0 to stop
//! and -1 on failure.
//!
//! Strings returned as `char *` are owned by the caller and must be released
//! exactly once with [`ratamud_free_string`]. The one exception is
//! [`ratamud_version`], whose result is static. Text containing an interior
//! NUL cannot cross the boundary and comes back as null.
//!
//! Output callbacks run on the calling thread before the input or update
//! call that produced the events returns, after the registry lock has been
//! released. A callback may call back into this library, except to feed input
//! to, update, re-register on, or release the engine it is reporting for.

use std::cell::RefCell;
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use ratamud_core::{Handle, StringBox};
use ratamud_engine::{EngineConfig, EngineResult, OutputCategory, OutputSink, Registry, Signal};

/// Engine API: one engine per handle.
pub mod engine;
/// Direct API: loose players and worlds.
pub mod direct;
/// Simple API: the process-wide engine.
pub mod simple;

pub use direct::*;
pub use engine::*;
pub use simple::*;

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| {
    let config = EngineConfig::from_env();
    log::debug!("registry created, maps dir {:?}", config.maps_dir);
    Mutex::new(Registry::new(config))
});

/// Lock the registry. A panic while it was held leaves nothing half-written,
/// so a poisoned lock is taken over.
pub(crate) fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` under the registry lock, release it, then deliver the callback
/// events `f` queued.
pub(crate) fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    let result = f(&mut registry());
    deliver_pending();
    result
}

/// One event waiting to be handed to a host callback.
struct Delivery {
    callback: extern "C" fn(*const c_char, *mut c_void),
    user_data: *mut c_void,
    text: CString,
}

thread_local! {
    static PENDING: RefCell<Vec<Delivery>> = const { RefCell::new(Vec::new()) };
}

/// Hand every queued event on this thread to its callback, in emission
/// order. Events queued by a callback's own calls are delivered by those
/// calls.
fn deliver_pending() {
    let pending = PENDING.with_borrow_mut(std::mem::take);
    for delivery in pending {
        (delivery.callback)(delivery.text.as_ptr(), delivery.user_data);
    }
}

/// Output callback: receives the event text and the user data pointer given
/// at registration. The text is only valid during the call.
pub type RatamudCallback = Option<extern "C" fn(text: *const c_char, user_data: *mut c_void)>;

/// An output sink forwarding to a host function. Events are queued on the
/// emitting thread and delivered once the registry lock is released.
pub(crate) struct ForeignCallback {
    callback: extern "C" fn(*const c_char, *mut c_void),
    user_data: *mut c_void,
}

// The registry is only ever touched under its lock, and the host promised at
// registration that `user_data` may be used from whichever thread drives the
// engine.
unsafe impl Send for ForeignCallback {}

impl ForeignCallback {
    /// Build a sink, or `None` for a null function pointer.
    pub(crate) fn boxed(
        callback: RatamudCallback,
        user_data: *mut c_void,
    ) -> Option<Box<dyn OutputSink>> {
        callback.map(|callback| {
            Box::new(Self {
                callback,
                user_data,
            }) as Box<dyn OutputSink>
        })
    }
}

impl OutputSink for ForeignCallback {
    fn deliver(&mut self, _category: OutputCategory, content: &str) {
        let Ok(text) = CString::new(content) else {
            return;
        };
        PENDING.with_borrow_mut(|pending| {
            pending.push(Delivery {
                callback: self.callback,
                user_data: self.user_data,
                text,
            })
        });
    }
}

/// Borrow a host string. Null and non-UTF-8 input yield `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Hand a string to the host, who now owns it.
pub(crate) fn into_raw(text: StringBox) -> *mut c_char {
    CString::new(text.into_string())
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Hand an optional string to the host; `None` becomes null.
pub(crate) fn into_raw_opt(text: Option<StringBox>) -> *mut c_char {
    text.map_or(ptr::null_mut(), into_raw)
}

pub(crate) fn status(result: EngineResult<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

pub(crate) fn signal_code(result: EngineResult<Signal>) -> c_int {
    match result {
        Ok(Signal::Continue) => 1,
        Ok(Signal::Stop) => 0,
        Err(_) => -1,
    }
}

pub(crate) fn handle_code(result: EngineResult<Handle>) -> u64 {
    result.map_or(0, Handle::into_raw)
}

pub(crate) fn category(index: c_int) -> Option<OutputCategory> {
    OutputCategory::from_index(i64::from(index))
}

/// Write a position through two out-pointers.
///
/// # Safety
///
/// `x` and `y` must each be null or valid for a write of one `int`.
pub(crate) unsafe fn write_position(x: *mut c_int, y: *mut c_int, pos: (i32, i32)) -> c_int {
    if x.is_null() || y.is_null() {
        return -1;
    }
    // SAFETY: both checked non-null; validity is the caller's contract.
    unsafe {
        *x = pos.0;
        *y = pos.1;
    }
    0
}

/// Library version. The string is static: never pass it to
/// [`ratamud_free_string`].
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_version() -> *const c_char {
    c"RataMUD v0.1.0".as_ptr()
}

/// Release a string returned by this library. Null is ignored.
///
/// # Safety
///
/// `s` must be null or a pointer previously returned by a `ratamud_*`
/// function other than [`ratamud_version`], not yet released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    // SAFETY: `s` came from `CString::into_raw` and is released once.
    drop(unsafe { CString::from_raw(s) });
}
