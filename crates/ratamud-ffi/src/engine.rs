use std::ffi::{c_char, c_int, c_void};
use std::ptr;

use ratamud_core::Handle;

use crate::{
    ForeignCallback, RatamudCallback, category, handle_code, into_raw, into_raw_opt, read_str,
    registry, signal_code, status, with_registry,
};

/// Create an engine with a new player. Returns 0 if the name is null, empty
/// or not UTF-8, or if the simple API is initialized.
///
/// # Safety
///
/// `player_name` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_create_engine(player_name: *const c_char) -> u64 {
    // SAFETY: forwarded caller contract.
    let Some(name) = (unsafe { read_str(player_name) }) else {
        return 0;
    };
    handle_code(registry().create_engine(name))
}

/// Release an engine together with its player, world and callbacks. Stale
/// and zero handles are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_free_engine(engine: u64) {
    let _ = registry().free_engine(Handle::from_raw(engine));
}

/// Feed one line of input. Returns 1 to continue, 0 once the player quit,
/// -1 on failure. After a 0 the host must stop sending input.
///
/// # Safety
///
/// `command` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_engine_process_command(
    engine: u64,
    command: *const c_char,
) -> c_int {
    // SAFETY: forwarded caller contract.
    let Some(command) = (unsafe { read_str(command) }) else {
        return -1;
    };
    signal_code(with_registry(|reg| reg.engine_input(Handle::from_raw(engine), command)))
}

/// Take every buffered event in MAIN, LOG, STATUS, SIDE order, newline
/// separated. Returns an empty string when nothing is buffered and null on
/// failure.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_engine_get_output(engine: u64) -> *mut c_char {
    match registry().engine_output(Handle::from_raw(engine)) {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// Take one category's buffered events (0 MAIN, 1 LOG, 2 STATUS, 3 SIDE).
/// Returns null when the category is empty or the call fails.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_engine_drain_output(engine: u64, category_index: c_int) -> *mut c_char {
    let Some(category) = category(category_index) else {
        return ptr::null_mut();
    };
    match registry().engine_drain(Handle::from_raw(engine), category) {
        Ok(text) => into_raw_opt(text),
        Err(_) => ptr::null_mut(),
    }
}

/// The engine's state as a JSON object: the player's info plus
/// `current_map`. Null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_engine_get_state(engine: u64) -> *mut c_char {
    match registry().engine_state(Handle::from_raw(engine)) {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// Advance the engine's clock by `delta_ms`. Returns 1 to continue, 0 once
/// the player quit, -1 on failure.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_engine_update(engine: u64, delta_ms: u32) -> c_int {
    signal_code(with_registry(|reg| {
        reg.engine_update(Handle::from_raw(engine), u64::from(delta_ms))
    }))
}

/// Push one category's events to `callback` instead of buffering them. A
/// null `callback` goes back to buffering. Returns 0 on success, -1 for an
/// unknown category or engine.
///
/// Events reach `callback` on the thread that fed the input or update, after
/// the library has released its lock and before that call returns. From
/// inside the callback the host may read this engine and use any other
/// handle.
///
/// # Safety
///
/// `callback` must stay callable, and `user_data` valid for it, until the
/// registration is replaced, cleared, or the engine is released. The
/// callback must not feed input to, update, re-register on, or release the
/// engine it is reporting for.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_engine_register_callback(
    engine: u64,
    category_index: c_int,
    callback: RatamudCallback,
    user_data: *mut c_void,
) -> c_int {
    let Some(category) = category(category_index) else {
        return -1;
    };
    let sink = ForeignCallback::boxed(callback, user_data);
    status(registry().engine_register(Handle::from_raw(engine), category, sink))
}
