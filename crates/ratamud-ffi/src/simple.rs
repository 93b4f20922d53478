//! The process-wide engine, for hosts that only ever need one player.
//!
//! `ratamud_init` fails while any handle from the engine or direct API is
//! live, and those APIs refuse to create handles until `ratamud_cleanup`.

use std::ffi::{c_char, c_int, c_void};
use std::ptr;

use crate::{
    ForeignCallback, RatamudCallback, category, into_raw, into_raw_opt, read_str, registry,
    signal_code, status, with_registry, write_position,
};

/// Create the process-wide engine with a player named "Player". Returns 0,
/// or -1 if it already exists or handles are live.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_init() -> c_int {
    status(registry().init())
}

/// Release the process-wide engine and its callbacks. Safe to call when it
/// does not exist.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_cleanup() {
    registry().cleanup();
}

/// Feed one line of input. Returns 1 to continue, 0 once the player quit,
/// -1 on failure or before `ratamud_init`.
///
/// # Safety
///
/// `command` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_process_command(command: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let Some(command) = (unsafe { read_str(command) }) else {
        return -1;
    };
    signal_code(with_registry(|reg| reg.simple_input(command)))
}

/// Take every buffered event, as [`crate::ratamud_engine_get_output`] does.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_get_output() -> *mut c_char {
    match registry().simple_output() {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// Advance the clock. Returns 1 to continue, 0 once the player quit, -1 for
/// a negative delta or before `ratamud_init`.
///
/// A normal tick returns 1, not 0: the result is the same continue/stop
/// signal [`ratamud_process_command`] returns, and only -1 means failure.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_update(delta_ms: c_int) -> c_int {
    let Ok(delta_ms) = u64::try_from(delta_ms) else {
        return -1;
    };
    signal_code(with_registry(|reg| reg.simple_update(delta_ms)))
}

/// The player's info as JSON, or null before `ratamud_init`.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_get_player_info() -> *mut c_char {
    match registry().simple_player_info() {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// Write the player's position to `x` and `y`. Returns 0, or -1 before
/// `ratamud_init` or for a null out-pointer.
///
/// # Safety
///
/// `x` and `y` must each be null or valid for a write of one `int`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_get_player_position(x: *mut c_int, y: *mut c_int) -> c_int {
    let Ok(pos) = registry().simple_player_position() else {
        return -1;
    };
    // SAFETY: forwarded caller contract.
    unsafe { write_position(x, y, (pos.x, pos.y)) }
}

/// Name of the loaded map. Null when none is loaded or before
/// `ratamud_init`.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_get_current_map() -> *mut c_char {
    match registry().simple_current_map() {
        Ok(name) => into_raw_opt(name),
        Err(_) => ptr::null_mut(),
    }
}

/// Push one category's events to `callback`, or with a null `callback` go
/// back to buffering. Returns 0, or -1 for an unknown category or before
/// `ratamud_init`.
///
/// # Safety
///
/// Same contract as [`crate::ratamud_engine_register_callback`], with
/// `ratamud_cleanup` ending the registration. The callback must not call
/// `ratamud_process_command`, `ratamud_update`, `ratamud_register_callback`
/// or `ratamud_cleanup`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_register_callback(
    category_index: c_int,
    callback: RatamudCallback,
    user_data: *mut c_void,
) -> c_int {
    let Some(category) = category(category_index) else {
        return -1;
    };
    let sink = ForeignCallback::boxed(callback, user_data);
    status(registry().simple_register(category, sink))
}
