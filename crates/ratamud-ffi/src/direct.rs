use std::ffi::{c_char, c_int};
use std::ptr;

use ratamud_core::Handle;

use crate::{handle_code, into_raw, into_raw_opt, read_str, registry, status, write_position};

// ========================
// Players
// ========================

/// Create a player. Returns 0 if either string is null or not UTF-8, if the
/// name is empty, or if the simple API is initialized.
///
/// # Safety
///
/// `name` and `description` must each be null or a valid NUL-terminated
/// string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_create_player(
    name: *const c_char,
    description: *const c_char,
) -> u64 {
    // SAFETY: forwarded caller contract.
    let name = unsafe { read_str(name) };
    // SAFETY: forwarded caller contract.
    let description = unsafe { read_str(description) };
    let (Some(name), Some(description)) = (name, description) else {
        return 0;
    };
    handle_code(registry().create_player(name, description))
}

/// Release a player. Worlds created for it are not released.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_free_player(player: u64) {
    let _ = registry().free_player(Handle::from_raw(player));
}

/// The player's name, or null for an unknown handle.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_get_player_name(player: u64) -> *mut c_char {
    match registry().player_name(Handle::from_raw(player)) {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// The player's info as JSON with keys `name`, `description`, `position`,
/// `hp`, `max_hp`, `status` in that order. Null for an unknown handle.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_player_get_info(player: u64) -> *mut c_char {
    match registry().player_info(Handle::from_raw(player)) {
        Ok(text) => into_raw(text),
        Err(_) => ptr::null_mut(),
    }
}

/// The player's hit points, or -1 for an unknown handle. A live player can
/// legitimately have -1 hp; use [`ratamud_player_get_info`] to tell the two
/// apart.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_get_player_hp(player: u64) -> c_int {
    registry()
        .player_hp(Handle::from_raw(player))
        .unwrap_or(-1)
}

/// Overwrite the player's hit points. Returns 0, or -1 for an unknown handle.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_set_player_hp(player: u64, hp: c_int) -> c_int {
    status(registry().set_player_hp(Handle::from_raw(player), hp))
}

/// Write the player's position to `x` and `y`. Returns 0, or -1 for an
/// unknown handle or a null out-pointer.
///
/// # Safety
///
/// `x` and `y` must each be null or valid for a write of one `int`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_player_get_position(
    player: u64,
    x: *mut c_int,
    y: *mut c_int,
) -> c_int {
    let Ok(pos) = registry().player_position(Handle::from_raw(player)) else {
        return -1;
    };
    // SAFETY: forwarded caller contract.
    unsafe { write_position(x, y, (pos.x, pos.y)) }
}

/// Overwrite the player's position. No bounds are applied. Returns 0, or -1
/// for an unknown handle.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_set_player_position(player: u64, x: c_int, y: c_int) -> c_int {
    status(registry().set_player_position(Handle::from_raw(player), x, y))
}

// ========================
// Worlds
// ========================

/// Create a world for a live player. Returns 0 if the player handle is not
/// live or the simple API is initialized.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_create_world(player: u64) -> u64 {
    handle_code(registry().create_world(Handle::from_raw(player)))
}

/// Release a world. Its player is not released.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_free_world(world: u64) {
    let _ = registry().free_world(Handle::from_raw(world));
}

/// Switch the world to the named map. Returns 0, or -1 if the map cannot be
/// loaded, in which case the world is unchanged.
///
/// # Safety
///
/// `map_name` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ratamud_load_map(world: u64, map_name: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let Some(map_name) = (unsafe { read_str(map_name) }) else {
        return -1;
    };
    status(registry().load_map(Handle::from_raw(world), map_name))
}

/// Name of the world's loaded map. Null before any successful load or for an
/// unknown handle.
#[unsafe(no_mangle)]
pub extern "C" fn ratamud_world_get_current_map(world: u64) -> *mut c_char {
    match registry().current_map(Handle::from_raw(world)) {
        Ok(name) => into_raw_opt(name),
        Err(_) => ptr::null_mut(),
    }
}
