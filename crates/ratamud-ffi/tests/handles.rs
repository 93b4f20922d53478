//! The engine and direct APIs driven through the C ABI.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::ptr;
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ratamud::*;

/// Copy a returned string and release it.
fn take(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { ratamud_free_string(ptr) };
    Some(text)
}

#[test]
fn version_is_static() {
    let version = unsafe { CStr::from_ptr(ratamud_version()) };
    assert_eq!(version.to_str().unwrap(), "RataMUD v0.1.0");
    assert_eq!(ratamud_version(), ratamud_version());
}

#[test]
fn free_string_ignores_null() {
    unsafe { ratamud_free_string(ptr::null_mut()) };
}

#[test]
fn player_round_trip() {
    let hero = unsafe { ratamud_create_player(c"Hero".as_ptr(), c"desc".as_ptr()) };
    assert_ne!(hero, 0);
    assert_eq!(take(ratamud_get_player_name(hero)).unwrap(), "Hero");

    let h0 = ratamud_get_player_hp(hero);
    assert_eq!(ratamud_set_player_hp(hero, h0 - 10), 0);
    assert_eq!(ratamud_get_player_hp(hero), h0 - 10);

    assert_eq!(ratamud_set_player_position(hero, -3, 12), 0);
    let (mut x, mut y): (c_int, c_int) = (0, 0);
    assert_eq!(unsafe { ratamud_player_get_position(hero, &mut x, &mut y) }, 0);
    assert_eq!((x, y), (-3, 12));
    assert_eq!(
        unsafe { ratamud_player_get_position(hero, ptr::null_mut(), &mut y) },
        -1
    );

    let info = take(ratamud_player_get_info(hero)).unwrap();
    assert!(info.starts_with(r#"{"name":"Hero","description":"desc","position":{"x":-3,"y":12}"#));

    ratamud_free_player(hero);
    assert_eq!(ratamud_get_player_hp(hero), -1);
    assert!(take(ratamud_get_player_name(hero)).is_none());
}

#[test]
fn invalid_player_arguments() {
    assert_eq!(unsafe { ratamud_create_player(ptr::null(), c"x".as_ptr()) }, 0);
    assert_eq!(unsafe { ratamud_create_player(c"".as_ptr(), c"x".as_ptr()) }, 0);
    assert_eq!(ratamud_create_world(0), 0);
}

#[test]
fn handles_of_one_kind_are_refused_by_another() {
    let hero = unsafe { ratamud_create_player(c"Hero".as_ptr(), c"".as_ptr()) };
    let engine = unsafe { ratamud_create_engine(c"Alice".as_ptr()) };
    assert_ne!(hero, engine);

    assert!(take(ratamud_engine_get_state(hero)).is_none());
    assert_eq!(
        unsafe { ratamud_engine_process_command(hero, c"north".as_ptr()) },
        -1
    );
    assert_eq!(ratamud_get_player_hp(engine), -1);
    assert_eq!(ratamud_create_world(engine), 0);

    ratamud_free_engine(hero);
    assert_eq!(take(ratamud_get_player_name(hero)).unwrap(), "Hero");
    ratamud_free_player(hero);
    ratamud_free_engine(engine);
}

#[test]
fn world_map_loading() {
    let hero = unsafe { ratamud_create_player(c"Hero".as_ptr(), c"".as_ptr()) };
    let world = ratamud_create_world(hero);
    assert_ne!(world, 0);
    assert!(take(ratamud_world_get_current_map(world)).is_none());

    assert_eq!(unsafe { ratamud_load_map(world, c"nonexistent".as_ptr()) }, -1);
    assert!(take(ratamud_world_get_current_map(world)).is_none());

    assert_eq!(unsafe { ratamud_load_map(world, c"cave".as_ptr()) }, 0);
    assert_eq!(unsafe { ratamud_load_map(world, c"nonexistent".as_ptr()) }, -1);
    assert_eq!(take(ratamud_world_get_current_map(world)).unwrap(), "cave");

    ratamud_free_player(hero);
    assert_eq!(take(ratamud_world_get_current_map(world)).unwrap(), "cave");
    ratamud_free_world(world);
    assert!(take(ratamud_world_get_current_map(world)).is_none());
}

#[test]
fn engine_session() {
    let engine = unsafe { ratamud_create_engine(c"Hero".as_ptr()) };
    assert_ne!(engine, 0);
    take(ratamud_engine_get_output(engine));

    let code = unsafe { ratamud_engine_process_command(engine, c"look".as_ptr()) };
    assert_eq!(code, 1);
    assert!(take(ratamud_engine_drain_output(engine, 0)).is_some());
    assert!(take(ratamud_engine_drain_output(engine, 0)).is_none());
    assert!(take(ratamud_engine_drain_output(engine, 9)).is_none());

    assert_eq!(ratamud_engine_update(engine, 0), 1);
    assert_eq!(take(ratamud_engine_get_output(engine)).unwrap(), "");

    let code = unsafe { ratamud_engine_process_command(engine, c"quit".as_ptr()) };
    assert_eq!(code, 0);
    assert_eq!(take(ratamud_engine_get_output(engine)).unwrap(), "Farewell, Hero.");
    assert_eq!(ratamud_engine_update(engine, 10), 0);

    let state = take(ratamud_engine_get_state(engine)).unwrap();
    assert!(state.ends_with(r#""current_map":"meadow"}"#));

    ratamud_free_engine(engine);
    assert!(take(ratamud_engine_get_state(engine)).is_none());
    assert_eq!(
        unsafe { ratamud_engine_process_command(engine, c"look".as_ptr()) },
        -1
    );
}

extern "C" fn record(text: *const c_char, user_data: *mut c_void) {
    let seen = unsafe { &*(user_data as *const Mutex<Vec<String>>) };
    let text = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
    seen.lock().unwrap().push(text);
}

#[test]
fn engine_callbacks() {
    let seen: &'static Mutex<Vec<String>> = Box::leak(Box::new(Mutex::new(Vec::new())));
    let user_data = seen as *const Mutex<Vec<String>> as *mut c_void;

    let engine = unsafe { ratamud_create_engine(c"Hero".as_ptr()) };
    assert_eq!(
        unsafe { ratamud_engine_register_callback(engine, 0, Some(record), user_data) },
        0
    );
    assert_eq!(
        unsafe { ratamud_engine_register_callback(engine, 7, Some(record), user_data) },
        -1
    );

    unsafe { ratamud_engine_process_command(engine, c"take apple".as_ptr()) };
    assert_eq!(*seen.lock().unwrap(), vec!["You pick up the apple."]);
    assert!(take(ratamud_engine_drain_output(engine, 0)).is_none());
    assert_eq!(take(ratamud_engine_drain_output(engine, 1)).unwrap(), "take apple");

    assert_eq!(
        unsafe { ratamud_engine_register_callback(engine, 0, None, ptr::null_mut()) },
        0
    );
    unsafe { ratamud_engine_process_command(engine, c"drop apple".as_ptr()) };
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(
        take(ratamud_engine_drain_output(engine, 0)).unwrap(),
        "You drop the apple."
    );
    ratamud_free_engine(engine);
}

/// What a MAIN callback saw when it looked at its own engine.
struct Observer {
    engine: u64,
    states: Mutex<Vec<String>>,
}

extern "C" fn observe(_text: *const c_char, user_data: *mut c_void) {
    let observer = unsafe { &*(user_data as *const Observer) };
    if let Some(state) = take(ratamud_engine_get_state(observer.engine)) {
        observer.states.lock().unwrap().push(state);
    }
}

#[test]
fn callbacks_may_read_their_engine() {
    let engine = unsafe { ratamud_create_engine(c"Hero".as_ptr()) };
    let observer: &'static Observer = Box::leak(Box::new(Observer {
        engine,
        states: Mutex::new(Vec::new()),
    }));
    let user_data = observer as *const Observer as *mut c_void;
    assert_eq!(
        unsafe { ratamud_engine_register_callback(engine, 0, Some(observe), user_data) },
        0
    );

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let code = unsafe { ratamud_engine_process_command(engine, c"north".as_ptr()) };
        let _ = tx.send(code);
    });
    let code = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("input with a reading callback never returned");
    assert_eq!(code, 1);

    let states = observer.states.lock().unwrap();
    assert_eq!(states.len(), 1);
    assert!(states[0].contains(r#""position":{"x":50,"y":49}"#));
    drop(states);
    ratamud_free_engine(engine);
}
