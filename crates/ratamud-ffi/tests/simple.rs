//! The process-wide engine through the C ABI. Kept in its own test binary
//! because it excludes the handle APIs for as long as it is initialized.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::sync::Mutex;

use ratamud::*;

fn take(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { ratamud_free_string(ptr) };
    Some(text)
}

static SEEN_AT: Mutex<Vec<(c_int, c_int)>> = Mutex::new(Vec::new());

extern "C" fn record_position(_text: *const c_char, _user_data: *mut c_void) {
    let (mut x, mut y): (c_int, c_int) = (0, 0);
    if unsafe { ratamud_get_player_position(&mut x, &mut y) } == 0 {
        SEEN_AT.lock().unwrap().push((x, y));
    }
}

#[test]
fn simple_api_lifecycle() {
    assert_eq!(unsafe { ratamud_process_command(c"look".as_ptr()) }, -1);
    assert!(take(ratamud_get_output()).is_none());

    assert_eq!(ratamud_init(), 0);
    assert_eq!(ratamud_init(), -1);
    assert_eq!(unsafe { ratamud_create_engine(c"Hero".as_ptr()) }, 0);
    assert_eq!(
        unsafe { ratamud_create_player(c"Hero".as_ptr(), c"".as_ptr()) },
        0
    );

    assert_eq!(unsafe { ratamud_process_command(c"east".as_ptr()) }, 1);
    let (mut x, mut y): (c_int, c_int) = (0, 0);
    assert_eq!(unsafe { ratamud_get_player_position(&mut x, &mut y) }, 0);
    assert_eq!((x, y), (51, 50));
    assert_eq!(take(ratamud_get_current_map()).unwrap(), "meadow");
    assert!(
        take(ratamud_get_player_info())
            .unwrap()
            .contains(r#""name":"Player""#)
    );
    assert!(!take(ratamud_get_output()).unwrap().is_empty());

    assert_eq!(ratamud_update(-5), -1);
    assert_eq!(ratamud_update(0), 1);
    assert_eq!(unsafe { ratamud_register_callback(4, None, std::ptr::null_mut()) }, -1);

    let none = std::ptr::null_mut();
    assert_eq!(unsafe { ratamud_register_callback(0, Some(record_position), none) }, 0);
    assert_eq!(unsafe { ratamud_process_command(c"south".as_ptr()) }, 1);
    assert_eq!(*SEEN_AT.lock().unwrap(), vec![(51, 51)]);
    assert_eq!(unsafe { ratamud_register_callback(0, None, none) }, 0);

    assert_eq!(unsafe { ratamud_process_command(c"quit".as_ptr()) }, 0);
    assert_eq!(ratamud_update(100), 0);

    ratamud_cleanup();
    ratamud_cleanup();
    assert!(take(ratamud_get_player_info()).is_none());

    let engine = unsafe { ratamud_create_engine(c"Hero".as_ptr()) };
    assert_ne!(engine, 0);
    assert_eq!(ratamud_init(), -1);
    ratamud_free_engine(engine);
    assert_eq!(ratamud_init(), 0);
    ratamud_cleanup();
}
