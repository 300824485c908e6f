//! The smaller suites: memory, messages, progress, timeline and
//! interact. Messages and progress are recorded so tests can assert on
//! what the plugin reported.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use ofx_sys::{status, OfxInteractHandle, OfxPropertySetHandle, OfxStatus};

use crate::props::PropSet;

// ============================================================================
// Memory suite
// ============================================================================

unsafe extern "C" fn memory_alloc(
    _handle: *mut c_void,
    n_bytes: usize,
    allocated_data: *mut *mut c_void,
) -> OfxStatus {
    if allocated_data.is_null() {
        return status::ERR_VALUE;
    }
    let buf: Box<Vec<u8>> = Box::new(vec![0u8; n_bytes]);
    *allocated_data = Box::into_raw(buf) as *mut c_void;
    status::OK
}

unsafe extern "C" fn memory_free(allocated_data: *mut c_void) -> OfxStatus {
    if allocated_data.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    drop(Box::from_raw(allocated_data as *mut Vec<u8>));
    status::OK
}

pub static MEMORY_SUITE_V1: ofx_sys::suites::OfxMemorySuiteV1 =
    ofx_sys::suites::OfxMemorySuiteV1 {
        memory_alloc: Some(memory_alloc),
        memory_free: Some(memory_free),
    };

// ============================================================================
// Message suites
// ============================================================================

#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub message_type: String,
    pub id: String,
    pub text: String,
    pub persistent: bool,
}

static MESSAGES: Mutex<Vec<MessageRecord>> = Mutex::new(Vec::new());
static MESSAGE_REPLY: AtomicI32 = AtomicI32::new(status::OK);

/// What the next message calls return; lets tests script a yes/no answer.
pub fn set_message_reply(reply: OfxStatus) {
    MESSAGE_REPLY.store(reply, Ordering::Relaxed);
}

pub fn take_messages() -> Vec<MessageRecord> {
    std::mem::take(&mut MESSAGES.lock().unwrap())
}

fn lossy(s: *const c_char) -> String {
    if s.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned()
    }
}

/// Called by the C shim with the format already expanded.
#[no_mangle]
pub extern "C" fn testhost_message(
    _handle: *mut c_void,
    message_type: *const c_char,
    id: *const c_char,
    text: *const c_char,
    persistent: c_int,
) -> OfxStatus {
    MESSAGES.lock().unwrap().push(MessageRecord {
        message_type: lossy(message_type),
        id: lossy(id),
        text: lossy(text),
        persistent: persistent != 0,
    });
    MESSAGE_REPLY.load(Ordering::Relaxed)
}

unsafe extern "C" fn clear_persistent_message(_handle: *mut c_void) -> OfxStatus {
    MESSAGES.lock().unwrap().retain(|m| !m.persistent);
    status::OK
}

extern "C" {
    fn testhost_shim_message(
        handle: *mut c_void,
        message_type: *const c_char,
        message_id: *const c_char,
        format: *const c_char,
        ...
    ) -> OfxStatus;
    fn testhost_shim_set_persistent_message(
        handle: *mut c_void,
        message_type: *const c_char,
        message_id: *const c_char,
        format: *const c_char,
        ...
    ) -> OfxStatus;
}

pub static MESSAGE_SUITE_V1: ofx_sys::suites::OfxMessageSuiteV1 =
    ofx_sys::suites::OfxMessageSuiteV1 {
        message: Some(testhost_shim_message),
    };

pub static MESSAGE_SUITE_V2: ofx_sys::suites::OfxMessageSuiteV2 =
    ofx_sys::suites::OfxMessageSuiteV2 {
        message: Some(testhost_shim_message),
        set_persistent_message: Some(testhost_shim_set_persistent_message),
        clear_persistent_message: Some(clear_persistent_message),
    };

// ============================================================================
// Progress suites
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Start(String),
    Update(f64),
    End,
}

static PROGRESS: Mutex<Vec<ProgressEvent>> = Mutex::new(Vec::new());
static CANCEL_PROGRESS: AtomicBool = AtomicBool::new(false);

pub fn take_progress() -> Vec<ProgressEvent> {
    std::mem::take(&mut PROGRESS.lock().unwrap())
}

/// When set, the next progress update answers `kOfxStatReplyNo`,
/// telling the plugin the user hit cancel.
pub fn set_progress_cancelled(cancel: bool) {
    CANCEL_PROGRESS.store(cancel, Ordering::Relaxed);
}

unsafe extern "C" fn progress_start_v1(
    _instance: *mut c_void,
    label: *const c_char,
) -> OfxStatus {
    PROGRESS
        .lock()
        .unwrap()
        .push(ProgressEvent::Start(lossy(label)));
    status::OK
}

unsafe extern "C" fn progress_start_v2(
    _instance: *mut c_void,
    message: *const c_char,
    _messageid: *const c_char,
) -> OfxStatus {
    PROGRESS
        .lock()
        .unwrap()
        .push(ProgressEvent::Start(lossy(message)));
    status::OK
}

unsafe extern "C" fn progress_update(_instance: *mut c_void, progress: f64) -> OfxStatus {
    PROGRESS.lock().unwrap().push(ProgressEvent::Update(progress));
    if CANCEL_PROGRESS.load(Ordering::Relaxed) {
        status::REPLY_NO
    } else {
        status::OK
    }
}

unsafe extern "C" fn progress_end(_instance: *mut c_void) -> OfxStatus {
    PROGRESS.lock().unwrap().push(ProgressEvent::End);
    status::OK
}

pub static PROGRESS_SUITE_V1: ofx_sys::suites::OfxProgressSuiteV1 =
    ofx_sys::suites::OfxProgressSuiteV1 {
        progress_start: Some(progress_start_v1),
        progress_update: Some(progress_update),
        progress_end: Some(progress_end),
    };

pub static PROGRESS_SUITE_V2: ofx_sys::suites::OfxProgressSuiteV2 =
    ofx_sys::suites::OfxProgressSuiteV2 {
        progress_start: Some(progress_start_v2),
        progress_update: Some(progress_update),
        progress_end: Some(progress_end),
    };

// ============================================================================
// Timeline suite
// ============================================================================

static TIMELINE_TIME: Mutex<f64> = Mutex::new(0.0);
static TIMELINE_BOUNDS: Mutex<(f64, f64)> = Mutex::new((0.0, 100.0));

pub fn set_timeline(time: f64, first: f64, last: f64) {
    *TIMELINE_TIME.lock().unwrap() = time;
    *TIMELINE_BOUNDS.lock().unwrap() = (first, last);
}

pub fn timeline_time() -> f64 {
    *TIMELINE_TIME.lock().unwrap()
}

unsafe extern "C" fn get_time(_instance: *mut c_void, time: *mut f64) -> OfxStatus {
    if time.is_null() {
        return status::ERR_VALUE;
    }
    *time = *TIMELINE_TIME.lock().unwrap();
    status::OK
}

unsafe extern "C" fn goto_time(_instance: *mut c_void, time: f64) -> OfxStatus {
    *TIMELINE_TIME.lock().unwrap() = time;
    status::OK
}

unsafe extern "C" fn get_time_bounds(
    _instance: *mut c_void,
    first: *mut f64,
    last: *mut f64,
) -> OfxStatus {
    if first.is_null() || last.is_null() {
        return status::ERR_VALUE;
    }
    let bounds = *TIMELINE_BOUNDS.lock().unwrap();
    *first = bounds.0;
    *last = bounds.1;
    status::OK
}

pub static TIME_LINE_SUITE_V1: ofx_sys::suites::OfxTimeLineSuiteV1 =
    ofx_sys::suites::OfxTimeLineSuiteV1 {
        get_time: Some(get_time),
        goto_time: Some(goto_time),
        get_time_bounds: Some(get_time_bounds),
    };

// ============================================================================
// Interact suite
// ============================================================================

static REDRAWS: Mutex<Vec<usize>> = Mutex::new(Vec::new());

pub fn take_redraws() -> Vec<usize> {
    std::mem::take(&mut REDRAWS.lock().unwrap())
}

unsafe extern "C" fn interact_swap_buffers(interact: OfxInteractHandle) -> OfxStatus {
    if interact.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    status::OK
}

unsafe extern "C" fn interact_redraw(interact: OfxInteractHandle) -> OfxStatus {
    if interact.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    REDRAWS.lock().unwrap().push(interact as usize);
    status::OK
}

unsafe extern "C" fn interact_get_property_set(
    interact: OfxInteractHandle,
    props: *mut OfxPropertySetHandle,
) -> OfxStatus {
    // Interact handles minted by this host are property bags.
    match PropSet::from_handle(interact as OfxPropertySetHandle) {
        Some(bag) => {
            if props.is_null() {
                return status::ERR_VALUE;
            }
            *props = bag.handle();
            status::OK
        }
        None => status::ERR_BAD_HANDLE,
    }
}

pub static INTERACT_SUITE_V1: ofx_sys::suites::OfxInteractSuiteV1 =
    ofx_sys::suites::OfxInteractSuiteV1 {
        interact_swap_buffers: Some(interact_swap_buffers),
        interact_redraw: Some(interact_redraw),
        interact_get_property_set: Some(interact_get_property_set),
    };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_recorded_with_expanded_text() {
        take_messages();
        set_message_reply(status::OK);
        unsafe {
            let stat = testhost_shim_message(
                std::ptr::null_mut(),
                c"OfxMessageError".as_ptr(),
                c"id".as_ptr(),
                c"bad frame %d".as_ptr(),
                7 as c_int,
            );
            assert_eq!(stat, status::OK);
        }
        let msgs = take_messages();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, "bad frame 7");
        assert!(!msgs[0].persistent);
    }

    #[test]
    fn cancelled_progress_answers_reply_no() {
        take_progress();
        set_progress_cancelled(true);
        unsafe {
            assert_eq!(progress_update(std::ptr::null_mut(), 0.5), status::REPLY_NO);
        }
        set_progress_cancelled(false);
        assert_eq!(take_progress(), vec![ProgressEvent::Update(0.5)]);
    }
}
