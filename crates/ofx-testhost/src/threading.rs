//! Multi-thread suite backed by real OS threads.
//!
//! The CPU count is a process-wide knob so tests can pin it. Mutexes are
//! recursive, matching what hosts hand out.

use std::os::raw::{c_int, c_uint, c_void};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::{self, ThreadId};

use ofx_sys::suites::OfxThreadFunctionV1;
use ofx_sys::{status, OfxMutexHandle, OfxStatus};

static CPU_COUNT: AtomicU32 = AtomicU32::new(1);

/// Sets the CPU count the suite reports and the spawn width it honors.
pub fn set_cpu_count(n: u32) {
    CPU_COUNT.store(n.max(1), Ordering::Relaxed);
}

pub fn cpu_count() -> u32 {
    CPU_COUNT.load(Ordering::Relaxed)
}

thread_local! {
    static WORKER_INDEX: std::cell::Cell<Option<c_uint>> = const { std::cell::Cell::new(None) };
}

struct SendPtr(*mut c_void);
unsafe impl Send for SendPtr {}

struct SendFn(OfxThreadFunctionV1);
unsafe impl Send for SendFn {}

unsafe extern "C" fn multi_thread(
    func: OfxThreadFunctionV1,
    n_threads: c_uint,
    custom_arg: *mut c_void,
) -> OfxStatus {
    let n = n_threads.clamp(1, cpu_count());
    if n == 1 {
        // Run inline on the calling thread.
        WORKER_INDEX.with(|w| w.set(Some(0)));
        func(0, 1, custom_arg);
        WORKER_INDEX.with(|w| w.set(None));
        return status::OK;
    }
    let mut handles = Vec::with_capacity(n as usize);
    for index in 0..n {
        let arg = SendPtr(custom_arg);
        let f = SendFn(func);
        handles.push(thread::spawn(move || {
            // Rebind so the closure captures the Send wrappers whole,
            // not their raw-pointer fields.
            let arg = arg;
            let f = f;
            WORKER_INDEX.with(|w| w.set(Some(index)));
            unsafe { (f.0)(index, n, arg.0) };
        }));
    }
    let mut stat = status::OK;
    for handle in handles {
        if handle.join().is_err() {
            stat = status::FAILED;
        }
    }
    stat
}

unsafe extern "C" fn multi_thread_num_cpus(n_cpus: *mut c_uint) -> OfxStatus {
    if n_cpus.is_null() {
        return status::FAILED;
    }
    *n_cpus = cpu_count();
    status::OK
}

unsafe extern "C" fn multi_thread_index(thread_index: *mut c_uint) -> OfxStatus {
    if thread_index.is_null() {
        return status::FAILED;
    }
    *thread_index = WORKER_INDEX.with(|w| w.get()).unwrap_or(0);
    status::OK
}

unsafe extern "C" fn multi_thread_is_spawned_thread() -> c_int {
    WORKER_INDEX.with(|w| w.get()).is_some() as c_int
}

/// A recursive mutex: tracks the owning thread and a hold count.
struct RecursiveMutex {
    state: Mutex<(Option<ThreadId>, u32)>,
    cond: Condvar,
}

impl RecursiveMutex {
    fn new() -> Box<RecursiveMutex> {
        Box::new(RecursiveMutex {
            state: Mutex::new((None, 0)),
            cond: Condvar::new(),
        })
    }

    fn lock(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap();
        loop {
            match state.0 {
                None => {
                    *state = (Some(me), 1);
                    return;
                }
                Some(owner) if owner == me => {
                    state.1 += 1;
                    return;
                }
                Some(_) => state = self.cond.wait(state).unwrap(),
            }
        }
    }

    fn try_lock(&self) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap();
        match state.0 {
            None => {
                *state = (Some(me), 1);
                true
            }
            Some(owner) if owner == me => {
                state.1 += 1;
                true
            }
            Some(_) => false,
        }
    }

    fn unlock(&self) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap();
        if state.0 != Some(me) || state.1 == 0 {
            return false;
        }
        state.1 -= 1;
        if state.1 == 0 {
            state.0 = None;
            self.cond.notify_one();
        }
        true
    }
}

unsafe extern "C" fn mutex_create(mutex: *mut OfxMutexHandle, lock_count: c_int) -> OfxStatus {
    if mutex.is_null() {
        return status::FAILED;
    }
    let m = RecursiveMutex::new();
    for _ in 0..lock_count.max(0) {
        m.lock();
    }
    *mutex = Box::into_raw(m) as OfxMutexHandle;
    status::OK
}

unsafe fn mutex_ref<'a>(mutex: OfxMutexHandle) -> Option<&'a RecursiveMutex> {
    (mutex as *const RecursiveMutex).as_ref()
}

unsafe extern "C" fn mutex_destroy(mutex: OfxMutexHandle) -> OfxStatus {
    if mutex.is_null() {
        return status::ERR_BAD_HANDLE;
    }
    drop(Box::from_raw(mutex as *mut RecursiveMutex));
    status::OK
}

unsafe extern "C" fn mutex_lock(mutex: OfxMutexHandle) -> OfxStatus {
    match mutex_ref(mutex) {
        Some(m) => {
            m.lock();
            status::OK
        }
        None => status::ERR_BAD_HANDLE,
    }
}

unsafe extern "C" fn mutex_unlock(mutex: OfxMutexHandle) -> OfxStatus {
    match mutex_ref(mutex) {
        Some(m) => {
            if m.unlock() {
                status::OK
            } else {
                status::FAILED
            }
        }
        None => status::ERR_BAD_HANDLE,
    }
}

unsafe extern "C" fn mutex_try_lock(mutex: OfxMutexHandle) -> OfxStatus {
    match mutex_ref(mutex) {
        Some(m) => {
            if m.try_lock() {
                status::OK
            } else {
                status::FAILED
            }
        }
        None => status::ERR_BAD_HANDLE,
    }
}

pub static MULTI_THREAD_SUITE_V1: ofx_sys::suites::OfxMultiThreadSuiteV1 =
    ofx_sys::suites::OfxMultiThreadSuiteV1 {
        multi_thread: Some(multi_thread),
        multi_thread_num_cpus: Some(multi_thread_num_cpus),
        multi_thread_index: Some(multi_thread_index),
        multi_thread_is_spawned_thread: Some(multi_thread_is_spawned_thread),
        mutex_create: Some(mutex_create),
        mutex_destroy: Some(mutex_destroy),
        mutex_lock: Some(mutex_lock),
        mutex_unlock: Some(mutex_unlock),
        mutex_try_lock: Some(mutex_try_lock),
    };

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn spawn_covers_every_index_once() {
        static HITS: [AtomicUsize; 4] = [
            AtomicUsize::new(0),
            AtomicUsize::new(0),
            AtomicUsize::new(0),
            AtomicUsize::new(0),
        ];
        unsafe extern "C" fn worker(index: c_uint, max: c_uint, _arg: *mut c_void) {
            assert_eq!(max, 4);
            HITS[index as usize].fetch_add(1, Ordering::SeqCst);
        }
        set_cpu_count(4);
        unsafe {
            assert_eq!(multi_thread(worker, 4, std::ptr::null_mut()), status::OK);
        }
        for hit in &HITS {
            assert_eq!(hit.load(Ordering::SeqCst), 1);
        }
        set_cpu_count(1);
    }

    #[test]
    fn spawn_hands_the_custom_arg_to_every_worker() {
        let total = AtomicUsize::new(0);
        unsafe extern "C" fn worker(index: c_uint, _max: c_uint, arg: *mut c_void) {
            let total = &*(arg as *const AtomicUsize);
            total.fetch_add(index as usize + 1, Ordering::SeqCst);
        }
        set_cpu_count(3);
        unsafe {
            assert_eq!(
                multi_thread(worker, 3, &total as *const _ as *mut c_void),
                status::OK
            );
        }
        assert_eq!(total.load(Ordering::SeqCst), 1 + 2 + 3);
        set_cpu_count(1);
    }

    #[test]
    fn mutexes_are_recursive() {
        let m = RecursiveMutex::new();
        m.lock();
        assert!(m.try_lock());
        assert!(m.unlock());
        assert!(m.unlock());
        // A second unlock of a free mutex fails.
        assert!(!m.unlock());
    }
}
