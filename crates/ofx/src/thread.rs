//! Work splitting over the host's multi-thread suite, plus the host mutex.
//!
//! The framework never spawns threads of its own; the host owns all
//! concurrency. `multi_thread` hands a borrowed processor through the C
//! trampoline, so the processor must be `Sync`: the host calls the worker
//! concurrently from several threads with the same argument.

use std::os::raw::{c_uint, c_void};
use std::sync::Arc;

use ofx_sys::{OfxMutexHandle, OfxRectI};

use crate::error::{check_status, OfxResult};
use crate::suites::{suite_fn, Suites};

/// One unit of splittable work.
pub trait Processor: Sync {
    fn work(&self, thread_index: u32, thread_count: u32);
}

struct Shim<'a> {
    processor: &'a (dyn Processor + 'a),
}

unsafe extern "C" fn trampoline(thread_index: c_uint, thread_max: c_uint, custom: *mut c_void) {
    let shim = &*(custom as *const Shim);
    shim.processor.work(thread_index, thread_max);
}

/// Runs `processor.work` across `n_cpus` host threads; 0 means all
/// available. A single CPU runs inline without touching the suite.
pub fn multi_thread(
    suites: &Suites,
    processor: &dyn Processor,
    n_cpus: u32,
) -> OfxResult<()> {
    let n = if n_cpus == 0 { num_cpus(suites)? } else { n_cpus };
    if n <= 1 {
        processor.work(0, 1);
        return Ok(());
    }
    let shim = Shim { processor };
    let f = suite_fn!(suites.multi_thread(), multi_thread)?;
    let stat = unsafe { f(trampoline, n, &shim as *const Shim as *mut c_void) };
    check_status(stat)
}

pub fn num_cpus(suites: &Suites) -> OfxResult<u32> {
    let f = suite_fn!(suites.multi_thread(), multi_thread_num_cpus)?;
    let mut n: c_uint = 1;
    check_status(unsafe { f(&mut n) })?;
    Ok(n.max(1))
}

pub fn thread_index(suites: &Suites) -> OfxResult<u32> {
    let f = suite_fn!(suites.multi_thread(), multi_thread_index)?;
    let mut n: c_uint = 0;
    check_status(unsafe { f(&mut n) })?;
    Ok(n)
}

pub fn is_spawned_thread(suites: &Suites) -> bool {
    match suites.multi_thread().multi_thread_is_spawned_thread {
        Some(f) => unsafe { f() != 0 },
        None => false,
    }
}

// ============================================================================
// Tiled pixel processing
// ============================================================================

/// Splits `window` into horizontal bands, one per thread, the remainder
/// going to the last band. Empty for indices past the row count.
pub fn tile_window(window: OfxRectI, thread_index: u32, thread_count: u32) -> OfxRectI {
    let height = (window.y2 - window.y1).max(0) as u32;
    let count = thread_count.max(1);
    let band = height / count;
    let y1 = window.y1 + (thread_index * band) as i32;
    let y2 = if thread_index == count - 1 {
        window.y2
    } else {
        window.y1 + ((thread_index + 1) * band) as i32
    };
    OfxRectI { x1: window.x1, y1, x2: window.x2, y2: y2.min(window.y2) }
}

/// A processor over a pixel rectangle; the framework tiles the render
/// window across host threads and calls `process_window` once per band.
pub trait PixelProcessor: Sync {
    fn render_window(&self) -> OfxRectI;
    /// Polled between bands; return true to stop early.
    fn abort(&self) -> bool {
        false
    }
    fn process_window(&self, window: OfxRectI);
}

struct Tiled<'a> {
    inner: &'a (dyn PixelProcessor + 'a),
}

impl Processor for Tiled<'_> {
    fn work(&self, thread_index: u32, thread_count: u32) {
        if self.inner.abort() {
            return;
        }
        let tile = tile_window(self.inner.render_window(), thread_index, thread_count);
        if tile.y2 > tile.y1 && tile.x2 > tile.x1 {
            self.inner.process_window(tile);
        }
    }
}

/// Tiles the processor's render window over `n_cpus` host threads.
pub fn process(suites: &Suites, processor: &dyn PixelProcessor, n_cpus: u32) -> OfxResult<()> {
    let window = processor.render_window();
    if window.x2 <= window.x1 || window.y2 <= window.y1 {
        return Ok(());
    }
    multi_thread(suites, &Tiled { inner: processor }, n_cpus)
}

// ============================================================================
// Host mutex
// ============================================================================

/// A recursive mutex provided by the host's multi-thread suite.
pub struct HostMutex {
    handle: OfxMutexHandle,
    suites: Arc<Suites>,
}

// The suite guarantees its mutex entry points are callable from any thread.
unsafe impl Send for HostMutex {}
unsafe impl Sync for HostMutex {}

impl HostMutex {
    /// `lock_count` is the initial recursion count, normally 0.
    pub fn new(suites: Arc<Suites>, lock_count: i32) -> OfxResult<HostMutex> {
        let f = suite_fn!(suites.multi_thread(), mutex_create)?;
        let mut handle: OfxMutexHandle = std::ptr::null_mut();
        check_status(unsafe { f(&mut handle, lock_count) })?;
        Ok(HostMutex { handle, suites })
    }

    pub fn lock(&self) -> OfxResult<MutexGuard<'_>> {
        let f = suite_fn!(self.suites.multi_thread(), mutex_lock)?;
        check_status(unsafe { f(self.handle) })?;
        Ok(MutexGuard { mutex: self })
    }

    pub fn try_lock(&self) -> OfxResult<Option<MutexGuard<'_>>> {
        let f = suite_fn!(self.suites.multi_thread(), mutex_try_lock)?;
        let stat = unsafe { f(self.handle) };
        if stat == ofx_sys::status::OK {
            Ok(Some(MutexGuard { mutex: self }))
        } else {
            Ok(None)
        }
    }

    fn unlock(&self) {
        if let Some(f) = self.suites.multi_thread().mutex_unlock {
            unsafe {
                f(self.handle);
            }
        }
    }
}

impl Drop for HostMutex {
    fn drop(&mut self) {
        if let Some(f) = self.suites.multi_thread().mutex_destroy {
            unsafe {
                f(self.handle);
            }
        }
    }
}

/// Scope guard returned by [`HostMutex::lock`]; releases on all exit paths.
pub struct MutexGuard<'a> {
    mutex: &'a HostMutex,
}

impl Drop for MutexGuard<'_> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_cover_window_without_overlap() {
        let window = OfxRectI { x1: 0, y1: 0, x2: 1000, y2: 1000 };
        let mut next_y = 0;
        for i in 0..4 {
            let band = tile_window(window, i, 4);
            assert_eq!(band.x1, 0);
            assert_eq!(band.x2, 1000);
            assert_eq!(band.y1, next_y);
            assert_eq!(band.y2 - band.y1, 250);
            next_y = band.y2;
        }
        assert_eq!(next_y, 1000);
    }

    #[test]
    fn remainder_rows_go_to_last_band() {
        let window = OfxRectI { x1: 0, y1: 10, x2: 64, y2: 117 };
        let bands: Vec<_> = (0..4).map(|i| tile_window(window, i, 4)).collect();
        assert_eq!(bands[0].y1, 10);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].y2, pair[1].y1);
        }
        assert_eq!(bands[3].y2, 117);
        // 107 rows over 4 bands: 26 each, 29 in the last.
        assert_eq!(bands[3].y2 - bands[3].y1, 29);
    }

    #[test]
    fn more_threads_than_rows_yields_empty_tail_bands() {
        let window = OfxRectI { x1: 0, y1: 0, x2: 8, y2: 3 };
        let band = tile_window(window, 5, 8);
        assert!(band.y2 <= band.y1 || band.y2 - band.y1 <= 1);
        let last = tile_window(window, 7, 8);
        assert_eq!(last.y2, 3);
    }
}
