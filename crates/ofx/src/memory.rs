//! RAII over the host's image-memory suite.

use std::os::raw::c_void;
use std::sync::Arc;

use ofx_sys::{OfxImageEffectHandle, OfxImageMemoryHandle};

use crate::error::{check_status, Error, OfxResult};
use crate::suites::{suite_fn, Suites};

/// A block of host-managed memory, freed on drop.
///
/// The host may page an unlocked block out; `lock` pins it and returns a
/// pointer that stays stable until the matching `unlock`.
pub struct ImageMemory {
    handle: OfxImageMemoryHandle,
    suites: Arc<Suites>,
}

impl ImageMemory {
    /// Allocates `n_bytes` against `instance`, or against the whole process
    /// when `instance` is null.
    pub fn alloc(
        suites: Arc<Suites>,
        instance: OfxImageEffectHandle,
        n_bytes: usize,
    ) -> OfxResult<ImageMemory> {
        let f = suite_fn!(suites.image_effect(), image_memory_alloc)?;
        let mut handle: OfxImageMemoryHandle = std::ptr::null_mut();
        let stat = unsafe { f(instance, n_bytes, &mut handle) };
        check_status(stat)?;
        Ok(ImageMemory { handle, suites })
    }

    pub fn lock(&self) -> OfxResult<*mut c_void> {
        let f = suite_fn!(self.suites.image_effect(), image_memory_lock)?;
        let mut ptr: *mut c_void = std::ptr::null_mut();
        let stat = unsafe { f(self.handle, &mut ptr) };
        check_status(stat)?;
        if ptr.is_null() {
            return Err(Error::Memory);
        }
        Ok(ptr)
    }

    /// Unpins the block. Failures are ignored; there is nothing useful a
    /// caller can do with them.
    pub fn unlock(&self) {
        if let Some(f) = self.suites.image_effect().image_memory_unlock {
            unsafe {
                f(self.handle);
            }
        }
    }
}

impl Drop for ImageMemory {
    fn drop(&mut self) {
        if let Some(f) = self.suites.image_effect().image_memory_free {
            unsafe {
                f(self.handle);
            }
        }
    }
}
