//! Raw storage for a payload
//!
//! A [`Slot`] is a block of memory with the size and alignment of `T` that
//! is never initialized or destroyed implicitly. Whoever owns the slot
//! decides when a value lives in it. In this crate that is always a
//! [`Representation`](crate::Representation), which keeps track of the
//! three states the memory can be in: uninitialized, marked empty or
//! holding a live payload.

use std::mem::MaybeUninit;

#[repr(transparent)]
pub struct Slot<T> {
    inner: MaybeUninit<T>,
}

impl<T> Slot<T> {
    /// A slot with unspecified contents
    pub const fn uninit() -> Self {
        Self {
            inner: MaybeUninit::uninit(),
        }
    }

    pub const fn as_ptr(&self) -> *const T {
        self.inner.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.inner.as_mut_ptr()
    }

    /// Move `value` into the slot without dropping anything that was there
    ///
    /// # Safety
    ///
    /// Whatever the slot held before is overwritten and will never be
    /// dropped. The caller must have destroyed it already if that matters.
    pub unsafe fn write(&mut self, value: T) -> &mut T {
        self.inner.write(value)
    }

    /// # Safety
    ///
    /// The slot must hold a live `T`.
    pub unsafe fn assume_init_ref(&self) -> &T {
        unsafe { self.inner.assume_init_ref() }
    }

    /// # Safety
    ///
    /// The slot must hold a live `T`.
    pub unsafe fn assume_init_mut(&mut self) -> &mut T {
        unsafe { self.inner.assume_init_mut() }
    }

    /// Move the value out, leaving the slot logically uninitialized
    ///
    /// # Safety
    ///
    /// The slot must hold a live `T` and the caller must not use that value
    /// through the slot again.
    pub unsafe fn read(&self) -> T {
        unsafe { self.inner.assume_init_read() }
    }

    /// Run the destructor of the value in the slot
    ///
    /// # Safety
    ///
    /// The slot must hold a live `T`. Afterwards it is uninitialized.
    pub unsafe fn drop_in_place(&mut self) {
        unsafe { self.inner.assume_init_drop() }
    }
}
