//! Scoped ownership of system-allocated buffers.
//!
//! Some system calls hand back memory the caller must free with a specific
//! deallocator (`LocalFree` for `FormatMessageW`). [`ScopedBuffer`] pairs the
//! pointer with that deallocator and releases it on drop, so every exit path
//! of a lookup frees the buffer, including early returns and unwinding.

use std::fmt;
use std::ptr::NonNull;

/// Owner of a buffer allocated by someone else's allocator.
pub struct ScopedBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
    release: unsafe fn(*mut T),
}

impl<T> ScopedBuffer<T> {
    /// Take ownership of `len` elements at `ptr`.
    ///
    /// Returns `None` for a null pointer, in which case `release` is never called.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to `len` initialized elements of `T`.
    /// - The memory must stay valid and unaliased until `release` runs.
    /// - `release` must be the deallocator that matches how `ptr` was allocated,
    ///   and must be sound to call exactly once with `ptr`.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T, len: usize, release: unsafe fn(*mut T)) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, len, release })
    }

    /// View the buffer contents.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: guaranteed by the contract of `from_raw`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Number of `T` elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Drop for ScopedBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: `from_raw` guarantees `release` matches the allocation, and
        // drop runs at most once.
        unsafe { (self.release)(self.ptr.as_ptr()) }
    }
}

impl<T> fmt::Debug for ScopedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static RELEASED: Cell<usize> = const { Cell::new(0) };
    }

    const N: usize = 5;

    unsafe fn release_boxed(ptr: *mut u16) {
        // SAFETY: only used with pointers produced by `leak_boxed`.
        drop(unsafe { Box::from_raw(ptr as *mut [u16; N]) });
        RELEASED.with(|r| r.set(r.get() + 1));
    }

    fn leak_boxed(value: [u16; N]) -> *mut u16 {
        Box::into_raw(Box::new(value)) as *mut u16
    }

    fn released() -> usize {
        RELEASED.with(|r| r.get())
    }

    #[test]
    fn releases_on_drop() {
        let before = released();
        {
            let buf = unsafe { ScopedBuffer::from_raw(leak_boxed([104, 105, 0, 0, 0]), 2, release_boxed) }
                .unwrap();
            assert_eq!(buf.as_slice(), &[104, 105]);
            assert_eq!(buf.len(), 2);
            assert_eq!(released(), before);
        }
        assert_eq!(released(), before + 1);
    }

    #[test]
    fn releases_on_early_return() {
        fn first_nonzero(buf: ScopedBuffer<u16>) -> Option<u16> {
            let first = *buf.as_slice().first()?;
            if first == 0 {
                return None;
            }
            Some(first)
        }

        let before = released();
        let buf = unsafe { ScopedBuffer::from_raw(leak_boxed([0; N]), N, release_boxed) }.unwrap();
        assert_eq!(first_nonzero(buf), None);
        assert_eq!(released(), before + 1);
    }

    #[test]
    fn null_pointer_is_rejected_without_release() {
        let before = released();
        let buf = unsafe { ScopedBuffer::<u16>::from_raw(std::ptr::null_mut(), 0, release_boxed) };
        assert!(buf.is_none());
        assert_eq!(released(), before);
    }
}
