// Copyright 2016 Amanieu d'Antras
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
use core::borrow::Borrow;
use core::fmt;
use core::ops::Deref;
use core::ptr::NonNull;

/// Unchecked shared pointer to a list element.
///
/// This type acts like an `Rc` or `Arc` except that no reference count is
/// maintained. Instead, the user is responsible for freeing the managed
/// object once it is no longer in use. The list itself never frees the
/// objects it tracks: insert operations consume an `ElementRef` and remove
/// operations hand one back.
///
/// You must guarantee that an object managed by an `ElementRef` is not
/// moved, dropped or accessed through a mutable reference as long as at
/// least one `ElementRef` is pointing to it.
pub struct ElementRef<T: ?Sized> {
    ptr: NonNull<T>,
}

impl<T: ?Sized> ElementRef<T> {
    /// Creates an `ElementRef` from a raw pointer
    ///
    /// # Safety
    ///
    /// The pointer must not be null, and you must ensure that the
    /// `ElementRef` guarantees are upheld.
    #[inline]
    pub unsafe fn from_raw(val: *const T) -> ElementRef<T> {
        ElementRef {
            ptr: NonNull::new_unchecked(val as *mut T),
        }
    }

    /// Converts an `ElementRef` into a raw pointer
    #[inline]
    pub fn into_raw(ptr: Self) -> *mut T {
        ptr.ptr.as_ptr()
    }
}

#[cfg(feature = "alloc")]
impl<T: ?Sized> ElementRef<T> {
    /// Creates an `ElementRef` from a `Box`
    #[inline]
    pub fn from_box(val: Box<T>) -> ElementRef<T> {
        unsafe { ElementRef::from_raw(Box::into_raw(val)) }
    }

    /// Converts an `ElementRef` into a `Box`
    ///
    /// # Safety
    ///
    /// You must ensure that this is the only `ElementRef` managing this
    /// object and that it is not currently a member of any list. This
    /// operation is only valid if the `ElementRef` was created using
    /// `ElementRef::from_box`.
    #[inline]
    pub unsafe fn into_box(ptr: Self) -> Box<T> {
        Box::from_raw(ElementRef::into_raw(ptr))
    }
}

impl<T: ?Sized> Clone for ElementRef<T> {
    #[inline]
    fn clone(&self) -> ElementRef<T> {
        ElementRef { ptr: self.ptr }
    }
}

impl<T: ?Sized> Deref for ElementRef<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.as_ref()
    }
}

impl<T: ?Sized> AsRef<T> for ElementRef<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T: ?Sized> Borrow<T> for ElementRef<T> {
    #[inline]
    fn borrow(&self) -> &T {
        self.as_ref()
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for ElementRef<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self.as_ref(), f)
    }
}

unsafe impl<T: ?Sized + Send> Send for ElementRef<T> {}

unsafe impl<T: ?Sized + Sync> Sync for ElementRef<T> {}
