// Copyright 2016 Amanieu d'Antras
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! An intrusive doubly-linked list for Rust.
//!
//! Unlike normal collections, an intrusive list does not own the objects
//! inside it. Instead it just tracks a chain of already-existing objects. Such
//! a collection is called intrusive because it requires explicit support in
//! objects to allow them to be inserted into the collection. However, this
//! allows the list to work without allocating any memory of its own: inserting
//! and removing elements only rewrites a pair of pointers embedded in the
//! elements themselves.
//!
//! Semantically, an intrusive list is roughly equivalent to a standard
//! collection holding a set of `*mut T`. However, since the list stores its
//! data in the objects themselves, the pointers to these objects must remain
//! valid as long as they are linked into the list.
//!
//! # Example
//!
//! ```
//! use intrusive_list::{intrusive_adapter, linked_list, ElementRef, LinkedList};
//! use std::cell::Cell;
//!
//! // Define a struct containing an intrusive link, and an adapter for it
//! struct Test {
//!     link: linked_list::Link,
//!     value: Cell<i32>,
//! }
//! intrusive_adapter!(TestAdapter = Test { link: linked_list::Link });
//!
//! // Create a list and some objects
//! let mut list = LinkedList::new(TestAdapter::new());
//! let a = ElementRef::from_box(Box::new(Test {
//!     link: linked_list::Link::new(),
//!     value: Cell::new(1),
//! }));
//! let b = ElementRef::from_box(Box::new(Test {
//!     link: linked_list::Link::new(),
//!     value: Cell::new(2),
//! }));
//!
//! // Insert the objects at the back of the list. We pass clones to the list
//! // so that we keep our own handles to the objects.
//! list.push_back(a.clone()).unwrap();
//! list.push_back(b.clone()).unwrap();
//! assert_eq!(list.iter().map(|x| x.value.get()).collect::<Vec<_>>(), [1, 2]);
//!
//! // We can modify the objects and the changes will be reflected in the
//! // list since it references the existing objects.
//! a.value.set(4);
//! assert_eq!(list.iter().map(|x| x.value.get()).collect::<Vec<_>>(), [4, 2]);
//!
//! // Inserting an object which is already linked is reported as an error
//! // instead of corrupting either list.
//! assert!(list.push_front(a.clone()).is_err());
//!
//! // Elements come back out of the list as ElementRef handles. Once an
//! // object is unlinked we are free to drop it or insert it into another
//! // list. Note that freeing it isn't checked by the compiler: you need to
//! // ensure that an object is not dropped while still linked.
//! let popped = list.pop_front().unwrap();
//! assert_eq!(popped.value.get(), 4);
//! unsafe {
//!     drop(ElementRef::into_box(popped));
//! }
//! assert_eq!(list.iter().map(|x| x.value.get()).collect::<Vec<_>>(), [2]);
//!
//! // Dropping the list unlinks any objects it still contains, but never
//! // frees them.
//! drop(list);
//! assert!(!b.link.is_linked());
//! # unsafe { drop(ElementRef::into_box(b)); }
//! ```
//!
//! # Links and adapters
//!
//! The list tracks objects through links which are embedded within the
//! objects themselves. A single object can be part of multiple lists at once
//! by having multiple links in it.
//!
//! The relationship between an object and a link inside it is described by
//! the `Adapter` trait. The list uses an implementation of this trait to
//! recover the address of an object from the address of its embedded link,
//! and vice versa. In most cases you do not need to write an implementation
//! manually: the `intrusive_adapter!` macro will generate the necessary code
//! for a given object type and link field.
//!
//! # Cursors
//!
//! The list is manipulated using cursors. A cursor is similar to an iterator,
//! except that it can freely seek back-and-forth, and can safely mutate the
//! list during iteration. This is similar to how a C++ iterator works.
//!
//! A cursor views the list as a circular chain, with a special null object
//! between the last and first elements of the list. A cursor will either
//! point to a valid object in the list or to this special null object.
//!
//! Cursors come in two forms: `Cursor` and `CursorMut`. A `Cursor` gives a
//! read-only view of the list, but you are allowed to use multiple `Cursor`
//! objects simultaneously on the same list. On the other hand, `CursorMut`
//! can be used to mutate the list, but you may only use one of them at a
//! time.
//!
//! # Errors
//!
//! Operations which can fail return a `Result` with an [`Error`] describing
//! what went wrong: inserting an object whose link is already in use,
//! reading the front or back of an empty list, or removing at the null
//! position. Every such check is performed before any link is modified, so a
//! failed operation leaves all the lists involved exactly as they were.
//!
//! # Safety
//!
//! Guaranteeing safety in intrusive collections is tricky because they do
//! not integrate well with Rust's ownership system, especially in cases
//! where an object is a member of multiple lists. This library encapsulates
//! these concerns using the `ElementRef` type. An `ElementRef` is a pointer
//! type that provides several guarantees which must be maintained by unsafe
//! code:
//!
//! - An object managed by an `ElementRef` must not be moved, dropped or
//!   accessed through a mutable reference as long as at least one
//!   `ElementRef` is pointing to it.
//!
//! The only safe way to create an `ElementRef` is `ElementRef::from_box`,
//! which takes ownership of a boxed object. An `ElementRef` can also be
//! created using the unsafe `ElementRef::from_raw` function, however you
//! must ensure that the invariants listed above are maintained.
//!
//! Destroying an object that is managed by an `ElementRef` can only be done
//! using unsafe code because you must manually ensure that the object is no
//! longer a member of any list and that there are no other `ElementRef`
//! pointing to it. The object can be retrieved through the
//! `ElementRef::into_box` and `ElementRef::into_raw` functions.
//!
//! Note that while moving an object that is linked into a list is
//! disallowed, moving the list itself is perfectly fine. This is possible
//! because the linked objects do not contain any pointers back to the list
//! object itself.
//!
//! When a list is dropped, any objects still in it are unlinked and restored
//! to the unlinked state, just as if `clear` had been called. The one
//! exception is `fast_clear`, which empties a list without touching the
//! links of the elements it contained; those links must then be reset with
//! `Link::force_unlink` before the objects can be inserted again.

#![warn(missing_docs)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(test)]
#[macro_use]
extern crate std;

// Re-export core for use by macros
#[doc(hidden)]
pub extern crate core as __core;

pub use memoffset::offset_of;

mod adapter;
mod element_ref;
pub mod linked_list;

pub use crate::adapter::Adapter;
pub use crate::element_ref::ElementRef;
pub use crate::linked_list::LinkedList;

use core::fmt;

/// Errors returned by fallible list operations.
///
/// Any check which produces one of these errors is performed before any link
/// is modified, so an operation which fails leaves every list involved in
/// its previous state.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Error {
    /// The object is already linked into a list through this link.
    AlreadyLinked,
    /// The list contains no elements.
    EmptyContainer,
    /// The cursor or position does not reference an element.
    InvalidPosition,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Error::AlreadyLinked => "object is already linked into a list",
            Error::EmptyContainer => "list is empty",
            Error::InvalidPosition => "position does not reference an element",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}
