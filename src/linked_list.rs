// Copyright 2016 Amanieu d'Antras
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Intrusive doubly-linked list.

use crate::adapter::Adapter;
use crate::element_ref::ElementRef;
use crate::Error;
use core::cell::Cell;
use core::cmp::Ordering;
use core::fmt;
use core::mem;
use core::ptr;

// =============================================================================
// Link
// =============================================================================

/// Intrusive link that allows an object to be inserted into a `LinkedList`.
pub struct Link {
    next: Cell<NodePtr>,
    prev: Cell<NodePtr>,
}

impl Link {
    /// Creates a new `Link`.
    #[inline]
    pub const fn new() -> Link {
        Link {
            next: Cell::new(UNLINKED_MARKER),
            prev: Cell::new(UNLINKED_MARKER),
        }
    }

    /// Checks whether the `Link` is linked into a `LinkedList`.
    ///
    /// An unlinked link holds a reserved marker value rather than null, so
    /// the answer is exact for every list shape, including the sole object of
    /// a one-element list whose neighbours are both null. The link is read
    /// non-atomically: the result is only meaningful if no other thread is
    /// concurrently modifying the chain.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.get() != UNLINKED_MARKER
    }

    /// Removes the object from the chain it is linked into and resets the
    /// link to the unlinked state. This is a no-op if the object is not
    /// currently linked.
    ///
    /// Only the links of the neighbouring objects are rewritten: no list
    /// object is informed of the removal.
    ///
    /// # Safety
    ///
    /// The chain containing this link must not be tracked by a `LinkedList`,
    /// since the list's head, tail and length would be left stale. An object
    /// that is part of a `LinkedList` must be removed through that list
    /// instead, or the list must be reset with `fast_clear` afterwards.
    #[inline]
    pub unsafe fn unlink(&self) {
        if self.is_linked() {
            NodePtr(self as *const Link).remove();
        }
    }

    /// Forcibly resets the link to the unlinked state without touching the
    /// links of its neighbours.
    ///
    /// # Safety
    ///
    /// It is undefined behavior to call this function while the object is
    /// still reachable from a `LinkedList`. The intended use is restoring the
    /// links of objects that were left linked behind by `fast_clear`.
    #[inline]
    pub unsafe fn force_unlink(&self) {
        NodePtr(self as *const Link).unlink();
    }
}

// An object containing a link can be sent to another thread if it is unlinked.
unsafe impl Send for Link {}

// The cells are only accessed indirectly through `LinkedList` and are not
// accessible directly, so a `&Link` is always safe to access from multiple
// threads.
unsafe impl Sync for Link {}

// Provide an implementation of Clone which simply initializes the new link as
// unlinked. This allows structs containing a link to derive Clone.
impl Clone for Link {
    #[inline]
    fn clone(&self) -> Link {
        Link::new()
    }
}

// Same as above
impl Default for Link {
    #[inline]
    fn default() -> Link {
        Link::new()
    }
}

// Provide an implementation of Debug so that structs containing a link can
// still derive Debug.
impl fmt::Debug for Link {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // There isn't anything sensible to print here except whether the link
        // is currently in a list.
        if self.is_linked() {
            write!(f, "linked")
        } else {
            write!(f, "unlinked")
        }
    }
}

// =============================================================================
// NodePtr
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodePtr(*const Link);

// Use a special value to indicate an unlinked node
const UNLINKED_MARKER: NodePtr = NodePtr(1 as *const _);

impl NodePtr {
    #[inline]
    const fn null() -> NodePtr {
        NodePtr(ptr::null())
    }

    #[inline]
    fn is_null(self) -> bool {
        self.0.is_null()
    }

    #[inline]
    unsafe fn is_linked(self) -> bool {
        self.next() != UNLINKED_MARKER
    }

    #[inline]
    unsafe fn next(self) -> NodePtr {
        (*self.0).next.get()
    }

    #[inline]
    unsafe fn prev(self) -> NodePtr {
        (*self.0).prev.get()
    }

    #[inline]
    unsafe fn set_next(self, next: NodePtr) {
        (*self.0).next.set(next);
    }

    #[inline]
    unsafe fn set_prev(self, prev: NodePtr) {
        (*self.0).prev.set(prev);
    }

    #[inline]
    unsafe fn unlink(self) {
        self.set_next(UNLINKED_MARKER);
        self.set_prev(UNLINKED_MARKER);
    }

    #[inline]
    unsafe fn link_between(self, prev: NodePtr, next: NodePtr) {
        if !prev.is_null() {
            prev.set_next(self);
        }
        if !next.is_null() {
            next.set_prev(self);
        }
        self.set_next(next);
        self.set_prev(prev);
    }

    #[inline]
    unsafe fn link_after(self, prev: NodePtr) {
        self.link_between(prev, prev.next());
    }

    #[inline]
    unsafe fn link_before(self, next: NodePtr) {
        self.link_between(next.prev(), next);
    }

    #[inline]
    unsafe fn remove(self) {
        if !self.next().is_null() {
            self.next().set_prev(self.prev());
        }
        if !self.prev().is_null() {
            self.prev().set_next(self.next());
        }
        self.unlink();
    }

    #[inline]
    unsafe fn splice(start: NodePtr, end: NodePtr, prev: NodePtr, next: NodePtr) {
        start.set_prev(prev);
        end.set_next(next);
        if !prev.is_null() {
            prev.set_next(start);
        }
        if !next.is_null() {
            next.set_prev(end);
        }
    }
}

// =============================================================================
// Position
// =============================================================================

/// A detached position in a `LinkedList`, captured from a cursor.
///
/// A `Position` records where a cursor was pointing without borrowing the
/// list: either an object in the list or the null position. Its main use is
/// describing the end bound of a range for `CursorMut::splice_range_before`,
/// where the start of the range is identified by a cursor and a second cursor
/// into the same list cannot exist at the same time.
///
/// A `Position` is not updated when the list is mutated. Operations that
/// receive one verify that it still denotes a reachable position before
/// modifying anything.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Position(NodePtr);

impl Position {
    /// Checks if this is the null position.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Position(node) = *self;
        if node.is_null() {
            write!(f, "Position(null)")
        } else {
            write!(f, "Position({:?})", node.0)
        }
    }
}

// =============================================================================
// Cursor, CursorMut
// =============================================================================

/// A cursor which provides read-only access to a `LinkedList`.
pub struct Cursor<'a, A: Adapter> {
    current: NodePtr,
    list: &'a LinkedList<A>,
}

impl<'a, A: Adapter> Clone for Cursor<'a, A> {
    #[inline]
    fn clone(&self) -> Cursor<'a, A> {
        Cursor {
            current: self.current,
            list: self.list,
        }
    }
}

// Two cursors are equal if they point at the same object, or if both point at
// the null object.
impl<'a, A: Adapter> PartialEq for Cursor<'a, A> {
    #[inline]
    fn eq(&self, other: &Cursor<'a, A>) -> bool {
        self.current == other.current
    }
}
impl<'a, A: Adapter> Eq for Cursor<'a, A> {}

impl<'a, A: Adapter> Cursor<'a, A> {
    /// Checks if the cursor is currently pointing to the null object.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.current.is_null()
    }

    /// Returns a reference to the object that the cursor is currently
    /// pointing to.
    ///
    /// This returns None if the cursor is currently pointing to the null
    /// object.
    #[inline]
    pub fn get(&self) -> Option<&'a A::Value> {
        if self.is_null() {
            None
        } else {
            Some(unsafe { &*self.list.adapter.get_value(self.current.0) })
        }
    }

    /// Captures the current position of the cursor as a detached `Position`.
    #[inline]
    pub fn position(&self) -> Position {
        Position(self.current)
    }

    /// Moves the cursor to the next object of the `LinkedList`.
    ///
    /// If the cursor is pointing to the null object then this will move it to
    /// the first object of the `LinkedList`. If it is pointing to the last
    /// object of the `LinkedList` then this will move it to the null object.
    #[inline]
    pub fn move_next(&mut self) {
        if self.is_null() {
            self.current = self.list.head;
        } else {
            self.current = unsafe { self.current.next() };
        }
    }

    /// Moves the cursor to the previous object of the `LinkedList`.
    ///
    /// If the cursor is pointing to the null object then this will move it to
    /// the last object of the `LinkedList`. If it is pointing to the first
    /// object of the `LinkedList` then this will move it to the null object.
    #[inline]
    pub fn move_prev(&mut self) {
        if self.is_null() {
            self.current = self.list.tail;
        } else {
            self.current = unsafe { self.current.prev() };
        }
    }
}

/// A cursor which provides mutable access to a `LinkedList`.
pub struct CursorMut<'a, A: Adapter> {
    current: NodePtr,
    list: &'a mut LinkedList<A>,
}

impl<'a, A: Adapter> CursorMut<'a, A> {
    /// Checks if the cursor is currently pointing to the null object.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.current.is_null()
    }

    /// Returns a reference to the object that the cursor is currently
    /// pointing to.
    ///
    /// This returns None if the cursor is currently pointing to the null
    /// object.
    #[inline]
    pub fn get(&self) -> Option<&A::Value> {
        if self.is_null() {
            None
        } else {
            Some(unsafe { &*self.list.adapter.get_value(self.current.0) })
        }
    }

    /// Returns a read-only cursor pointing to the current object.
    ///
    /// The lifetime of the returned `Cursor` is bound to that of the
    /// `CursorMut`, which means it cannot outlive the `CursorMut` and that
    /// the `CursorMut` is frozen for the lifetime of the `Cursor`.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, A> {
        Cursor {
            current: self.current,
            list: self.list,
        }
    }

    /// Captures the current position of the cursor as a detached `Position`.
    #[inline]
    pub fn position(&self) -> Position {
        Position(self.current)
    }

    /// Moves the cursor to the next object of the `LinkedList`.
    ///
    /// If the cursor is pointing to the null object then this will move it to
    /// the first object of the `LinkedList`. If it is pointing to the last
    /// object of the `LinkedList` then this will move it to the null object.
    #[inline]
    pub fn move_next(&mut self) {
        if self.is_null() {
            self.current = self.list.head;
        } else {
            self.current = unsafe { self.current.next() };
        }
    }

    /// Moves the cursor to the previous object of the `LinkedList`.
    ///
    /// If the cursor is pointing to the null object then this will move it to
    /// the last object of the `LinkedList`. If it is pointing to the first
    /// object of the `LinkedList` then this will move it to the null object.
    #[inline]
    pub fn move_prev(&mut self) {
        if self.is_null() {
            self.current = self.list.tail;
        } else {
            self.current = unsafe { self.current.prev() };
        }
    }

    /// Inserts a new object into the `LinkedList` before the current one.
    ///
    /// If the cursor is pointing at the null object then the new object is
    /// inserted at the end of the `LinkedList`.
    ///
    /// Fails with [`Error::AlreadyLinked`] if the object is already linked
    /// into a list, in which case no list is modified.
    #[inline]
    pub fn insert_before(&mut self, val: ElementRef<A::Value>) -> Result<(), Error> {
        unsafe {
            let new = NodePtr(self.list.adapter.get_link(ElementRef::into_raw(val)));
            if new.is_linked() {
                return Err(Error::AlreadyLinked);
            }
            if self.is_null() {
                new.link_between(self.list.tail, NodePtr::null());
                self.list.tail = new;
            } else {
                new.link_before(self.current);
            }
            if self.list.head == self.current {
                self.list.head = new;
            }
            self.list.len += 1;
        }
        Ok(())
    }

    /// Inserts a new object into the `LinkedList` after the current one.
    ///
    /// If the cursor is pointing at the null object then the new object is
    /// inserted at the front of the `LinkedList`.
    ///
    /// Fails with [`Error::AlreadyLinked`] if the object is already linked
    /// into a list, in which case no list is modified.
    #[inline]
    pub fn insert_after(&mut self, val: ElementRef<A::Value>) -> Result<(), Error> {
        unsafe {
            let new = NodePtr(self.list.adapter.get_link(ElementRef::into_raw(val)));
            if new.is_linked() {
                return Err(Error::AlreadyLinked);
            }
            if self.is_null() {
                new.link_between(NodePtr::null(), self.list.head);
                self.list.head = new;
            } else {
                new.link_after(self.current);
            }
            if self.list.tail == self.current {
                self.list.tail = new;
            }
            self.list.len += 1;
        }
        Ok(())
    }

    /// Removes the current object from the `LinkedList`.
    ///
    /// A pointer to the object that was removed is returned, with its link
    /// reset to the unlinked state, and the cursor is moved to point to the
    /// next object in the `LinkedList`.
    ///
    /// Fails with [`Error::InvalidPosition`] if the cursor is currently
    /// pointing to the null object, which denotes no object.
    #[inline]
    pub fn remove(&mut self) -> Result<ElementRef<A::Value>, Error> {
        unsafe {
            if self.is_null() {
                return Err(Error::InvalidPosition);
            }
            if self.list.head == self.current {
                self.list.head = self.current.next();
            }
            if self.list.tail == self.current {
                self.list.tail = self.current.prev();
            }
            let next = self.current.next();
            let result = self.current.0;
            self.current.remove();
            self.current = next;
            self.list.len -= 1;
            Ok(ElementRef::from_raw(self.list.adapter.get_value(result)))
        }
    }

    /// Moves all objects from the given `LinkedList` before the current one.
    ///
    /// If the cursor is pointing at the null object then the objects are
    /// inserted at the end of the `LinkedList`.
    ///
    /// `other` is left empty. No object is copied or has its storage moved:
    /// the two chains are joined in O(1) by rewriting the boundary links.
    #[inline]
    pub fn splice_before(&mut self, other: &mut LinkedList<A>) {
        if other.is_empty() {
            return;
        }
        unsafe {
            if self.is_null() {
                NodePtr::splice(other.head, other.tail, self.list.tail, NodePtr::null());
                self.list.tail = other.tail;
            } else {
                NodePtr::splice(other.head, other.tail, self.current.prev(), self.current);
            }
            if self.list.head == self.current {
                self.list.head = other.head;
            }
        }
        self.list.len += other.len;
        other.head = NodePtr::null();
        other.tail = NodePtr::null();
        other.len = 0;
    }

    /// Moves all objects from the given `LinkedList` after the current one.
    ///
    /// If the cursor is pointing at the null object then the objects are
    /// inserted at the start of the `LinkedList`.
    ///
    /// `other` is left empty. No object is copied or has its storage moved:
    /// the two chains are joined in O(1) by rewriting the boundary links.
    #[inline]
    pub fn splice_after(&mut self, other: &mut LinkedList<A>) {
        if other.is_empty() {
            return;
        }
        unsafe {
            if self.is_null() {
                NodePtr::splice(other.head, other.tail, NodePtr::null(), self.list.head);
                self.list.head = other.head;
            } else {
                NodePtr::splice(other.head, other.tail, self.current, self.current.next());
            }
            if self.list.tail == self.current {
                self.list.tail = other.tail;
            }
        }
        self.list.len += other.len;
        other.head = NodePtr::null();
        other.tail = NodePtr::null();
        other.len = 0;
    }

    /// Moves the object under the source cursor out of its list and inserts
    /// it before the current position of this cursor.
    ///
    /// If this cursor is pointing at the null object then the object is
    /// inserted at the end of the `LinkedList`. The source cursor is moved to
    /// the object following the one that was taken.
    ///
    /// Fails with [`Error::InvalidPosition`] if the source cursor is pointing
    /// to the null object, in which case neither list is modified.
    pub fn splice_one_before(&mut self, src: &mut CursorMut<'_, A>) -> Result<(), Error> {
        if src.is_null() {
            return Err(Error::InvalidPosition);
        }
        unsafe {
            let node = src.current;
            let next = node.next();
            if src.list.head == node {
                src.list.head = next;
            }
            if src.list.tail == node {
                src.list.tail = node.prev();
            }
            node.remove();
            src.current = next;
            src.list.len -= 1;

            if self.is_null() {
                node.link_between(self.list.tail, NodePtr::null());
                self.list.tail = node;
            } else {
                node.link_before(self.current);
            }
            if self.list.head == self.current {
                self.list.head = node;
            }
            self.list.len += 1;
        }
        Ok(())
    }

    /// Moves the run of objects starting at the source cursor and ending just
    /// before `until` out of the source list, and inserts it before the
    /// current position of this cursor.
    ///
    /// `until` is a position previously captured from a cursor over the
    /// source list; the null position selects everything through the source
    /// list's tail. An empty run (the source cursor already at `until`) is a
    /// no-op. If this cursor is pointing at the null object then the run is
    /// inserted at the end of the `LinkedList`. The source cursor is moved to
    /// `until`.
    ///
    /// The run is walked once to measure it, so the cost is proportional to
    /// its length. The walk doubles as validation: if `until` does not lie
    /// ahead of the source cursor, the operation fails with
    /// [`Error::InvalidPosition`] and neither list is modified.
    pub fn splice_range_before(
        &mut self,
        src: &mut CursorMut<'_, A>,
        until: Position,
    ) -> Result<(), Error> {
        let Position(until) = until;
        if src.current == until {
            return Ok(());
        }
        if src.is_null() {
            return Err(Error::InvalidPosition);
        }
        unsafe {
            let first = src.current;
            let mut last = first;
            let mut count = 1;
            loop {
                let next = last.next();
                if next == until {
                    break;
                }
                if next.is_null() {
                    return Err(Error::InvalidPosition);
                }
                last = next;
                count += 1;
            }

            // Detach [first, last] from the source list.
            let before = first.prev();
            if before.is_null() {
                src.list.head = until;
            } else {
                before.set_next(until);
            }
            if until.is_null() {
                src.list.tail = before;
            } else {
                until.set_prev(before);
            }
            src.list.len -= count;
            src.current = until;

            // Link it into this list before the current position.
            if self.is_null() {
                NodePtr::splice(first, last, self.list.tail, NodePtr::null());
                self.list.tail = last;
            } else {
                NodePtr::splice(first, last, self.current.prev(), self.current);
            }
            if self.list.head == self.current {
                self.list.head = first;
            }
            self.list.len += count;
        }
        Ok(())
    }
}

// =============================================================================
// LinkedList
// =============================================================================

/// An intrusive doubly-linked list.
///
/// The list tracks its first and last objects and the number of objects in
/// the chain, but it does not own the objects themselves: they only enter and
/// leave through the operations below, and dropping the list unlinks any
/// objects it still contains without freeing them.
///
/// A list cannot be copied or cloned, since its objects are referenced by
/// address and a second list tracking the same chain would be meaningless.
pub struct LinkedList<A: Adapter> {
    head: NodePtr,
    tail: NodePtr,
    len: usize,
    adapter: A,
}

impl<A: Adapter> LinkedList<A> {
    /// Creates an empty `LinkedList`.
    #[inline]
    pub const fn new(adapter: A) -> LinkedList<A> {
        LinkedList {
            head: NodePtr::null(),
            tail: NodePtr::null(),
            len: 0,
            adapter,
        }
    }

    /// Returns `true` if the `LinkedList` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects in the `LinkedList`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns a null `Cursor` for this list.
    #[inline]
    pub fn cursor(&self) -> Cursor<'_, A> {
        Cursor {
            current: NodePtr::null(),
            list: self,
        }
    }

    /// Returns a null `CursorMut` for this list.
    #[inline]
    pub fn cursor_mut(&mut self) -> CursorMut<'_, A> {
        CursorMut {
            current: NodePtr::null(),
            list: self,
        }
    }

    /// Creates a `Cursor` from a pointer to an object.
    ///
    /// # Safety
    ///
    /// `ptr` must be a pointer to an object that is part of this list.
    #[inline]
    pub unsafe fn cursor_from_ptr(&self, ptr: *const A::Value) -> Cursor<'_, A> {
        Cursor {
            current: NodePtr(self.adapter.get_link(ptr)),
            list: self,
        }
    }

    /// Creates a `CursorMut` from a pointer to an object.
    ///
    /// # Safety
    ///
    /// `ptr` must be a pointer to an object that is part of this list.
    #[inline]
    pub unsafe fn cursor_mut_from_ptr(&mut self, ptr: *const A::Value) -> CursorMut<'_, A> {
        CursorMut {
            current: NodePtr(self.adapter.get_link(ptr)),
            list: self,
        }
    }

    /// Returns a reference to the first object of the list.
    ///
    /// Fails with [`Error::EmptyContainer`] if the list contains no objects.
    #[inline]
    pub fn front(&self) -> Result<&A::Value, Error> {
        if self.head.is_null() {
            return Err(Error::EmptyContainer);
        }
        Ok(unsafe { &*self.adapter.get_value(self.head.0) })
    }

    /// Returns a reference to the last object of the list.
    ///
    /// Fails with [`Error::EmptyContainer`] if the list contains no objects.
    #[inline]
    pub fn back(&self) -> Result<&A::Value, Error> {
        if self.tail.is_null() {
            return Err(Error::EmptyContainer);
        }
        Ok(unsafe { &*self.adapter.get_value(self.tail.0) })
    }

    /// Gets an iterator over the objects in the `LinkedList`.
    #[inline]
    pub fn iter(&self) -> Iter<'_, A> {
        Iter {
            raw: RawIter {
                head: self.head,
                tail: self.tail,
            },
            list: self,
        }
    }

    /// Calls the given function for each object in the `LinkedList` and
    /// removes it from the list.
    ///
    /// This will unlink all objects currently in the list.
    ///
    /// If the given function panics then all objects in the `LinkedList` will
    /// still be unlinked, but the function will not be called for any objects
    /// after the one that panicked.
    pub fn drain<F>(&mut self, mut f: F)
    where
        F: FnMut(ElementRef<A::Value>),
    {
        // If the given function panics, we still need to go through the rest
        // of the list and unlink all remaining links.
        struct PanicGuard(NodePtr);
        impl Drop for PanicGuard {
            #[inline]
            fn drop(&mut self) {
                let mut current = self.0;
                while !current.is_null() {
                    unsafe {
                        let next = current.next();
                        current.unlink();
                        current = next;
                    }
                }
            }
        }

        let mut current = self.head;
        self.head = NodePtr::null();
        self.tail = NodePtr::null();
        self.len = 0;
        while !current.is_null() {
            unsafe {
                let next = current.next();
                current.unlink();
                let guard = PanicGuard(next);
                f(ElementRef::from_raw(self.adapter.get_value(current.0)));
                mem::forget(guard);
                current = next;
            }
        }
    }

    /// Removes all objects from the `LinkedList`.
    ///
    /// Every object currently in the list is restored to the unlinked state,
    /// which requires iterating through all of them. None of them is freed.
    #[inline]
    pub fn clear(&mut self) {
        self.drain(|_| {});
    }

    /// Empties the `LinkedList` without unlinking the objects in it.
    ///
    /// Since this does not touch any object's link, any attempt to insert one
    /// of the affected objects into another `LinkedList` will fail with
    /// [`Error::AlreadyLinked`], but will not cause any memory unsafety. To
    /// unlink those objects manually, you must call `Link::force_unlink` on
    /// them.
    ///
    /// This is the only function that can be safely called after an object
    /// has been moved or dropped while still being linked into this
    /// `LinkedList`.
    #[inline]
    pub fn fast_clear(&mut self) {
        self.head = NodePtr::null();
        self.tail = NodePtr::null();
        self.len = 0;
    }

    /// Takes all the objects out of the `LinkedList`, leaving it empty. The
    /// taken objects are returned as a new `LinkedList`.
    #[inline]
    pub fn take(&mut self) -> LinkedList<A>
    where
        A: Clone,
    {
        let list = LinkedList {
            head: self.head,
            tail: self.tail,
            len: self.len,
            adapter: self.adapter.clone(),
        };
        self.head = NodePtr::null();
        self.tail = NodePtr::null();
        self.len = 0;
        list
    }

    /// Exchanges the contents of this list with another in O(1).
    ///
    /// Only the two lists' head, tail and length are swapped: no object's
    /// link is touched, so every object keeps its place in whichever chain it
    /// was part of.
    #[inline]
    pub fn swap(&mut self, other: &mut LinkedList<A>) {
        mem::swap(&mut self.head, &mut other.head);
        mem::swap(&mut self.tail, &mut other.tail);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Inserts a new object at the start of the `LinkedList`.
    ///
    /// Fails with [`Error::AlreadyLinked`] if the object is already linked
    /// into a list, in which case no list is modified.
    #[inline]
    pub fn push_front(&mut self, val: ElementRef<A::Value>) -> Result<(), Error> {
        self.cursor_mut().insert_after(val)
    }

    /// Inserts a new object at the end of the `LinkedList`.
    ///
    /// Fails with [`Error::AlreadyLinked`] if the object is already linked
    /// into a list, in which case no list is modified.
    #[inline]
    pub fn push_back(&mut self, val: ElementRef<A::Value>) -> Result<(), Error> {
        self.cursor_mut().insert_before(val)
    }

    /// Removes the first object of the `LinkedList` and returns it with its
    /// link reset to the unlinked state.
    ///
    /// This returns `None` if the `LinkedList` is empty.
    #[inline]
    pub fn pop_front(&mut self) -> Option<ElementRef<A::Value>> {
        let mut cursor = self.cursor_mut();
        cursor.move_next();
        cursor.remove().ok()
    }

    /// Removes the last object of the `LinkedList` and returns it with its
    /// link reset to the unlinked state.
    ///
    /// This returns `None` if the `LinkedList` is empty.
    #[inline]
    pub fn pop_back(&mut self) -> Option<ElementRef<A::Value>> {
        let mut cursor = self.cursor_mut();
        cursor.move_prev();
        cursor.remove().ok()
    }

    /// Appends all objects of `other` to the end of this list, leaving
    /// `other` empty.
    ///
    /// This is a concatenation: the two chains are joined in O(1) by
    /// rewriting the boundary links, and no ordering is applied. If this list
    /// is empty it simply adopts `other`'s chain.
    #[inline]
    pub fn merge(&mut self, other: &mut LinkedList<A>) {
        self.cursor_mut().splice_before(other);
    }

    /// Removes every object for which the predicate returns `true`,
    /// preserving the order of the remaining objects.
    ///
    /// The removed objects are unlinked, not freed. Returns the number of
    /// objects that were removed.
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&A::Value) -> bool,
    {
        let mut removed = 0;
        let mut cursor = self.cursor_mut();
        cursor.move_next();
        loop {
            let matched = match cursor.get() {
                Some(value) => pred(value),
                None => break,
            };
            if matched {
                let _ = cursor.remove();
                removed += 1;
            } else {
                cursor.move_next();
            }
        }
        removed
    }

    /// Removes all but the first object of every run of consecutive equal
    /// objects, preserving the order of the remaining objects.
    ///
    /// The removed objects are unlinked, not freed. Returns the number of
    /// objects that were removed.
    #[inline]
    pub fn unique(&mut self) -> usize
    where
        A::Value: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Removes all but the first object of every run of consecutive objects
    /// considered equal by the given function, preserving the order of the
    /// remaining objects.
    ///
    /// Each object is compared against the most recent object that was kept,
    /// so a run of any length collapses to its first object. Returns the
    /// number of objects that were removed.
    pub fn unique_by<F>(&mut self, mut eq: F) -> usize
    where
        F: FnMut(&A::Value, &A::Value) -> bool,
    {
        let mut removed = 0;
        let mut cursor = self.cursor_mut();
        cursor.move_next();
        loop {
            let duplicate = {
                let cur = cursor.as_cursor();
                let mut prev = cur.clone();
                prev.move_prev();
                match (prev.get(), cur.get()) {
                    (Some(kept), Some(value)) => eq(kept, value),
                    (_, None) => break,
                    _ => false,
                }
            };
            if duplicate {
                let _ = cursor.remove();
                removed += 1;
            } else {
                cursor.move_next();
            }
        }
        removed
    }

    /// Sorts the `LinkedList` into non-descending order.
    ///
    /// The sort is stable: objects which compare equal keep their relative
    /// order.
    #[inline]
    pub fn sort(&mut self)
    where
        A::Value: Ord,
    {
        self.sort_by(|a, b| a.cmp(b));
    }

    /// Sorts the `LinkedList` with a comparator function, into non-descending
    /// order with respect to the comparator.
    ///
    /// This is a bottom-up merge sort over the chain: runs of doubling length
    /// are repeatedly merged in place by relinking, so no object is copied or
    /// has its storage moved, and no memory is allocated. The sort is stable
    /// and runs in O(n log n) time.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&A::Value, &A::Value) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        unsafe {
            let mut head = self.head;
            let mut tail;
            let mut k: usize = 1;
            loop {
                let mut p = head;
                head = NodePtr::null();
                tail = NodePtr::null();
                let mut merges: usize = 0;
                while !p.is_null() {
                    merges += 1;
                    // The second run starts at most k nodes after p.
                    let mut q = p;
                    let mut psize = 0;
                    while psize < k {
                        psize += 1;
                        q = q.next();
                        if q.is_null() {
                            break;
                        }
                    }
                    let mut qsize = k;
                    // Merge the two runs, taking from p on ties to keep the
                    // sort stable.
                    while psize > 0 || (qsize > 0 && !q.is_null()) {
                        let take_p = if psize == 0 {
                            false
                        } else if qsize == 0 || q.is_null() {
                            true
                        } else {
                            cmp(
                                &*self.adapter.get_value(p.0),
                                &*self.adapter.get_value(q.0),
                            ) != Ordering::Greater
                        };
                        let node = if take_p {
                            let node = p;
                            p = node.next();
                            psize -= 1;
                            node
                        } else {
                            let node = q;
                            q = node.next();
                            qsize -= 1;
                            node
                        };
                        if tail.is_null() {
                            head = node;
                        } else {
                            tail.set_next(node);
                        }
                        node.set_prev(tail);
                        tail = node;
                    }
                    p = q;
                }
                tail.set_next(NodePtr::null());
                if merges <= 1 {
                    break;
                }
                k *= 2;
            }
            self.head = head;
            self.tail = tail;
        }
    }
}

// Allow read-only access from multiple threads
unsafe impl<A: Adapter + Sync> Sync for LinkedList<A> where A::Value: Sync {}

// We require Sync on objects here because they may belong to multiple lists
unsafe impl<A: Adapter + Send> Send for LinkedList<A> where A::Value: Send + Sync {}

// Dropping a list unlinks any objects that are still in it, restoring the
// invariant that an unlinked object can be inserted anywhere. The objects
// themselves are never freed.
impl<A: Adapter> Drop for LinkedList<A> {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, A: Adapter> IntoIterator for &'a LinkedList<A> {
    type Item = &'a A::Value;
    type IntoIter = Iter<'a, A>;

    #[inline]
    fn into_iter(self) -> Iter<'a, A> {
        self.iter()
    }
}

impl<A: Adapter + Default> Default for LinkedList<A> {
    fn default() -> LinkedList<A> {
        LinkedList::new(A::default())
    }
}

impl<A: Adapter> fmt::Debug for LinkedList<A>
where
    A::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// RawIter, Iter
// =============================================================================

#[derive(Copy, Clone)]
struct RawIter {
    head: NodePtr,
    tail: NodePtr,
}
impl Iterator for RawIter {
    type Item = NodePtr;

    #[inline]
    fn next(&mut self) -> Option<NodePtr> {
        if self.head.is_null() {
            None
        } else {
            let head = self.head;
            if head == self.tail {
                // The two ends have met, so the iterator is now exhausted
                // from both directions.
                self.head = NodePtr::null();
                self.tail = NodePtr::null();
            } else {
                self.head = unsafe { head.next() };
            }
            Some(head)
        }
    }
}
impl DoubleEndedIterator for RawIter {
    #[inline]
    fn next_back(&mut self) -> Option<NodePtr> {
        if self.tail.is_null() {
            None
        } else {
            let tail = self.tail;
            if self.head == tail {
                self.head = NodePtr::null();
                self.tail = NodePtr::null();
            } else {
                self.tail = unsafe { tail.prev() };
            }
            Some(tail)
        }
    }
}

/// An iterator over references to the objects of a `LinkedList`.
pub struct Iter<'a, A: Adapter> {
    raw: RawIter,
    list: &'a LinkedList<A>,
}
impl<'a, A: Adapter> Iterator for Iter<'a, A> {
    type Item = &'a A::Value;

    #[inline]
    fn next(&mut self) -> Option<&'a A::Value> {
        self.raw
            .next()
            .map(|x| unsafe { &*self.list.adapter.get_value(x.0) })
    }
}
impl<'a, A: Adapter> DoubleEndedIterator for Iter<'a, A> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a A::Value> {
        self.raw
            .next_back()
            .map(|x| unsafe { &*self.list.adapter.get_value(x.0) })
    }
}
impl<'a, A: Adapter> Clone for Iter<'a, A> {
    #[inline]
    fn clone(&self) -> Iter<'a, A> {
        Iter {
            raw: self.raw,
            list: self.list,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
