// Copyright 2016 Amanieu d'Antras
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::linked_list::Link;

/// Trait for an adapter which allows a type to be inserted into an intrusive
/// list. The adapter describes the relationship between an object and the
/// `Link` embedded in it.
///
/// `Value` is the actual object type managed by the list. This type will
/// typically have an instance of `Link` as a struct field.
///
/// A single object type may have multiple adapters, which allows it to be
/// part of multiple intrusive lists simultaneously.
///
/// In most cases you do not need to implement this trait manually: the
/// `intrusive_adapter!` macro will generate the necessary implementation for
/// a given type and its link field. However it is possible to implement it
/// manually if the intrusive link is not a direct field of the object type.
///
/// It is also possible to create stateful adapters. This allows links and
/// objects to be separated and avoids the need for objects to be modified
/// to contain a link.
///
/// # Safety
///
/// It must be possible to get back a reference to the object by passing a
/// pointer returned by `get_link` to `get_value`.
pub unsafe trait Adapter {
    /// Object type which is inserted into an intrusive list.
    type Value: ?Sized;

    /// Gets a reference to an object from a reference to a link in that
    /// object.
    unsafe fn get_value(&self, link: *const Link) -> *const Self::Value;

    /// Gets a reference to the link for the given object.
    unsafe fn get_link(&self, value: *const Self::Value) -> *const Link;
}

/// Unsafe macro to get a raw pointer to an outer object from a pointer to
/// one of its fields.
///
/// # Examples
///
/// ```
/// use intrusive_list::container_of;
///
/// struct S { x: u32, y: u32 };
/// let container = S { x: 1, y: 2 };
/// let field = &container.x;
/// let container2: *const S = unsafe { container_of!(field, S, x) };
/// assert_eq!(&container as *const S, container2);
/// ```
///
/// # Safety
///
/// This is unsafe because it assumes that the given expression is a valid
/// pointer to the specified field of some container type.
#[macro_export]
macro_rules! container_of {
    ($ptr:expr, $container:path, $field:ident) => {
        ($ptr as *const _ as *const u8).sub($crate::offset_of!($container, $field)) as *mut $container
    };
}

/// Macro to generate an implementation of `Adapter` for a given type and
/// link field. In particular this will automatically generate
/// implementations of the `get_value` and `get_link` methods for a given
/// named field in a struct.
///
/// The basic syntax to create an adapter is:
///
/// ```rust,ignore
/// intrusive_adapter!(Adapter = Value { link_field: LinkType });
/// ```
///
/// # Generics
///
/// This macro supports generic arguments, but uses a slightly different
/// syntax from the usual due to limitations in the Rust macro system:
///
/// ```rust,ignore
/// intrusive_adapter!(Adapter['lifetime, Type] = Value { link_field: LinkType } where Type: Copy);
/// ```
///
/// # Examples
///
/// ```
/// use intrusive_list::{intrusive_adapter, linked_list};
///
/// pub struct Test {
///     link: linked_list::Link,
///     link2: linked_list::Link,
/// }
/// intrusive_adapter!(MyAdapter = Test { link: linked_list::Link });
/// intrusive_adapter!(pub MyAdapter2 = Test { link2: linked_list::Link });
///
/// pub struct Test2<T>
///     where T: Clone
/// {
///     link: linked_list::Link,
///     val: T,
/// }
/// intrusive_adapter!(MyAdapter3[T] = Test2<T> { link: linked_list::Link } where T: Clone);
/// ```
#[macro_export]
macro_rules! intrusive_adapter {
    (@impl $name:ident [ $($args:tt $(: ?$bound:tt)*),* ] = $value:path { $field:ident: $link:ty } $($where_:tt)*) => {
        unsafe impl<$($args $(: ?$bound)*),*> Send for $name<$($args),*> $($where_)* {}
        unsafe impl<$($args $(: ?$bound)*),*> Sync for $name<$($args),*> $($where_)* {}
        #[allow(dead_code)]
        impl<$($args $(: ?$bound)*),*> $name<$($args),*> $($where_)* {
            pub fn new() -> Self {
                $name($crate::__core::marker::PhantomData)
            }
        }
        #[allow(dead_code, unsafe_code)]
        unsafe impl<$($args $(: ?$bound)*),*> $crate::Adapter for $name<$($args),*> $($where_)* {
            type Value = $value;
            #[inline]
            unsafe fn get_value(&self, link: *const $link) -> *const $value {
                $crate::container_of!(link, $value, $field)
            }
            #[inline]
            unsafe fn get_link(&self, value: *const $value) -> *const $link {
                &(*value).$field
            }
        }
    };
    ($name:ident [ $($args:tt)* ] = $value:path { $field:ident: $link:ty } where $($where_:tt)*) => {
        #[derive(Clone, Default)]
        struct $name<$($args)*>($crate::__core::marker::PhantomData<*mut $value>) where $($where_)*;
        intrusive_adapter!(@impl $name[$($args)*] = $value { $field: $link } where $($where_)*);
    };
    (pub $name:ident [ $($args:tt)* ] = $value:path { $field:ident: $link:ty } where $($where_:tt)*) => {
        #[derive(Clone, Default)]
        pub struct $name<$($args)*>($crate::__core::marker::PhantomData<*mut $value>) where $($where_)*;
        intrusive_adapter!(@impl $name[$($args)*] = $value { $field: $link } where $($where_)*);
    };
    ($name:ident [ $($args:tt)* ] = $value:path { $field:ident: $link:ty }) => {
        #[derive(Clone, Default)]
        struct $name<$($args)*>($crate::__core::marker::PhantomData<*mut $value>);
        intrusive_adapter!(@impl $name[$($args)*] = $value { $field: $link });
    };
    (pub $name:ident [ $($args:tt)* ] = $value:path { $field:ident: $link:ty }) => {
        #[derive(Clone, Default)]
        pub struct $name<$($args)*>($crate::__core::marker::PhantomData<*mut $value>);
        intrusive_adapter!(@impl $name[$($args)*] = $value { $field: $link });
    };
    ($name:ident = $value:path { $field:ident: $link:ty }) => {
        intrusive_adapter!($name[] = $value { $field: $link });
    };
    (pub $name:ident = $value:path { $field:ident: $link:ty }) => {
        intrusive_adapter!(pub $name[] = $value { $field: $link });
    };
}
