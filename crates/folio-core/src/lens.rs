//! Typed field projections for state binding.
//!
//! A form derives everything it displays from a single state value. The
//! binding layer needs two kinds of access into that value:
//!
//! - [`Getter<S, T>`] - a read-only projection (a bound display value or a
//!   visibility predicate's input)
//! - [`Lens<S, T>`] - a read/write projection (a control that both shows and
//!   edits a field)
//!
//! Both are plain values built from a pair of accessor closures - there is
//! no reflection or dynamic property lookup. Projections compose with
//! [`then`](Lens::then), and composition is associative, which is what lets
//! a nested sub-form reuse the same combinators against a field of the
//! parent state.
//!
//! The [`getter!`](crate::getter) and [`lens!`](crate::lens) macros build
//! projections for struct fields:
//!
//! ```
//! use folio_core::{lens, getter};
//!
//! struct Settings {
//!     enabled: bool,
//!     password: String,
//! }
//!
//! let enabled = lens!(Settings, enabled);
//! let mut s = Settings { enabled: false, password: "1234".into() };
//! enabled.set(&mut s, true);
//! assert!(enabled.get(&s));
//!
//! let password = getter!(Settings, password);
//! assert_eq!(password.get(&s), "1234");
//! ```

use std::fmt;
use std::sync::Arc;

type ReadFn<S, T> = Arc<dyn for<'a> Fn(&'a S) -> &'a T + Send + Sync>;
type WriteFn<S, T> = Arc<dyn for<'a> Fn(&'a mut S) -> &'a mut T + Send + Sync>;

/// A read-only projection from a state value to one of its parts.
pub struct Getter<S, T> {
    read: ReadFn<S, T>,
}

impl<S: 'static, T: 'static> Getter<S, T> {
    /// Create a getter from a borrowing accessor.
    pub fn new<R>(read: R) -> Self
    where
        R: for<'a> Fn(&'a S) -> &'a T + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
        }
    }

    /// Read the projected value out of `state`, cloning it.
    pub fn get(&self, state: &S) -> T
    where
        T: Clone,
    {
        (self.read)(state).clone()
    }

    /// Access the projected value through a closure without cloning.
    pub fn with<F, R>(&self, state: &S, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f((self.read)(state))
    }

    /// Compose with a getter on the projected value.
    pub fn then<U: 'static>(&self, next: &Getter<T, U>) -> Getter<S, U> {
        let outer = self.read.clone();
        let inner = next.read.clone();
        Getter {
            read: Arc::new(move |s| inner(outer(s))),
        }
    }
}

impl<S: 'static> Getter<S, bool> {
    /// Negate a boolean projection, e.g. for a "visible unless" predicate.
    pub fn not(&self) -> Getter<S, bool> {
        let read = self.read.clone();
        Getter {
            read: Arc::new(move |s| if *read(s) { &false } else { &true }),
        }
    }
}

impl<S, T> Clone for Getter<S, T> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
        }
    }
}

impl<S, T> fmt::Debug for Getter<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Getter")
    }
}

/// A read/write projection from a state value to one of its parts.
///
/// A lens is the explicit accessor/mutator pair behind every editable
/// binding: the getter feeds the widget on each update pass, the setter is
/// what a user interaction writes through when it mutates state.
pub struct Lens<S, T> {
    read: ReadFn<S, T>,
    write: WriteFn<S, T>,
}

impl<S: 'static, T: 'static> Lens<S, T> {
    /// Create a lens from a pair of borrowing accessors.
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: for<'a> Fn(&'a S) -> &'a T + Send + Sync + 'static,
        W: for<'a> Fn(&'a mut S) -> &'a mut T + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            write: Arc::new(write),
        }
    }

    /// Read the projected value out of `state`, cloning it.
    pub fn get(&self, state: &S) -> T
    where
        T: Clone,
    {
        (self.read)(state).clone()
    }

    /// Access the projected value through a closure without cloning.
    pub fn with<F, R>(&self, state: &S, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f((self.read)(state))
    }

    /// Overwrite the projected value in `state`.
    pub fn set(&self, state: &mut S, value: T) {
        *(self.write)(state) = value;
    }

    /// Mutate the projected value in place.
    pub fn update<F>(&self, state: &mut S, f: F)
    where
        F: FnOnce(&mut T),
    {
        f((self.write)(state));
    }

    /// Compose with a lens on the projected value.
    pub fn then<U: 'static>(&self, next: &Lens<T, U>) -> Lens<S, U> {
        let outer_read = self.read.clone();
        let inner_read = next.read.clone();
        let outer_write = self.write.clone();
        let inner_write = next.write.clone();
        Lens {
            read: Arc::new(move |s| inner_read(outer_read(s))),
            write: Arc::new(move |s| inner_write(outer_write(s))),
        }
    }

    /// Forget the write half, producing a read-only getter.
    pub fn to_getter(&self) -> Getter<S, T> {
        Getter {
            read: self.read.clone(),
        }
    }
}

impl<S, T> Clone for Lens<S, T> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
        }
    }
}

impl<S, T> fmt::Debug for Lens<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lens")
    }
}

/// Build a [`Getter`] for a (possibly nested) struct field.
#[macro_export]
macro_rules! getter {
    ($ty:ty, $($field:ident).+) => {
        $crate::Getter::<$ty, _>::new(|s: &$ty| &s.$($field).+)
    };
}

/// Build a [`Lens`] for a (possibly nested) struct field.
#[macro_export]
macro_rules! lens {
    ($ty:ty, $($field:ident).+) => {
        $crate::Lens::<$ty, _>::new(
            |s: &$ty| &s.$($field).+,
            |s: &mut $ty| &mut s.$($field).+,
        )
    };
}
