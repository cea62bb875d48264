//! Keep-alive storage for callback handlers.
//!
//! Widgets hold only non-owning connections to the closures that react to
//! user events; someone has to own those closures for as long as the widget
//! can still fire them. In a garbage-collected host that ownership is
//! implicit. Here it is explicit: every builder combinator returns the
//! handler objects it created as a list of [`Retained`] values, and the
//! rendered-form root absorbs them all into a [`RetainArena`] that lives
//! exactly as long as the form. Dropping the arena drops every handler.

use std::any::Any;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies one retained value inside a [`RetainArena`].
    pub struct RetainId;
}

/// A type-erased value kept alive for the lifetime of a rendered form.
pub type Retained = Box<dyn Any + Send + Sync>;

/// An ownership arena for erased callback-handler objects.
///
/// # Example
///
/// ```
/// use folio_core::RetainArena;
///
/// let mut arena = RetainArena::new();
/// let id = arena.insert(Box::new("handler".to_string()));
/// assert_eq!(arena.len(), 1);
/// arena.remove(id);
/// assert!(arena.is_empty());
/// ```
#[derive(Default)]
pub struct RetainArena {
    items: SlotMap<RetainId, Retained>,
}

impl RetainArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
        }
    }

    /// Take ownership of a value, keeping it alive until removal or arena drop.
    pub fn insert(&mut self, value: Retained) -> RetainId {
        self.items.insert(value)
    }

    /// Absorb a batch of retained values (e.g. one builder's keep-alive list).
    pub fn absorb(&mut self, values: Vec<Retained>) {
        for value in values {
            self.items.insert(value);
        }
    }

    /// Drop a single retained value early.
    ///
    /// Returns `true` if the ID was present.
    pub fn remove(&mut self, id: RetainId) -> bool {
        self.items.remove(id).is_some()
    }

    /// Number of retained values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop everything retained.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
