//! State binding plumbing.
//!
//! A form binds to one value of application state `S`. Mutations funnel
//! through a single [`ChangeFn`]: interaction slots wrap their write in a
//! [`Mutator`] and submit it, the driver applies it to the owned state and
//! runs one update pass. The update pass itself is the other direction: a
//! tree of [`UpdateFn`]s that read the fresh state and rewrite widget
//! properties and visibility flags.
//!
//! [`BuildContext`] is what element builders see while the form is being
//! constructed: a snapshot of the initial state, the change funnel, the
//! navigation surface, and the model under construction. Scoping a context
//! through a lens re-targets all of it at a sub-value, which is how whole
//! sub-forms bind to a field of the parent state.

use std::sync::Arc;

use parking_lot::Mutex;

use folio_core::{Lens, Retained};

use crate::controller::FormController;
use crate::model::FormModel;

/// One step of the update pass: read the fresh state, rewrite derived data.
pub type UpdateFn<S> = Box<dyn Fn(&S) + Send + Sync>;

/// An element builder's output: the built element, the handler objects that
/// must stay alive with it, and its contribution to the update pass.
pub struct Rendered<E, S> {
    /// The built element.
    pub element: E,
    /// Keep-alive list, absorbed into the form's retain arena.
    pub retained: Vec<Retained>,
    /// This element's update step.
    pub update: UpdateFn<S>,
}

impl<E, S> Rendered<E, S> {
    pub fn new(element: E, retained: Vec<Retained>, update: UpdateFn<S>) -> Self {
        Self {
            element,
            retained,
            update,
        }
    }
}

/// A single mutation of application state.
pub type Mutator<S> = Box<dyn FnOnce(&mut S) + Send>;

/// The change funnel: applies a mutator to the owned state and runs one
/// update pass.
pub type ChangeFn<S> = Arc<dyn Fn(Mutator<S>) + Send + Sync>;

/// The navigation surface a form pushes detail screens through.
pub trait Navigator: Send + Sync {
    /// Show a nested form.
    fn push(&self, controller: Arc<FormController>);
    /// Dismiss the top form.
    fn pop(&self);
}

/// A navigator that ignores all navigation. The default for forms that
/// never push detail screens.
#[derive(Default)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn push(&self, _controller: Arc<FormController>) {}
    fn pop(&self) {}
}

/// One navigation call recorded by a [`RecordingNavigator`].
#[derive(Clone)]
pub enum NavEvent {
    Push(Arc<FormController>),
    Pop,
}

/// A [`Navigator`] that records every call, for tests.
#[derive(Default, Clone)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavEvent>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All navigation calls so far, in order.
    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().clone()
    }

    /// The controllers pushed so far, in order.
    pub fn pushed(&self) -> Vec<Arc<FormController>> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                NavEvent::Push(controller) => Some(controller.clone()),
                NavEvent::Pop => None,
            })
            .collect()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, controller: Arc<FormController>) {
        self.events.lock().push(NavEvent::Push(controller));
    }

    fn pop(&self) {
        self.events.lock().push(NavEvent::Pop);
    }
}

/// Everything an element builder needs while the form is constructed.
pub struct BuildContext<S> {
    /// Snapshot of the state at build time. Builders read it for initial
    /// widget values; live values arrive through the update pass.
    pub state: S,
    /// The change funnel for this form's state type.
    pub change: ChangeFn<S>,
    /// Where detail screens get pushed.
    pub navigator: Arc<dyn Navigator>,
    /// The model the form is being built into.
    pub model: Arc<FormModel>,
}

impl<S: Clone + Send + 'static> BuildContext<S> {
    pub fn new(
        state: S,
        change: ChangeFn<S>,
        navigator: Arc<dyn Navigator>,
        model: Arc<FormModel>,
    ) -> Self {
        Self {
            state,
            change,
            navigator,
            model,
        }
    }

    /// Submit one mutation through the change funnel.
    pub fn submit(&self, mutator: impl FnOnce(&mut S) + Send + 'static) {
        (self.change)(Box::new(mutator));
    }

    /// The same context targeting a different model. Used when a builder
    /// constructs a nested form with its own model.
    pub fn with_model(&self, model: Arc<FormModel>) -> Self {
        Self {
            state: self.state.clone(),
            change: self.change.clone(),
            navigator: self.navigator.clone(),
            model,
        }
    }

    /// Re-target the context at the sub-value a lens focuses on.
    ///
    /// Mutators submitted through the scoped context are lifted back into
    /// the parent state, so the whole form still has exactly one change
    /// funnel.
    pub fn scoped<T: Clone + Send + 'static>(&self, lens: &Lens<S, T>) -> BuildContext<T> {
        let parent_change = self.change.clone();
        let write_lens = lens.clone();
        let change: ChangeFn<T> = Arc::new(move |mutator: Mutator<T>| {
            let lens = write_lens.clone();
            parent_change(Box::new(move |state: &mut S| {
                lens.update(state, |sub| mutator(sub));
            }));
        });
        BuildContext {
            state: lens.get(&self.state),
            change,
            navigator: self.navigator.clone(),
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::lens;

    #[derive(Clone, Debug, PartialEq)]
    struct Outer {
        inner: Inner,
        count: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Inner {
        flag: bool,
    }

    fn context_over(state: Outer) -> (BuildContext<Outer>, Arc<Mutex<Outer>>) {
        let shared = Arc::new(Mutex::new(state.clone()));
        let shared2 = shared.clone();
        let change: ChangeFn<Outer> = Arc::new(move |mutator| {
            mutator(&mut shared2.lock());
        });
        let context = BuildContext::new(
            state,
            change,
            Arc::new(NullNavigator),
            Arc::new(FormModel::new()),
        );
        (context, shared)
    }

    #[test]
    fn test_submit_reaches_owned_state() {
        let (context, shared) = context_over(Outer {
            inner: Inner { flag: false },
            count: 0,
        });
        context.submit(|state| state.count = 7);
        assert_eq!(shared.lock().count, 7);
    }

    #[test]
    fn test_scoped_context_sees_sub_value() {
        let (context, _) = context_over(Outer {
            inner: Inner { flag: true },
            count: 0,
        });
        let scoped = context.scoped(&lens!(Outer, inner));
        assert!(scoped.state.flag);
    }

    #[test]
    fn test_scoped_mutator_lifts_into_parent() {
        let (context, shared) = context_over(Outer {
            inner: Inner { flag: false },
            count: 0,
        });
        let scoped = context.scoped(&lens!(Outer, inner));
        scoped.submit(|inner| inner.flag = true);
        assert!(shared.lock().inner.flag);
        assert_eq!(shared.lock().count, 0);
    }

    #[test]
    fn test_doubly_scoped_context() {
        let (context, shared) = context_over(Outer {
            inner: Inner { flag: false },
            count: 0,
        });
        let scoped = context.scoped(&lens!(Outer, inner)).scoped(&lens!(Inner, flag));
        scoped.submit(|flag| *flag = true);
        assert!(shared.lock().inner.flag);
    }

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::new();
        navigator.pop();
        assert!(navigator.pushed().is_empty());
        assert_eq!(navigator.events().len(), 1);
    }
}
