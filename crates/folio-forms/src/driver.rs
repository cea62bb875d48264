//! The form driver: state ownership and the update pipeline.
//!
//! [`FormDriver`] owns the application state value a form binds to and is
//! the single write path into it. Every mutation funnels through
//! [`change`](FormDriver::change), which applies the mutator, runs one
//! binding pass over the fresh state, and reconciles the controller, all
//! before returning. Interaction slots created at build time submit their
//! writes through the same funnel, so a user flipping a switch and the
//! application assigning state are indistinguishable downstream.
//!
//! Construction is two-phase: the element tree is built and the initial
//! binding pass runs *before* the pipeline is installed, so nothing can
//! trigger a reload while the form is half-built. The model is then primed
//! so the first real mutation diffs against what the host actually shows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, warn};

use folio_core::RetainArena;
use folio_core::logging::targets;

use crate::adapter::TableHost;
use crate::binding::{BuildContext, ChangeFn, Mutator, Navigator, NullNavigator, UpdateFn};
use crate::builder::Form;
use crate::controller::FormController;
use crate::error::FormError;
use crate::model::FormModel;

struct Pipeline<S> {
    update: UpdateFn<S>,
    controller: Arc<FormController>,
}

struct DriverInner<S> {
    state: Mutex<S>,
    in_update: AtomicBool,
    /// Absent during construction; mutations before installation apply to
    /// the state without triggering a pass.
    pipeline: RwLock<Option<Pipeline<S>>>,
}

impl<S: Clone + Send + Sync + 'static> DriverInner<S> {
    fn try_apply(&self, mutator: Mutator<S>) -> Result<(), FormError> {
        if self.in_update.swap(true, Ordering::SeqCst) {
            return Err(FormError::ReentrantChange);
        }

        let snapshot = {
            let mut state = self.state.lock();
            mutator(&mut state);
            state.clone()
        };

        if let Some(pipeline) = self.pipeline.read().as_ref() {
            debug!(target: targets::DRIVER, "running update pass");
            (pipeline.update)(&snapshot);
            pipeline.controller.reconcile();
        }

        self.in_update.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Owns one form's state and drives its update pipeline.
pub struct FormDriver<S> {
    inner: Arc<DriverInner<S>>,
    controller: Arc<FormController>,
    /// Keeps every interaction handler alive for the form's lifetime.
    /// Dropping the driver severs all widget connections.
    #[allow(dead_code)]
    retained: RetainArena,
}

impl<S: Clone + Send + Sync + 'static> FormDriver<S> {
    /// Build a form over `initial` with no host and no navigation.
    ///
    /// Suits forms that attach their host later and never push detail
    /// screens.
    pub fn new(title: impl Into<String>, initial: S, schema: Form<S>) -> Self {
        Self::with_options(title, initial, schema, None, Arc::new(NullNavigator))
    }

    /// Build a form over `initial` with a navigation surface for detail
    /// screens.
    pub fn with_navigator(
        title: impl Into<String>,
        initial: S,
        schema: Form<S>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_options(title, initial, schema, None, navigator)
    }

    /// Build a form over `initial`, optionally attaching a host right away.
    pub fn with_options(
        title: impl Into<String>,
        initial: S,
        schema: Form<S>,
        host: Option<Box<dyn TableHost>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let inner = Arc::new(DriverInner {
            state: Mutex::new(initial.clone()),
            in_update: AtomicBool::new(false),
            pipeline: RwLock::new(None),
        });

        // The funnel holds the driver weakly: widgets outliving the driver
        // must not keep its state alive, and a late event after teardown is
        // dropped with a warning rather than acted on.
        let weak = Arc::downgrade(&inner);
        let change: ChangeFn<S> = Arc::new(move |mutator: Mutator<S>| {
            let Some(inner) = weak.upgrade() else {
                warn!(target: targets::DRIVER, "state change after driver teardown, ignored");
                return;
            };
            if let Err(err) = inner.try_apply(mutator) {
                error!(target: targets::DRIVER, %err, "rejected state change");
                panic!("{err}");
            }
        });

        let model = Arc::new(FormModel::new());
        let context = BuildContext::new(initial, change, navigator, model.clone());
        let rendered = schema(&context);

        // Initial binding pass, then prime: the host's first load sees
        // exactly the state the first reconciliation will diff against.
        let snapshot = inner.state.lock().clone();
        (rendered.update)(&snapshot);
        model.prime();

        let controller = Arc::new(FormController::new(title, model, rendered.element));
        if let Some(host) = host {
            controller.attach_host(host);
        }
        *inner.pipeline.write() = Some(Pipeline {
            update: rendered.update,
            controller: controller.clone(),
        });

        let mut retained = RetainArena::new();
        retained.absorb(rendered.retained);

        Self {
            inner,
            controller,
            retained,
        }
    }

    /// Apply one mutation and run the update pass.
    ///
    /// # Panics
    ///
    /// Panics if called from inside an update pass. Use
    /// [`try_change`](Self::try_change) to handle that case.
    pub fn change(&self, mutator: impl FnOnce(&mut S) + Send + 'static) {
        if let Err(err) = self.try_change(mutator) {
            error!(target: targets::DRIVER, %err, "rejected state change");
            panic!("{err}");
        }
    }

    /// Apply one mutation and run the update pass, reporting reentrancy
    /// instead of panicking.
    pub fn try_change(
        &self,
        mutator: impl FnOnce(&mut S) + Send + 'static,
    ) -> Result<(), FormError> {
        self.inner.try_apply(Box::new(mutator))
    }

    /// A clone of the current state.
    pub fn state(&self) -> S {
        self.inner.state.lock().clone()
    }

    /// The root controller.
    pub fn controller(&self) -> &Arc<FormController> {
        &self.controller
    }

    /// Attach the host table to the root controller.
    pub fn attach_host(&self, host: Box<dyn TableHost>) {
        self.controller.attach_host(host);
    }
}
