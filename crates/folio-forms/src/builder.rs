//! Element builders.
//!
//! A form is described as a tree of [`Element`]s: deferred one-shot builders
//! that, given a [`BuildContext`], construct their widgets, register rows
//! and sections with the model, wire interaction slots into the change
//! funnel, and hand back their [`Rendered`] output (the built value, the
//! keep-alive list, and the element's update step).
//!
//! Builders run exactly once, in declaration order, which is what fixes the
//! construction order the reconciler relies on. Everything dynamic - text,
//! accessories, visibility - is expressed in the update step instead.
//!
//! # Example
//!
//! ```ignore
//! let schema = form(vec![
//!     section(
//!         vec![control_row("Enabled", toggle(lens!(Settings, enabled)), None)],
//!         None,
//!         None,
//!     ),
//!     section(
//!         vec![nested_text_row("Password", lens!(Settings, password))],
//!         Some(getter!(Settings, password_footer)),
//!         Some(getter!(Settings, enabled)),
//!     ),
//! ]);
//! let driver = FormDriver::new("Settings", initial_settings, schema);
//! ```

use std::sync::Arc;

use folio_core::{Getter, Lens};

use crate::binding::{BuildContext, Rendered, UpdateFn};
use crate::controller::FormController;
use crate::model::{FormModel, RowId, SectionId};
use crate::widget::{Accessory, Cell, CellControl, Label, TextInput, Toggle};

/// A deferred element builder.
pub type Element<E, S> = Box<dyn FnOnce(&BuildContext<S>) -> Rendered<E, S> + Send>;

/// A whole form: an element producing the section tree.
pub type Form<S> = Element<Vec<SectionRef>, S>;

/// A built row: its model handle and its cell widget.
pub struct CellRef {
    pub id: RowId,
    pub widget: Arc<Cell>,
}

/// A built section: its model handle and its rows in display order.
pub struct SectionRef {
    pub id: SectionId,
    pub cells: Vec<CellRef>,
}

// =============================================================
// Controls
// =============================================================

/// A switch bound to a boolean field.
///
/// User flips write through the lens; the update step writes the field back
/// into the switch silently, so programmatic changes never loop.
pub fn toggle<S>(lens: Lens<S, bool>) -> Element<Arc<Toggle>, S>
where
    S: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let widget = Toggle::new(lens.get(&context.state));
        let change = context.change.clone();
        let write = lens.clone();
        let guard = widget.toggled.clone().connect_scoped(move |&on| {
            let write = write.clone();
            change(Box::new(move |state: &mut S| write.set(state, on)));
        });
        let read = lens.clone();
        let w = widget.clone();
        Rendered::new(
            widget,
            vec![Box::new(guard)],
            Box::new(move |state: &S| w.on.set_silent(read.get(state))),
        )
    })
}

/// A text field bound to a string field.
///
/// The field writes through the lens when editing finishes, not per
/// keystroke.
pub fn text_input<S>(lens: Lens<S, String>) -> Element<Arc<TextInput>, S>
where
    S: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let widget = TextInput::new(lens.get(&context.state));
        let change = context.change.clone();
        let write = lens.clone();
        let guard = widget
            .editing_finished
            .clone()
            .connect_scoped(move |text: &String| {
                let write = write.clone();
                let text = text.clone();
                change(Box::new(move |state: &mut S| write.set(state, text)));
            });
        let read = lens.clone();
        let w = widget.clone();
        Rendered::new(
            widget,
            vec![Box::new(guard)],
            Box::new(move |state: &S| w.text.set_silent(read.get(state))),
        )
    })
}

/// A read-only label showing a derived string.
pub fn label<S>(text: Getter<S, String>) -> Element<Arc<Label>, S>
where
    S: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let widget = Label::new(text.get(&context.state));
        let w = widget.clone();
        Rendered::new(
            widget,
            Vec::new(),
            Box::new(move |state: &S| w.text.set_silent(text.get(state))),
        )
    })
}

// =============================================================
// Rows
// =============================================================

/// A titled row embedding a control, with an optional visibility predicate.
pub fn control_row<S, C>(
    title: impl Into<String>,
    control: Element<C, S>,
    visible: Option<Getter<S, bool>>,
) -> Element<CellRef, S>
where
    S: Clone + Send + 'static,
    C: Into<CellControl> + 'static,
{
    let title = title.into();
    Box::new(move |context: &BuildContext<S>| {
        let row = context.model.add_row();
        let rendered = control(context);
        let cell = Cell::new(title);
        cell.set_control(rendered.element);

        let model = context.model.clone();
        let control_update = rendered.update;
        let update: UpdateFn<S> = Box::new(move |state: &S| {
            if let Some(visible) = &visible {
                model.set_row_visible(row, visible.get(state));
            }
            control_update(state);
        });
        Rendered::new(
            CellRef { id: row, widget: cell },
            rendered.retained,
            update,
        )
    })
}

/// A selectable row representing one choice of a multiple-choice field.
///
/// Selecting the row writes `option` through the lens; the row shows a
/// checkmark whenever the field currently equals `option`.
pub fn option_row<S, T>(
    title: impl Into<String>,
    option: T,
    lens: Lens<S, T>,
) -> Element<CellRef, S>
where
    S: Clone + Send + 'static,
    T: PartialEq + Clone + Send + Sync + 'static,
{
    let title = title.into();
    Box::new(move |context: &BuildContext<S>| {
        let row = context.model.add_row();
        let cell = Cell::new(title);
        context.model.set_row_highlight(row, true);

        let change = context.change.clone();
        let write = lens.clone();
        let chosen = option.clone();
        context.model.set_row_on_select(
            row,
            Some(Arc::new(move || {
                let write = write.clone();
                let chosen = chosen.clone();
                change(Box::new(move |state: &mut S| write.set(state, chosen)));
            })),
        );

        let read = lens.clone();
        let widget = cell.clone();
        let update: UpdateFn<S> = Box::new(move |state: &S| {
            let selected = read.with(state, |current| *current == option);
            widget.accessory.set_silent(if selected {
                Accessory::Checkmark
            } else {
                Accessory::None
            });
        });
        Rendered::new(CellRef { id: row, widget: cell }, Vec::new(), update)
    })
}

/// A disclosure row that pushes a nested form when selected.
///
/// The nested form gets its own model and controller but shares the parent's
/// change funnel, so edits made on the pushed screen flow through the same
/// update pass; the parent's update step keeps the nested screen reconciled
/// whether or not it is currently pushed.
pub fn detail_row<S>(
    title: impl Into<String>,
    detail: Getter<S, String>,
    form: Form<S>,
) -> Element<CellRef, S>
where
    S: Clone + Send + 'static,
{
    let title = title.into();
    Box::new(move |context: &BuildContext<S>| {
        let row = context.model.add_row();
        let cell = Cell::new(title.clone());
        cell.accessory.set_silent(Accessory::DisclosureIndicator);
        cell.detail.set_silent(detail.get(&context.state));
        context.model.set_row_highlight(row, true);

        let nested_model = Arc::new(FormModel::new());
        let nested_context = context.with_model(nested_model.clone());
        let rendered = form(&nested_context);
        let nested_update = rendered.update;
        let nested_controller = Arc::new(FormController::new(
            title,
            nested_model,
            rendered.element,
        ));

        let navigator = context.navigator.clone();
        let pushed = nested_controller.clone();
        context.model.set_row_on_select(
            row,
            Some(Arc::new(move || {
                navigator.push(pushed.clone());
            })),
        );

        let widget = cell.clone();
        let update: UpdateFn<S> = Box::new(move |state: &S| {
            nested_update(state);
            nested_controller.reconcile();
            widget.detail.set_silent(detail.get(state));
        });
        Rendered::new(
            CellRef { id: row, widget: cell },
            rendered.retained,
            update,
        )
    })
}

/// A disclosure row editing one string field on a pushed single-field
/// screen, previewing the current value as its detail text.
pub fn nested_text_row<S>(title: impl Into<String>, lens: Lens<S, String>) -> Element<CellRef, S>
where
    S: Clone + Send + 'static,
{
    let title = title.into();
    let field = control_row(title.clone(), text_input(lens.clone()), None);
    detail_row(
        title,
        lens.to_getter(),
        form(vec![section(vec![field], None, None)]),
    )
}

// =============================================================
// Sections and forms
// =============================================================

/// A section of rows, with optional footer text and visibility predicate.
pub fn section<S>(
    cells: Vec<Element<CellRef, S>>,
    footer: Option<Getter<S, Option<String>>>,
    visible: Option<Getter<S, bool>>,
) -> Element<SectionRef, S>
where
    S: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let mut cell_refs = Vec::new();
        let mut retained = Vec::new();
        let mut updates = Vec::new();
        for cell in cells {
            let rendered = cell(context);
            cell_refs.push(rendered.element);
            retained.extend(rendered.retained);
            updates.push(rendered.update);
        }
        let rows = cell_refs.iter().map(|cell| cell.id).collect();
        let id = context.model.add_section(rows);

        let model = context.model.clone();
        let update: UpdateFn<S> = Box::new(move |state: &S| {
            for update in &updates {
                update(state);
            }
            if let Some(visible) = &visible {
                model.set_section_visible(id, visible.get(state));
            }
            if let Some(footer) = &footer {
                model.set_footer(id, footer.get(state));
            }
        });
        Rendered::new(SectionRef { id, cells: cell_refs }, retained, update)
    })
}

/// A whole form from its sections, in display order.
pub fn form<S>(sections: Vec<Element<SectionRef, S>>) -> Form<S>
where
    S: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let mut refs = Vec::new();
        let mut retained = Vec::new();
        let mut updates = Vec::new();
        for section in sections {
            let rendered = section(context);
            refs.push(rendered.element);
            retained.extend(rendered.retained);
            updates.push(rendered.update);
        }
        let update: UpdateFn<S> = Box::new(move |state: &S| {
            for update in &updates {
                update(state);
            }
        });
        Rendered::new(refs, retained, update)
    })
}

/// Re-target a form at the sub-value a lens focuses on.
///
/// The returned form builds against `T` while binding into a parent state
/// `S`: its mutations lift through the lens, and its update step projects
/// the parent state down before running.
pub fn bind<S, T>(form: Form<T>, lens: Lens<S, T>) -> Form<S>
where
    S: Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    Box::new(move |context: &BuildContext<S>| {
        let scoped = context.scoped(&lens);
        let rendered = form(&scoped);
        let inner_update = rendered.update;
        let read = lens.clone();
        Rendered::new(
            rendered.element,
            rendered.retained,
            Box::new(move |state: &S| read.with(state, |sub| inner_update(sub))),
        )
    })
}
