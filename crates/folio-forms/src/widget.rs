//! Cell widgets and their embedded controls.
//!
//! Widgets are pure state-and-signal objects: a [`Cell`] carries the text
//! and accessory properties the host table reads when it renders, and an
//! embedded control ([`Toggle`], [`TextInput`], [`Label`]) carries the
//! control's own state plus the signal the host fires when the user
//! interacts with it.
//!
//! The binding layer writes widget properties during the update pass and
//! connects slots to control signals at build time. Signals live behind
//! `Arc` so connection guards can outlive the borrow that created them;
//! the guards themselves are parked in the form's retain arena.

use std::sync::Arc;

use parking_lot::RwLock;

use folio_core::{Property, Signal};

// =============================================================
// Supporting value types
// =============================================================

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(220, 50, 47);

    /// An opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The accessory glyph at the trailing edge of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accessory {
    /// No accessory.
    #[default]
    None,
    /// A chevron indicating the cell pushes a detail screen.
    DisclosureIndicator,
    /// A checkmark indicating the cell's option is selected.
    Checkmark,
}

// =============================================================
// Controls
// =============================================================

/// A two-state switch control.
pub struct Toggle {
    /// Current switch position.
    pub on: Property<bool>,
    /// Fired with the new position when the *user* flips the switch.
    /// Programmatic writes to `on` do not fire it.
    pub toggled: Arc<Signal<bool>>,
}

impl Toggle {
    pub fn new(on: bool) -> Arc<Self> {
        Arc::new(Self {
            on: Property::new(on),
            toggled: Arc::new(Signal::new()),
        })
    }

    /// Flip the switch as the user would: update the position and fire
    /// [`toggled`](Self::toggled).
    pub fn set_on_interactive(&self, on: bool) {
        self.on.set_silent(on);
        self.toggled.emit(on);
    }
}

/// A single-line text entry control.
pub struct TextInput {
    /// Current text content.
    pub text: Property<String>,
    /// Whether the control accepts input.
    pub enabled: Property<bool>,
    /// Fired with the final text when the user ends editing. Programmatic
    /// writes to `text` do not fire it.
    pub editing_finished: Arc<Signal<String>>,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: Property::new(text.into()),
            enabled: Property::new(true),
            editing_finished: Arc::new(Signal::new()),
        })
    }

    /// End editing as the user would: fire
    /// [`editing_finished`](Self::editing_finished) with the current text.
    pub fn commit(&self) {
        self.editing_finished.emit(self.text.get());
    }
}

/// A static, non-interactive text control.
pub struct Label {
    pub text: Property<String>,
    pub color: Property<Color>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: Property::new(text.into()),
            color: Property::new(Color::default()),
        })
    }
}

/// The control embedded in a cell, if any.
#[derive(Clone)]
pub enum CellControl {
    Toggle(Arc<Toggle>),
    Text(Arc<TextInput>),
    Label(Arc<Label>),
}

impl From<Arc<Toggle>> for CellControl {
    fn from(toggle: Arc<Toggle>) -> Self {
        CellControl::Toggle(toggle)
    }
}

impl From<Arc<TextInput>> for CellControl {
    fn from(input: Arc<TextInput>) -> Self {
        CellControl::Text(input)
    }
}

impl From<Arc<Label>> for CellControl {
    fn from(label: Arc<Label>) -> Self {
        CellControl::Label(label)
    }
}

// =============================================================
// Cell
// =============================================================

/// One table cell: leading title, trailing detail text, accessory, and an
/// optional embedded control.
///
/// All fields are properties so the update pass can rewrite them in place
/// and the host re-reads them on its next draw.
pub struct Cell {
    pub title: Property<String>,
    pub detail: Property<String>,
    pub accessory: Property<Accessory>,
    pub text_color: Property<Color>,
    control: RwLock<Option<CellControl>>,
}

impl Cell {
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            title: Property::new(title.into()),
            detail: Property::new(String::new()),
            accessory: Property::new(Accessory::None),
            text_color: Property::new(Color::default()),
            control: RwLock::new(None),
        })
    }

    /// The embedded control, if one was installed.
    pub fn control(&self) -> Option<CellControl> {
        self.control.read().clone()
    }

    /// Install the embedded control. Called once at build time.
    pub fn set_control(&self, control: impl Into<CellControl>) {
        *self.control.write() = Some(control.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_toggle_interactive_fires_signal() {
        let toggle = Toggle::new(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        toggle.toggled.connect(move |&on| seen2.lock().push(on));
        toggle.set_on_interactive(true);
        assert!(toggle.on.get());
        assert_eq!(*seen.lock(), vec![true]);
    }

    #[test]
    fn test_toggle_programmatic_write_is_silent() {
        let toggle = Toggle::new(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        toggle.toggled.connect(move |&on| seen2.lock().push(on));
        toggle.on.set_silent(true);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_text_input_commit_carries_current_text() {
        let input = TextInput::new("old");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        input
            .editing_finished
            .connect(move |text| seen2.lock().push(text.clone()));
        input.text.set_silent("new".to_string());
        input.commit();
        assert_eq!(*seen.lock(), vec!["new".to_string()]);
    }

    #[test]
    fn test_cell_control_install() {
        let cell = Cell::new("Password");
        assert!(cell.control().is_none());
        cell.set_control(TextInput::new(""));
        assert!(matches!(cell.control(), Some(CellControl::Text(_))));
    }
}
