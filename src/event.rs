//! Input events forwarded by the host editor.

/// Key codes the palette and the grid cursor react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Space bar
    Space,
    /// Enter or Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// A Shift key on its own, e.g. when released
    Shift,
    /// Any other printable key
    Char(char),
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift
    pub shift: bool,
    /// Control
    pub ctrl: bool,
    /// Alt
    pub alt: bool,
}

impl Modifiers {
    /// No modifier
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift alone
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Control alone
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };
    /// Alt alone
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };
    /// Alt and Shift
    pub const ALT_SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: true,
    };
}

/// A key with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// The key
    pub code: KeyCode,
    /// Modifiers held
    pub mods: Modifiers,
}

impl Key {
    /// A key without modifiers
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::NONE,
        }
    }

    /// A key with modifiers
    pub const fn with(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Key::new(code)
    }
}

/// An event as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A key went down
    KeyDown {
        /// The key
        key: Key,
        /// True when generated by key auto-repeat
        auto_repeat: bool,
    },
    /// A key was released
    KeyUp(Key),
    /// A key was pressed and released
    KeyHit(Key),
    /// The text of the focused field changed
    Text(String),
    /// Mouse wheel turned by the given number of steps
    MouseWheel(f64),
    /// Left button pressed at a graph position
    MouseDown {
        /// Horizontal graph position
        x: f64,
        /// Vertical graph position
        y: f64,
    },
    /// The palette or editor window lost focus
    FocusLost,
}

impl UiEvent {
    /// A fresh key press without auto-repeat
    pub fn key_down(key: impl Into<Key>) -> Self {
        UiEvent::KeyDown {
            key: key.into(),
            auto_repeat: false,
        }
    }

    /// A key release
    pub fn key_up(key: impl Into<Key>) -> Self {
        UiEvent::KeyUp(key.into())
    }

    /// A key hit
    pub fn key_hit(key: impl Into<Key>) -> Self {
        UiEvent::KeyHit(key.into())
    }

    /// Modifiers held, if the event carries any
    pub fn mods(&self) -> Option<Modifiers> {
        match self {
            UiEvent::KeyDown { key, .. } | UiEvent::KeyUp(key) | UiEvent::KeyHit(key) => Some(key.mods),
            _ => None,
        }
    }
}
