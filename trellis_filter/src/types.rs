// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical input vocabulary shared by the filter compiler and the router.
//!
//! Both halves of the system speak in the types below: the compiler lowers a
//! filter string into [`BindingSpec`] values, and the router derives the same
//! values from raw backend callbacks. Because the two sides share one
//! representation, "does this event match that filter" is plain `Eq` on
//! structured keys; there is no string encoding that could drift or collide.
//!
//! ## Raw translation tables
//!
//! The backend delivers actions, modifiers, and buttons as small integers.
//! The mapping to these types is total and part of the public contract:
//!
//! | Concept  | Symbolic name | Raw value |
//! |----------|---------------|-----------|
//! | Action   | `release`     | `0`       |
//! | Action   | `press`       | `1`       |
//! | Action   | `repeat`      | `2`       |
//! | Modifier | `shift`       | `0x0001`  |
//! | Modifier | `ctrl`        | `0x0002`  |
//! | Modifier | `alt`         | `0x0004`  |
//! | Modifier | `super`       | `0x0008`  |
//! | Modifier | `capslock`    | `0x0010`  |
//! | Modifier | `numlock`     | `0x0020`  |
//! | Button   | `left`        | `0`       |
//! | Button   | `right`       | `1`       |
//! | Button   | `middle`      | `2`       |
//!
//! Button indices `0..=8` are accepted; key codes are opaque backend values
//! and never interpreted.

/// What happened to a key or button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// The key or button was released.
    Release,
    /// The key or button was pressed.
    Press,
    /// The key is being held and the backend synthesized a repeat.
    ///
    /// Only keys repeat; the mouse-button filter form rejects `repeat`.
    Repeat,
}

impl Action {
    /// Translate the backend's raw action code.
    ///
    /// Returns `None` for codes outside the backend's fixed callback
    /// contract.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Release),
            1 => Some(Self::Press),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }

    /// The backend's raw code for this action.
    pub const fn as_raw(self) -> i32 {
        match self {
            Self::Release => 0,
            Self::Press => 1,
            Self::Repeat => 2,
        }
    }
}

bitflags::bitflags! {
    /// Modifier-key bitmask, bit-for-bit compatible with the backend's
    /// modifier field.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Mods: u32 {
        /// A shift key is held.
        const SHIFT     = 0x0001;
        /// A control key is held.
        const CONTROL   = 0x0002;
        /// An alt key is held.
        const ALT       = 0x0004;
        /// A super (platform/logo) key is held.
        const SUPER     = 0x0008;
        /// Caps lock is engaged.
        const CAPS_LOCK = 0x0010;
        /// Num lock is engaged.
        const NUM_LOCK  = 0x0020;
    }
}

impl Mods {
    /// Translate the backend's raw modifier bitfield, dropping unknown bits.
    pub const fn from_raw(raw: i32) -> Self {
        Self::from_bits_truncate(raw as u32)
    }

    /// The backend's raw bitfield for this mask.
    pub const fn as_raw(self) -> i32 {
        self.bits() as i32
    }
}

/// A validated mouse-button index in `0..=8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Button(u8);

impl Button {
    /// The left mouse button (index 0).
    pub const LEFT: Self = Self(0);
    /// The right mouse button (index 1).
    pub const RIGHT: Self = Self(1);
    /// The middle mouse button (index 2).
    pub const MIDDLE: Self = Self(2);
    /// The highest button index the backend reports.
    pub const MAX_INDEX: u8 = 8;

    /// Create a button from its index, rejecting indices above
    /// [`MAX_INDEX`](Self::MAX_INDEX).
    pub const fn from_index(index: u8) -> Option<Self> {
        if index <= Self::MAX_INDEX {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Translate the backend's raw button code.
    pub fn from_raw(raw: i32) -> Option<Self> {
        u8::try_from(raw).ok().and_then(Self::from_index)
    }

    /// The button index.
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Opaque backend key code.
///
/// Key codes are compared, hashed, and passed through; the router never
/// interprets them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub i32);

/// Canonical subscription key for the cursor-position and scroll categories.
///
/// `Both` is its own key, not a union: an `xy` filter fires only on events
/// where both axes changed, while an `x` filter fires on every event where x
/// changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AxisKey {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
    /// Both axes at once.
    Both,
}

/// Canonical subscription key for the cursor enter/leave category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// The cursor entered the window's content area.
    Entered,
    /// The cursor left the window's content area.
    Left,
}

/// Canonical key for the Key category.
///
/// The scancode is deliberately absent: the three-field filter form has no
/// scancode field, so a scancode here could never be matched by a compiled
/// filter. The scancode still rides along on [`Event::Key`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// The backend key code.
    pub key: KeyCode,
    /// The exact modifier mask that must be held.
    pub mods: Mods,
    /// The key transition to match.
    pub action: Action,
}

/// Canonical key for the MouseButton category.
///
/// Modifiers are deliberately absent (the two-field filter form has no
/// modifier field); they ride along on [`Event::MouseButton`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ButtonChord {
    /// The button index.
    pub button: Button,
    /// The button transition to match (`Press` or `Release`).
    pub action: Action,
}

bitflags::bitflags! {
    /// Which axes an event touched: changed since the last sample for cursor
    /// movement, non-zero for scroll offsets.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        /// The horizontal axis.
        const X = 0b01;
        /// The vertical axis.
        const Y = 0b10;
    }
}

/// The event category a binding or event belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Physical key transitions.
    Key,
    /// Translated character input.
    Codepoint,
    /// Mouse-button transitions.
    MouseButton,
    /// Absolute cursor movement.
    CursorPos,
    /// Cursor crossing the window boundary.
    CursorEnter,
    /// Scroll-wheel or trackpad offsets.
    Scroll,
}

/// A raw backend callback, normalized into one record per category.
///
/// This is a closed set: the backend's raw callback surface is fixed, so
/// there is no extension point. Delegates receive events by shared reference
/// and must not assume fields from other variants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    /// A key transition.
    Key {
        /// The backend key code.
        key: KeyCode,
        /// The platform scancode for the physical key.
        scancode: i32,
        /// Press, release, or repeat.
        action: Action,
        /// Modifiers held during the transition.
        mods: Mods,
    },
    /// A translated character.
    Codepoint {
        /// The Unicode scalar value.
        codepoint: char,
    },
    /// A mouse-button transition.
    MouseButton {
        /// The button index.
        button: Button,
        /// Press or release.
        action: Action,
        /// Modifiers held during the transition.
        mods: Mods,
    },
    /// The cursor moved.
    CursorPos {
        /// Absolute x position.
        x: f64,
        /// Absolute y position.
        y: f64,
        /// Horizontal delta against the previous sample.
        dx: f64,
        /// Vertical delta against the previous sample.
        dy: f64,
        /// Which axes changed since the previous sample.
        moved: Axes,
    },
    /// The cursor crossed the window boundary.
    CursorEnter {
        /// `true` on enter, `false` on leave.
        entered: bool,
    },
    /// A scroll offset was delivered.
    Scroll {
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
        /// Which offsets were non-zero.
        scrolled: Axes,
    },
}

impl Event {
    /// The category this event belongs to.
    pub const fn category(&self) -> Category {
        match self {
            Self::Key { .. } => Category::Key,
            Self::Codepoint { .. } => Category::Codepoint,
            Self::MouseButton { .. } => Category::MouseButton,
            Self::CursorPos { .. } => Category::CursorPos,
            Self::CursorEnter { .. } => Category::CursorEnter,
            Self::Scroll { .. } => Category::Scroll,
        }
    }
}

/// One compiled filter clause: a category plus that category's canonical key.
///
/// The router derives exactly these values from raw events, so a binding
/// matches an event precisely when the two sides produce equal specs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingSpec {
    /// Match a key transition.
    Key(KeyChord),
    /// Match a translated character.
    Codepoint(char),
    /// Match a mouse-button transition.
    Button(ButtonChord),
    /// Match cursor movement along an axis (or both).
    CursorPos(AxisKey),
    /// Match the cursor crossing the window boundary.
    CursorEnter(Crossing),
    /// Match a non-zero scroll offset along an axis (or both).
    Scroll(AxisKey),
}

impl BindingSpec {
    /// The category this binding belongs to.
    pub const fn category(self) -> Category {
        match self {
            Self::Key(_) => Category::Key,
            Self::Codepoint(_) => Category::Codepoint,
            Self::Button(_) => Category::MouseButton,
            Self::CursorPos(_) => Category::CursorPos,
            Self::CursorEnter(_) => Category::CursorEnter,
            Self::Scroll(_) => Category::Scroll,
        }
    }
}
